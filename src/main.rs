use anyhow::Result;
use eframe::egui;
use log::info;

mod app;
mod core;
mod messaging;
mod settings;
mod ui;

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting Virtual Piano");

    let settings = settings::PianoSettings::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 760.0])
            .with_title("Virtual Piano"),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Piano",
        options,
        Box::new(|_cc| Ok(Box::new(app::PianoApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))
}
