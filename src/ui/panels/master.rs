use crossbeam_channel::Sender;
use egui::Ui;

use crate::core::oscillator::Waveform;
use crate::core::visualization::waveform_preview;
use crate::messaging::SynthMessage;
use crate::ui::components::WaveformPlot;

const PREVIEW_POINTS: usize = 200;

/// Volume and waveform controls
pub struct MasterPanel {
    sender: Sender<SynthMessage>,
}

impl MasterPanel {
    pub fn new(sender: Sender<SynthMessage>) -> Self {
        Self { sender }
    }

    pub fn show(&self, ui: &mut Ui, volume_percent: f32, waveform: Waveform) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.set_max_width(320.0);

                let mut volume = volume_percent;
                if ui
                    .add(egui::Slider::new(&mut volume, 0.0..=100.0).suffix(" %").text("Volume"))
                    .changed()
                {
                    self.sender.send(SynthMessage::SetVolume(volume)).ok();
                }

                ui.horizontal(|ui| {
                    ui.label("Waveform:");
                    let mut selected = waveform;
                    egui::ComboBox::from_id_salt("waveform_selector")
                        .selected_text(selected.label())
                        .show_ui(ui, |ui| {
                            for shape in Waveform::ALL {
                                ui.selectable_value(&mut selected, shape, shape.label());
                            }
                        });
                    if selected != waveform {
                        self.sender.send(SynthMessage::SetWaveform(selected)).ok();
                    }
                });
                ui.small("Applies to notes played from now on");
            });

            ui.add_space(16.0);

            // Two cycles of the shape new notes will use
            WaveformPlot::new(waveform_preview(waveform, 2.0, PREVIEW_POINTS))
                .height(80.0)
                .show(ui, "waveform_preview");
        });
    }
}
