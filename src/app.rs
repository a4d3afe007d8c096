use eframe::egui;
use log::{error, info, warn};
use std::sync::{Arc, RwLock};

use crate::core::midi::MidiOutputHandler;
use crate::core::piano::Piano;
use crate::core::synth::audio::{AudioEngine, FALLBACK_SAMPLE_RATE};
use crate::core::synth::Synth;
use crate::core::visualization::{RenderLoop, Schedule, DEFAULT_SURFACE_SIZE};
use crate::messaging::{MessageBus, SynthMessage, MAX_MESSAGES_PER_FRAME};
use crate::settings::PianoSettings;
use crate::ui::components::{show_oscilloscope, PianoKeyboard};
use crate::ui::panels::{MasterPanel, MidiConfigPanel};
use crate::ui::{format_frequency, input};

// Main app state
pub struct PianoApp {
    synth: Arc<RwLock<Synth>>,
    _engine: Option<AudioEngine>,
    audio_status: Result<String, String>,
    message_bus: MessageBus,
    piano: Piano<MidiOutputHandler>,
    render_loop: RenderLoop,
    settings: PianoSettings,
    keyboard: PianoKeyboard,
    master_panel: MasterPanel,
    midi_panel: MidiConfigPanel,
    window_focused: bool,
}

impl PianoApp {
    pub fn new(settings: PianoSettings) -> Self {
        // Checked once; without audio the UI still loads, it just stays silent
        let (engine, synth, audio_status) = match AudioEngine::open() {
            Ok((engine, synth)) => {
                let status = format!("{} @ {} Hz, {} ch", engine.device_name, engine.sample_rate, engine.channels);
                (Some(engine), synth, Ok(status))
            },
            Err(e) => {
                error!("{}", e);
                let synth = Arc::new(RwLock::new(Synth::new(FALLBACK_SAMPLE_RATE)));
                (None, synth, Err(e.to_string()))
            },
        };

        // Best effort, never retried automatically
        let mut midi_out = MidiOutputHandler::new();
        let midi_status = match midi_out.connect_preferred(settings.midi_output_port.as_deref()) {
            Ok(port) => format!("Connected to {}", port),
            Err(e) => {
                info!("{}; continuing with audio only", e);
                e.to_string()
            },
        };

        let mut piano = Piano::new(midi_out)
            .with_waveform(settings.waveform)
            .with_voice_gain(settings.voice_gain)
            .with_channel(settings.midi_channel);
        match synth.write() {
            Ok(mut synth) => piano.set_volume_percent(settings.volume_percent, &mut synth),
            Err(_) => warn!("Synth graph lock poisoned at startup"),
        }

        let message_bus = MessageBus::new(Arc::clone(&synth));
        let keyboard = PianoKeyboard::new(
            message_bus.sender(),
            settings.keyboard_notes(),
            &settings.key_mapping,
        );
        let master_panel = MasterPanel::new(message_bus.sender());
        let mut midi_panel = MidiConfigPanel::new(Some(midi_status));
        midi_panel.refresh_ports(piano.output());

        PianoApp {
            synth,
            _engine: engine,
            audio_status,
            message_bus,
            piano,
            render_loop: RenderLoop::new(),
            settings,
            keyboard,
            master_panel,
            midi_panel,
            window_focused: true,
        }
    }

    /// Queue note events from the computer keyboard and global releases
    fn collect_input(&mut self, ctx: &egui::Context) {
        let (messages, released, focused) = ctx.input(|i| {
            (
                input::note_messages(&i.events, &self.settings.key_mapping),
                i.pointer.any_released(),
                i.focused,
            )
        });

        for msg in messages {
            self.message_bus.send(msg);
        }
        if released {
            self.message_bus.send(SynthMessage::StopAll);
        }
        if self.window_focused && !focused {
            // Key-up events go elsewhere once focus is lost
            self.message_bus.send(SynthMessage::StopAll);
        }
        self.window_focused = focused;
    }

    fn process_messages(&mut self) {
        self.message_bus.process_messages(&mut self.piano, MAX_MESSAGES_PER_FRAME);
    }

    fn status_line(&self) -> String {
        let held = self.piano.active_notes();
        if held.is_empty() {
            return "No notes held".to_string();
        }
        held.iter()
            .map(|n| format!("{} ({})", n.name(), format_frequency(n.frequency())))
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn render_ui(&mut self, ctx: &egui::Context) -> Schedule {
        let mut schedule = Schedule::Done;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Virtual Piano");
                ui.label("🎹");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match &self.audio_status {
                        Ok(status) => ui.small(status),
                        Err(e) => ui.colored_label(egui::Color32::from_rgb(230, 90, 80), e),
                    };
                });
            });
            ui.separator();

            self.master_panel.show(ui, self.piano.volume_percent(), self.piano.waveform());
            ui.add_space(8.0);

            let piano = &self.piano;
            self.keyboard.show(ui, |note| piano.is_active(note));
            ui.label(self.status_line());
            ui.add_space(8.0);

            ui.heading("Oscilloscope");
            match self.synth.read() {
                Ok(synth) => {
                    schedule = show_oscilloscope(ui, DEFAULT_SURFACE_SIZE, &mut self.render_loop, &synth.analyzer);
                    ui.small(format!("{} voices, peak {:.2}", synth.voice_count(), synth.analyzer.peak()));
                },
                Err(_) => {
                    ui.label("Audio graph unavailable");
                },
            }
            ui.add_space(8.0);

            ui.collapsing("MIDI Output", |ui| {
                if let Some(port) = self.midi_panel.show(ui, self.piano.output_mut()) {
                    self.settings.midi_output_port = Some(port);
                }
            });
        });

        schedule
    }
}

impl eframe::App for PianoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_input(ctx);
        self.process_messages();

        let schedule = self.render_ui(ctx);

        // Widgets queued pointer presses while drawing
        self.process_messages();

        if schedule == Schedule::NextFrame {
            ctx.request_repaint();
        }
    }
}

impl Drop for PianoApp {
    fn drop(&mut self) {
        self.render_loop.stop();
        if let Ok(mut synth) = self.synth.write() {
            self.piano.stop_all(&mut synth);
        }
        self.piano.flush_output();
        info!("Oscilloscope drew {} frames", self.render_loop.ticks());

        self.settings.volume_percent = self.piano.volume_percent();
        self.settings.waveform = self.piano.waveform();
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {}", e);
        }
    }
}
