use egui::Ui;

use crate::core::midi::MidiOutputHandler;

/// MIDI output port selection
pub struct MidiConfigPanel {
    output_ports: Vec<String>,
    status_message: Option<String>,
}

impl MidiConfigPanel {
    pub fn new(status_message: Option<String>) -> Self {
        Self {
            output_ports: Vec::new(),
            status_message,
        }
    }

    pub fn refresh_ports(&mut self, output: &MidiOutputHandler) {
        self.output_ports = output.list_ports();
    }

    /// Returns the port name when the user connected to a new port
    pub fn show(&mut self, ui: &mut Ui, output: &mut MidiOutputHandler) -> Option<String> {
        let mut connected = None;

        ui.horizontal(|ui| {
            match output.connected_port() {
                Some(port) => ui.label(format!("Output: {}", port)),
                None => ui.label("Output: none (audio only)"),
            };

            if ui.button("Refresh Ports").clicked() {
                self.refresh_ports(output);
            }
            if output.is_connected() && ui.button("Disconnect").clicked() {
                output.disconnect();
                self.status_message = Some("Disconnected".to_string());
            }
        });

        for port in &self.output_ports {
            let selected = output.connected_port() == Some(port.as_str());
            if ui.radio(selected, port.as_str()).clicked() && !selected {
                match output.connect_to_port(port) {
                    Ok(()) => {
                        self.status_message = Some(format!("Connected to {}", port));
                        connected = Some(port.clone());
                    },
                    Err(err) => self.status_message = Some(err.to_string()),
                }
            }
        }

        if let Some(msg) = &self.status_message {
            ui.small(msg);
        }
        if let Some([status, data1, data2]) = output.last_sent() {
            ui.small(format!("Last message: {:02X} {:02X} {:02X}", status, data1, data2));
        }
        if output.send_failures() > 0 {
            ui.small(format!("{} messages failed to send", output.send_failures()));
        }

        connected
    }
}
