use log::{debug, info, warn};
use midir::{MidiOutput, MidiOutputConnection};

use super::{MidiMessage, NoteOutput};
use crate::core::error::PianoError;

const CLIENT_NAME: &str = "Virtual Piano MIDI Output";

/// Handles MIDI output to a connected device
pub struct MidiOutputHandler {
    connection: Option<MidiOutputConnection>,
    connected_port: Option<String>,
    last_sent: Option<[u8; 3]>,
    send_failures: usize,
}

impl MidiOutputHandler {
    /// Create a new MIDI output handler
    pub fn new() -> Self {
        Self {
            connection: None,
            connected_port: None,
            last_sent: None,
            send_failures: 0,
        }
    }

    /// List all available MIDI output ports
    pub fn list_ports(&self) -> Vec<String> {
        match MidiOutput::new(CLIENT_NAME) {
            Ok(midi_out) => midi_out
                .ports()
                .iter()
                .filter_map(|port| midi_out.port_name(port).ok())
                .collect(),
            Err(err) => {
                warn!("Error initializing MIDI output: {}", err);
                Vec::new()
            }
        }
    }

    /// Connect to a specific MIDI output port by name
    pub fn connect_to_port(&mut self, port_name: &str) -> Result<(), PianoError> {
        // First disconnect if already connected
        self.disconnect();

        let midi_out = MidiOutput::new(CLIENT_NAME)
            .map_err(|err| PianoError::DeviceUnavailable(err.to_string()))?;

        let port = midi_out
            .ports()
            .into_iter()
            .find(|port| midi_out.port_name(port).map(|name| name == port_name).unwrap_or(false))
            .ok_or_else(|| PianoError::DeviceUnavailable(format!("MIDI port '{}' not found", port_name)))?;

        let conn = midi_out
            .connect(&port, "virtual-piano-output")
            .map_err(|err| PianoError::DeviceUnavailable(err.to_string()))?;

        info!("Connected MIDI output to '{}'", port_name);
        self.connection = Some(conn);
        self.connected_port = Some(port_name.to_string());
        Ok(())
    }

    /// Connect to `preferred` if given and present, otherwise to the first port
    pub fn connect_preferred(&mut self, preferred: Option<&str>) -> Result<String, PianoError> {
        let ports = self.list_ports();
        let chosen = preferred
            .and_then(|wanted| ports.iter().find(|p| p.as_str() == wanted))
            .or_else(|| ports.first())
            .cloned()
            .ok_or_else(|| PianoError::DeviceUnavailable("no MIDI output ports found".into()))?;

        self.connect_to_port(&chosen)?;
        Ok(chosen)
    }

    /// Disconnect from the currently connected MIDI port
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.connected_port = None;
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port(&self) -> Option<&str> {
        self.connected_port.as_deref()
    }

    pub fn send_failures(&self) -> usize {
        self.send_failures
    }

    /// Wire bytes of the last message handed to this output, connected or not
    pub fn last_sent(&self) -> Option<[u8; 3]> {
        self.last_sent
    }
}

impl Default for MidiOutputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteOutput for MidiOutputHandler {
    fn send(&mut self, message: MidiMessage) {
        let bytes = message.to_bytes();
        self.last_sent = Some(bytes);

        if let Some(conn) = &mut self.connection {
            if let Err(err) = conn.send(&bytes) {
                // Only the first failure is worth a warning
                if self.send_failures == 0 {
                    warn!("Failed to send MIDI message: {}", err);
                }
                self.send_failures += 1;
                debug!("MIDI send failures: {}", self.send_failures);
            }
        }
    }
}
