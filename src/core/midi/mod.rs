mod output;

pub use output::MidiOutputHandler;

use crate::core::oscillator::Note;

/// Velocity sent with every note message
pub const DEFAULT_VELOCITY: u8 = 0x7F;

/// Note messages forwarded to an external device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: Note, velocity: u8 },
    NoteOff { channel: u8, note: Note, velocity: u8 },
}

impl MidiMessage {
    pub fn note_on(channel: u8, note: Note) -> Self {
        MidiMessage::NoteOn { channel, note, velocity: DEFAULT_VELOCITY }
    }

    pub fn note_off(channel: u8, note: Note) -> Self {
        MidiMessage::NoteOff { channel, note, velocity: DEFAULT_VELOCITY }
    }

    /// Raw three-byte wire form
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiMessage::NoteOn { channel, note, velocity } => {
                [0x90 | (channel & 0x0F), note.number(), velocity & 0x7F]
            },
            MidiMessage::NoteOff { channel, note, velocity } => {
                [0x80 | (channel & 0x0F), note.number(), velocity & 0x7F]
            },
        }
    }
}

/// Fire-and-forget sink for note messages.
///
/// Implementations swallow their own failures; the audio path never waits on
/// or reacts to the device.
pub trait NoteOutput {
    fn send(&mut self, message: MidiMessage);
}
