use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::PianoError;

pub const MAX_MIDI_NOTE: u8 = 127;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Convert MIDI note number to frequency in Hz (A4 = note 69 = 440 Hz)
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0)
}

/// A pitch in MIDI numbering. Always within 0..=127.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Note(u8);

impl Note {
    pub const MIDDLE_C: Note = Note(60);

    pub fn new(number: u8) -> Result<Self, PianoError> {
        if number > MAX_MIDI_NOTE {
            return Err(PianoError::InvalidNote(number));
        }
        Ok(Note(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn frequency(self) -> f32 {
        midi_note_to_freq(self.0)
    }

    /// Black keys sit on the sharps of the C major scale
    pub fn is_black_key(self) -> bool {
        matches!(self.0 % 12, 1 | 3 | 6 | 8 | 10)
    }

    /// Scientific pitch name, e.g. `C4` for note 60
    pub fn name(self) -> String {
        let octave = (self.0 / 12) as i8 - 1;
        format!("{}{}", NOTE_NAMES[(self.0 % 12) as usize], octave)
    }
}

impl TryFrom<u8> for Note {
    type Error = PianoError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Note::new(number)
    }
}

impl From<Note> for u8 {
    fn from(note: Note) -> u8 {
        note.0
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
