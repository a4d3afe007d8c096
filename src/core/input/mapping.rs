use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::core::error::PianoError;
use crate::core::oscillator::Note;

/// A physical key that can be bound to a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyId {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
}

impl KeyId {
    pub const ALL: [KeyId; 26] = [
        KeyId::A, KeyId::B, KeyId::C, KeyId::D, KeyId::E, KeyId::F, KeyId::G,
        KeyId::H, KeyId::I, KeyId::J, KeyId::K, KeyId::L, KeyId::M, KeyId::N,
        KeyId::O, KeyId::P, KeyId::Q, KeyId::R, KeyId::S, KeyId::T, KeyId::U,
        KeyId::V, KeyId::W, KeyId::X, KeyId::Y, KeyId::Z,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() {
            Some(Self::ALL[(c as u8 - b'a') as usize])
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

/// Binding from computer keys to notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardMapping {
    pub mappings: BTreeMap<KeyId, Note>,
}

impl KeyboardMapping {
    /// Create a new empty mapping
    pub fn new() -> Self {
        Self {
            mappings: BTreeMap::new(),
        }
    }

    /// Bind `key` to `note`, replacing any previous binding of that key
    pub fn add_mapping(&mut self, key: KeyId, note: Note) {
        self.mappings.insert(key, note);
    }

    pub fn note_for(&self, key: KeyId) -> Option<Note> {
        self.mappings.get(&key).copied()
    }

    /// The first key bound to `note`, for labelling on-screen keys
    pub fn key_for(&self, note: Note) -> Option<KeyId> {
        self.mappings.iter().find(|(_, n)| **n == note).map(|(k, _)| *k)
    }

    /// Reject tables where two keys play the same note.
    ///
    /// Releasing either key would silence a note the other still holds.
    pub fn validate(&self) -> Result<(), PianoError> {
        let mut seen = HashSet::new();
        for (key, note) in &self.mappings {
            if !seen.insert(*note) {
                return Err(PianoError::InvalidMapping(format!(
                    "note {} is bound to more than one key (including '{}')",
                    note,
                    key.as_char()
                )));
            }
        }
        Ok(())
    }

    /// One octave from middle C on the home row, sharps on the row above
    pub fn create_default() -> Self {
        let mut mapping = Self::new();
        let keys = "awsedftgyhujk";
        for (offset, c) in keys.chars().enumerate() {
            if let (Some(key), Ok(note)) = (KeyId::from_char(c), Note::new(60 + offset as u8)) {
                mapping.add_mapping(key, note);
            }
        }
        mapping
    }
}

impl Default for KeyboardMapping {
    fn default() -> Self {
        Self::create_default()
    }
}
