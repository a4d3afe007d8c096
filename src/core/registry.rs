use std::collections::HashMap;

use crate::core::oscillator::{Note, Waveform};
use crate::core::synth::bus::GainStage;
use crate::core::synth::Synth;
use crate::core::voice::{ToneGenerator, ToneHandle};

/// Tracks which notes are sounding and owns their voice handles.
///
/// A note is a key here exactly while its voice is in the synth graph.
#[derive(Default)]
pub struct NoteRegistry {
    voices: HashMap<Note, ToneHandle>,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `note` unless it is already sounding.
    ///
    /// Returns the new voice's handle, or `None` for a duplicate activation.
    pub fn note_on(
        &mut self,
        note: Note,
        waveform: Waveform,
        gain: GainStage,
        synth: &mut Synth,
    ) -> Option<&ToneHandle> {
        if self.voices.contains_key(&note) {
            return None;
        }
        let handle = ToneGenerator::create(note, waveform, gain, synth);
        Some(&*self.voices.entry(note).or_insert(handle))
    }

    /// Stop `note` if it is sounding. Returns whether a voice was stopped.
    pub fn note_off(&mut self, note: Note, synth: &mut Synth) -> bool {
        match self.voices.remove(&note) {
            Some(handle) => {
                handle.stop(synth);
                true
            },
            None => false,
        }
    }

    /// Stop every sounding note, returning them in ascending order
    pub fn stop_all(&mut self, synth: &mut Synth) -> Vec<Note> {
        let mut stopped: Vec<Note> = self
            .voices
            .drain()
            .map(|(note, handle)| {
                handle.stop(synth);
                note
            })
            .collect();
        stopped.sort();
        stopped
    }

    pub fn is_active(&self, note: Note) -> bool {
        self.voices.contains_key(&note)
    }

    #[cfg(test)]
    pub fn get(&self, note: Note) -> Option<&ToneHandle> {
        self.voices.get(&note)
    }

    /// Sounding notes in ascending order
    pub fn active_notes(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self.voices.keys().copied().collect();
        notes.sort();
        notes
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
