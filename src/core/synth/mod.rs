pub mod audio;
pub mod bus;

use crate::core::analyzer::Analyzer;
use crate::core::oscillator::Oscillator;
use crate::core::voice::{Voice, VoiceId};
use bus::{GainStage, MasterBus};

/// The synthesis graph: live voices summed into the master bus, with the
/// analyzer tapping the master output.
///
/// Shared between the UI thread and the audio callback as `Arc<RwLock<Synth>>`.
pub struct Synth {
    pub sample_rate: f32,
    pub master: MasterBus,
    pub analyzer: Analyzer,
    voices: Vec<Voice>,
    next_voice_id: u64,
}

impl Synth {
    /// Create a new synthesizer instance
    pub fn new(sample_rate: f32) -> Self {
        Synth {
            sample_rate,
            master: MasterBus::default(),
            analyzer: Analyzer::new(),
            voices: Vec::new(),
            next_voice_id: 0,
        }
    }

    pub(crate) fn add_voice(&mut self, oscillator: Oscillator, gain: GainStage) -> VoiceId {
        let id = VoiceId(self.next_voice_id);
        self.next_voice_id += 1;
        self.voices.push(Voice { id, oscillator, gain });
        id
    }

    pub(crate) fn remove_voice(&mut self, id: VoiceId) -> bool {
        match self.voices.iter().position(|v| v.id == id) {
            Some(pos) => {
                self.voices.swap_remove(pos);
                true
            },
            None => false,
        }
    }

    #[cfg(test)]
    pub fn has_voice(&self, id: VoiceId) -> bool {
        self.voices.iter().any(|v| v.id == id)
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    #[cfg(test)]
    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    /// Generate one output sample and feed it to the analyzer
    pub fn next_sample(&mut self) -> f32 {
        let mix: f32 = self.voices.iter_mut().map(|voice| voice.next_sample()).sum();
        let output = self.master.process(mix);
        self.analyzer.push(output);
        output
    }

    /// Fill a mono buffer
    #[cfg(test)]
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::{FRAME_SIZE, SILENCE_BYTE};
    use crate::core::oscillator::{Note, Waveform};
    use crate::core::voice::ToneGenerator;

    fn square_voice(synth: &mut Synth, note: u8, gain: f32) -> crate::core::voice::ToneHandle {
        ToneGenerator::create(Note::new(note).unwrap(), Waveform::Square, GainStage::frozen(gain), synth)
    }

    #[test]
    fn test_silence_without_voices() {
        let mut synth = Synth::new(44_100.0);
        let mut buffer = [1.0f32; 256];
        synth.render(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));
        assert!(synth.analyzer.frame().iter().all(|b| *b == SILENCE_BYTE));
    }

    #[test]
    fn test_voice_is_scaled_by_frozen_gain_and_master() {
        let mut synth = Synth::new(44_100.0);
        synth.master.set_volume(0.5);
        let _handle = square_voice(&mut synth, 60, 0.5);
        // Square wave starts high
        assert_eq!(synth.next_sample(), 0.25);
    }

    #[test]
    fn test_master_volume_change_reaches_held_voice() {
        let mut synth = Synth::new(44_100.0);
        synth.master.set_volume(1.0);
        let handle = square_voice(&mut synth, 60, 1.0);
        assert_eq!(synth.next_sample(), 1.0);

        synth.master.set_volume(0.0);
        let mut buffer = [1.0f32; 128];
        synth.render(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));
        // The voice keeps the gain it was created with
        assert_eq!(handle.gain(), 1.0);
        assert_eq!(synth.voices().next().unwrap().gain.gain(), 1.0);
    }

    #[test]
    fn test_voices_are_superposed() {
        let mut synth = Synth::new(44_100.0);
        synth.master.set_volume(1.0);
        let _a = square_voice(&mut synth, 60, 0.25);
        let _b = square_voice(&mut synth, 64, 0.25);
        assert_eq!(synth.next_sample(), 0.5);
    }

    #[test]
    fn test_analyzer_sees_master_output() {
        let mut synth = Synth::new(44_100.0);
        synth.master.set_volume(1.0);
        let _handle = square_voice(&mut synth, 69, 1.0);
        let mut buffer = vec![0.0f32; FRAME_SIZE];
        synth.render(&mut buffer);
        let frame = synth.analyzer.frame();
        assert_eq!(frame.len(), FRAME_SIZE);
        assert!(frame.iter().any(|b| *b == 255));
        assert!(frame.iter().any(|b| *b == 0));
    }

    #[test]
    fn test_removing_unknown_voice_is_false() {
        let mut synth = Synth::new(44_100.0);
        let handle = square_voice(&mut synth, 60, 1.0);
        let id = handle.id();
        assert!(handle.stop(&mut synth));
        assert!(!synth.remove_voice(id));
    }
}
