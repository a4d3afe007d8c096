use crate::core::oscillator::{Note, Oscillator, Waveform};
use crate::core::synth::bus::GainStage;
use crate::core::synth::Synth;

/// Identity of a voice inside the synth graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub(crate) u64);

/// One sounding note: an oscillator feeding its own gain stage
pub struct Voice {
    pub id: VoiceId,
    pub oscillator: Oscillator,
    pub gain: GainStage,
}

impl Voice {
    pub fn next_sample(&mut self) -> f32 {
        self.gain.apply(self.oscillator.next_sample())
    }
}

/// Creates voices in the synth graph
pub struct ToneGenerator;

impl ToneGenerator {
    /// Start a voice for `note` immediately. The returned handle is the only
    /// way to stop it.
    pub fn create(note: Note, waveform: Waveform, gain: GainStage, synth: &mut Synth) -> ToneHandle {
        let frequency = note.frequency();
        let oscillator = Oscillator::new(waveform, frequency, synth.sample_rate);
        let id = synth.add_voice(oscillator, gain);
        ToneHandle {
            id,
            waveform,
            frequency,
            gain: gain.gain(),
        }
    }
}

/// Ownership token for a running voice.
///
/// `stop` consumes the handle, so a voice can be stopped at most once.
#[derive(Debug, PartialEq)]
#[must_use = "a dropped handle leaves its voice sounding with no way to stop it"]
pub struct ToneHandle {
    id: VoiceId,
    waveform: Waveform,
    frequency: f32,
    gain: f32,
}

impl ToneHandle {
    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Gain frozen into the voice at creation
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Cut the voice off. Returns false if the graph no longer held it.
    pub fn stop(self, synth: &mut Synth) -> bool {
        synth.remove_voice(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_voice_at_note_frequency() {
        let mut synth = Synth::new(48_000.0);
        let note = Note::new(60).unwrap();
        let handle = ToneGenerator::create(note, Waveform::Square, GainStage::frozen(1.0), &mut synth);

        assert_eq!(synth.voice_count(), 1);
        assert!((handle.frequency() - 261.63).abs() < 0.01);
        assert_eq!(handle.waveform(), Waveform::Square);
        assert!(synth.has_voice(handle.id()));
    }

    #[test]
    fn test_stop_removes_voice() {
        let mut synth = Synth::new(48_000.0);
        let handle = ToneGenerator::create(
            Note::new(64).unwrap(),
            Waveform::Sine,
            GainStage::frozen(1.0),
            &mut synth,
        );
        let id = handle.id();
        assert!(handle.stop(&mut synth));
        assert!(!synth.has_voice(id));
        assert_eq!(synth.voice_count(), 0);
    }

    #[test]
    fn test_voices_get_distinct_ids() {
        let mut synth = Synth::new(48_000.0);
        let note = Note::new(67).unwrap();
        let a = ToneGenerator::create(note, Waveform::Sine, GainStage::frozen(1.0), &mut synth);
        let b = ToneGenerator::create(note, Waveform::Sine, GainStage::frozen(1.0), &mut synth);
        assert_ne!(a.id(), b.id());
        assert!(a.stop(&mut synth));
        assert!(synth.has_voice(b.id()));
        assert!(b.stop(&mut synth));
    }
}
