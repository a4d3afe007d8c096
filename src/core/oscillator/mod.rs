mod note;
mod waveform;

// Re-export key types so they're accessible from core::oscillator
pub use self::note::{midi_note_to_freq, Note, MAX_MIDI_NOTE};
pub use self::waveform::Waveform;

/// Phase-accumulating source of one periodic waveform
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f32,
    phase: f32,
    phase_increment: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
            phase_increment: frequency / sample_rate,
        }
    }

    /// Produce the next sample and advance the phase by one sample period
    pub fn next_sample(&mut self) -> f32 {
        let value = self.waveform.sample(self.phase);
        self.phase = (self.phase + self.phase_increment) % 1.0;
        value
    }

    #[cfg(test)]
    pub fn phase(&self) -> f32 {
        self.phase
    }
}
