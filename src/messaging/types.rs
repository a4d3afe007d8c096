use crate::core::oscillator::{Note, Waveform};

/// Events from input sources and UI controls, applied in the order sent
#[derive(Debug, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn(Note),
    NoteOff(Note),
    /// Global release: pointer up anywhere, or the window lost focus
    StopAll,
    SetVolume(f32), // percent, 0-100
    SetWaveform(Waveform),
}
