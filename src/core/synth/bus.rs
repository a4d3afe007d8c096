//! Gain staging between the voices and the output device

use serde::{Deserialize, Serialize};

/// Convert a 0-100 volume control position into a normalized level
pub fn volume_from_percent(percent: f32) -> f32 {
    percent.clamp(0.0, 100.0) / 100.0
}

/// How a new voice picks its frozen gain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceGain {
    /// Every voice plays at unity; the master bus is the only volume stage.
    #[default]
    Unity,
    /// Each voice captures the master level at note-on, so the master level is
    /// applied twice to held notes.
    FrozenAtNoteOn,
}

impl VoiceGain {
    pub fn level_for_new_voice(&self, master: &MasterBus) -> f32 {
        match self {
            VoiceGain::Unity => 1.0,
            VoiceGain::FrozenAtNoteOn => master.volume(),
        }
    }
}

/// Per-voice amplitude scalar, fixed when the voice is created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainStage {
    gain: f32,
}

impl GainStage {
    pub fn frozen(gain: f32) -> Self {
        Self { gain: gain.clamp(0.0, 1.0) }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn apply(&self, sample: f32) -> f32 {
        sample * self.gain
    }
}

/// The shared output stage every voice is summed into
#[derive(Debug, Clone)]
pub struct MasterBus {
    volume: f32,
}

impl MasterBus {
    pub fn new(volume: f32) -> Self {
        Self { volume: volume.clamp(0.0, 1.0) }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Takes effect from the next processed sample, for held and future notes alike
    pub fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
    }

    /// Scale the voice mix and keep it inside the device's range
    pub fn process(&self, mix: f32) -> f32 {
        (mix * self.volume).clamp(-1.0, 1.0)
    }
}

impl Default for MasterBus {
    fn default() -> Self {
        Self::new(0.5)
    }
}
