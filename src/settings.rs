use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::core::error::PianoError;
use crate::core::input::KeyboardMapping;
use crate::core::oscillator::{Note, Waveform};
use crate::core::synth::bus::VoiceGain;

const SETTINGS_DIR: &str = "virtual-piano";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoSettings {
    pub volume_percent: f32,
    pub waveform: Waveform,
    /// Preferred MIDI output; the first available port is used otherwise
    pub midi_output_port: Option<String>,
    pub midi_channel: u8,
    pub voice_gain: VoiceGain,
    pub key_mapping: KeyboardMapping,
    pub lowest_note: Note,
    pub highest_note: Note,
}

impl Default for PianoSettings {
    fn default() -> Self {
        Self {
            volume_percent: 50.0,
            waveform: Waveform::Sine,
            midi_output_port: None,
            midi_channel: 0,
            voice_gain: VoiceGain::Unity,
            key_mapping: KeyboardMapping::create_default(),
            lowest_note: Note::MIDDLE_C,
            highest_note: Note::new(72).unwrap_or(Note::MIDDLE_C),
        }
    }
}

impl PianoSettings {
    pub fn validate(&self) -> Result<(), PianoError> {
        if !(0.0..=100.0).contains(&self.volume_percent) {
            return Err(PianoError::Config(format!(
                "volume_percent {} is outside 0-100",
                self.volume_percent
            )));
        }
        if self.midi_channel > 15 {
            return Err(PianoError::Config(format!("midi_channel {} is outside 0-15", self.midi_channel)));
        }
        if self.lowest_note > self.highest_note {
            return Err(PianoError::Config(format!(
                "keyboard range {}..{} is inverted",
                self.lowest_note, self.highest_note
            )));
        }
        self.key_mapping.validate()
    }

    /// Notes shown on the on-screen keyboard, lowest first
    pub fn keyboard_notes(&self) -> Vec<Note> {
        (self.lowest_note.number()..=self.highest_note.number())
            .filter_map(|n| Note::new(n).ok())
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self, PianoError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| PianoError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn settings_dir() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push(SETTINGS_DIR);
        Ok(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_json(&contents)?)
    }

    /// Load the user's settings, falling back to defaults if the file is
    /// missing or invalid
    pub fn load_or_default() -> Self {
        let path = match Self::settings_dir() {
            Ok(dir) => dir.join(SETTINGS_FILE),
            Err(e) => {
                warn!("{}; using default settings", e);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_dir()?.join(SETTINGS_FILE))
    }
}
