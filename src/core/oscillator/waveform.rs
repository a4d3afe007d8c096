use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

/// Shape of the periodic signal produced by a voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Amplitude in [-1, 1] at `phase`, a position within one cycle in [0, 1)
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => if phase < 0.5 { 1.0 } else { -1.0 },
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Triangle => "Triangle",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_at_quarter_points() {
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
        assert_eq!(Waveform::Square.sample(0.25), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.5), 0.0);
        assert_eq!(Waveform::Triangle.sample(0.25), 1.0);
        assert_eq!(Waveform::Triangle.sample(0.75), -1.0);
    }

    #[test]
    fn test_every_shape_stays_in_unit_range() {
        for waveform in Waveform::ALL {
            for i in 0..1000 {
                let value = waveform.sample(i as f32 / 1000.0);
                assert!((-1.0..=1.0).contains(&value), "{waveform} at {i}");
            }
        }
    }

    #[test]
    fn test_serializes_as_lowercase_name() {
        assert_eq!(serde_json::to_string(&Waveform::Sawtooth).unwrap(), "\"sawtooth\"");
        let parsed: Waveform = serde_json::from_str("\"triangle\"").unwrap();
        assert_eq!(parsed, Waveform::Triangle);
    }
}
