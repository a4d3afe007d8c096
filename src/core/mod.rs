pub mod analyzer;
pub mod error;
pub mod input;
pub mod midi;
pub mod oscillator;
pub mod piano;
pub mod registry;
pub mod synth;
pub mod visualization;
pub mod voice;

pub use error::PianoError;
pub use piano::Piano;
pub use synth::Synth;
