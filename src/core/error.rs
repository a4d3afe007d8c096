use std::fmt;

/// Errors raised at startup or while loading configuration.
///
/// Nothing on the note lifecycle path returns one of these: duplicate note-ons
/// and spurious note-offs are absorbed by the registry instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PianoError {
    /// No audio host, output device or stream could be opened.
    UnsupportedEnvironment(String),
    /// No external MIDI output could be reached.
    DeviceUnavailable(String),
    /// A note number outside 0..=127.
    InvalidNote(u8),
    InvalidMapping(String),
    Config(String),
}

impl fmt::Display for PianoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PianoError::UnsupportedEnvironment(reason) => {
                write!(f, "Audio output unavailable: {reason}")
            }
            PianoError::DeviceUnavailable(reason) => write!(f, "MIDI output unavailable: {reason}"),
            PianoError::InvalidNote(note) => write!(f, "Note {note} is outside the MIDI range 0-127"),
            PianoError::InvalidMapping(reason) => write!(f, "Invalid key mapping: {reason}"),
            PianoError::Config(reason) => write!(f, "Invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for PianoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_note() {
        let err = PianoError::InvalidNote(200);
        assert_eq!(err.to_string(), "Note 200 is outside the MIDI range 0-127");
    }
}
