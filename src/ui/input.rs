//! Computer keyboard to note events

use egui::{Event, Key};

use crate::core::input::{KeyId, KeyboardMapping};
use crate::messaging::SynthMessage;

/// Letter keys map onto [`KeyId`]; everything else is ignored
pub fn key_id(key: Key) -> Option<KeyId> {
    let mut chars = key.name().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => KeyId::from_char(c),
        _ => None,
    }
}

/// Translate this frame's key events into note messages.
///
/// Auto-repeat presses are dropped so a held key never re-triggers.
/// Presses with Ctrl or Command held are shortcuts, not notes; releases
/// always pass through.
pub fn note_messages(events: &[Event], mapping: &KeyboardMapping) -> Vec<SynthMessage> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Key { key, pressed, repeat, modifiers, .. } => {
                let note = key_id(*key).and_then(|id| mapping.note_for(id))?;
                let shortcut = modifiers.ctrl || modifiers.command;
                match (*pressed, *repeat) {
                    (true, false) if !shortcut => Some(SynthMessage::NoteOn(note)),
                    (true, _) => None,
                    (false, _) => Some(SynthMessage::NoteOff(note)),
                }
            },
            _ => None,
        })
        .collect()
}
