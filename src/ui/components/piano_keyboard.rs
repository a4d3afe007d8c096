use crossbeam_channel::Sender;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};

use crate::core::input::KeyboardMapping;
use crate::core::oscillator::Note;
use crate::messaging::SynthMessage;

pub const WHITE_KEY_WIDTH: f32 = 56.0;
pub const KEY_HEIGHT: f32 = 200.0;
const BLACK_KEY_WIDTH_RATIO: f32 = 0.6;
const BLACK_KEY_HEIGHT_RATIO: f32 = 0.62;

const ACTIVE_WHITE: Color32 = Color32::from_rgb(120, 200, 255);
const ACTIVE_BLACK: Color32 = Color32::from_rgb(40, 120, 200);

/// Where a key sits on screen
#[derive(Debug, Clone, PartialEq)]
pub struct KeyShape {
    pub note: Note,
    pub rect: Rect,
    pub black: bool,
}

/// Lay out `notes` left to right: white keys side by side, black keys
/// straddling the boundary with the previous white key
pub fn layout_keys(notes: &[Note], origin: Pos2, white_width: f32, height: f32) -> Vec<KeyShape> {
    let black_width = white_width * BLACK_KEY_WIDTH_RATIO;
    let mut whites = 0usize;

    notes
        .iter()
        .map(|note| {
            if note.is_black_key() {
                let x = (origin.x + whites as f32 * white_width - black_width / 2.0).max(origin.x);
                KeyShape {
                    note: *note,
                    rect: Rect::from_min_size(
                        Pos2::new(x, origin.y),
                        Vec2::new(black_width, height * BLACK_KEY_HEIGHT_RATIO),
                    ),
                    black: true,
                }
            } else {
                let x = origin.x + whites as f32 * white_width;
                whites += 1;
                KeyShape {
                    note: *note,
                    rect: Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(white_width, height)),
                    black: false,
                }
            }
        })
        .collect()
}

/// The key under `pos`. Black keys are drawn on top, so they win.
pub fn key_at(keys: &[KeyShape], pos: Pos2) -> Option<Note> {
    keys.iter()
        .filter(|k| k.black)
        .chain(keys.iter().filter(|k| !k.black))
        .find(|k| k.rect.contains(pos))
        .map(|k| k.note)
}

/// Pointer state over the keyboard for one frame
#[derive(Debug, Clone, Copy)]
struct PointerSample {
    held: bool,
    clicked: bool,
    note: Option<Note>,
}

/// Turns per-frame pointer samples into note messages
#[derive(Debug, Default)]
struct PressTracker {
    pressed: Option<Note>,
    release_next_frame: Option<Note>,
}

impl PressTracker {
    fn update(&mut self, sample: PointerSample) -> Vec<SynthMessage> {
        let mut messages = Vec::new();
        if let Some(note) = self.release_next_frame.take() {
            messages.push(SynthMessage::NoteOff(note));
        }

        if sample.held {
            if self.pressed.is_none() {
                messages.extend(sample.note.map(SynthMessage::NoteOn));
                self.pressed = sample.note;
            }
        } else {
            // Press and release landed in the same frame, after the global
            // release was already queued: sound the note for one frame
            if self.pressed.is_none() && sample.clicked {
                if let Some(note) = sample.note {
                    messages.push(SynthMessage::NoteOn(note));
                    self.release_next_frame = Some(note);
                }
            }
            self.pressed = None;
        }
        messages
    }
}

/// On-screen keyboard. Pointer presses send note-on; releases are handled
/// globally by the app.
pub struct PianoKeyboard {
    sender: Sender<SynthMessage>,
    notes: Vec<Note>,
    labels: Vec<(Note, char)>,
    tracker: PressTracker,
}

impl PianoKeyboard {
    pub fn new(sender: Sender<SynthMessage>, notes: Vec<Note>, mapping: &KeyboardMapping) -> Self {
        let labels = notes
            .iter()
            .filter_map(|n| mapping.key_for(*n).map(|k| (*n, k.as_char().to_ascii_uppercase())))
            .collect();
        Self {
            sender,
            notes,
            labels,
            tracker: PressTracker::default(),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, is_active: impl Fn(Note) -> bool) {
        let white_count = self.notes.iter().filter(|n| !n.is_black_key()).count().max(1);
        let size = Vec2::new(white_count as f32 * WHITE_KEY_WIDTH, KEY_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let keys = layout_keys(&self.notes, response.rect.min, WHITE_KEY_WIDTH, KEY_HEIGHT);

        for key in keys.iter().filter(|k| !k.black).chain(keys.iter().filter(|k| k.black)) {
            let fill = match (key.black, is_active(key.note)) {
                (false, false) => Color32::WHITE,
                (false, true) => ACTIVE_WHITE,
                (true, false) => Color32::from_gray(20),
                (true, true) => ACTIVE_BLACK,
            };
            painter.rect_filled(key.rect, 3.0, fill);
            painter.rect_stroke(key.rect, 3.0, Stroke::new(1.0, Color32::from_gray(60)), StrokeKind::Inside);

            if let Some((_, label)) = self.labels.iter().find(|(n, _)| *n == key.note) {
                let text_color = if key.black { Color32::WHITE } else { Color32::from_gray(40) };
                painter.text(
                    key.rect.center_bottom() - Vec2::new(0.0, 14.0),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(14.0),
                    text_color,
                );
            }
        }

        let sample = PointerSample {
            held: response.is_pointer_button_down_on(),
            clicked: response.clicked(),
            note: response.interact_pointer_pos().and_then(|pos| key_at(&keys, pos)),
        };
        for msg in self.tracker.update(sample) {
            self.sender.send(msg).ok();
        }
    }
}
