mod oscilloscope;
mod piano_keyboard;
mod waveform_plot;

pub use oscilloscope::{show_oscilloscope, PainterSurface};
pub use piano_keyboard::PianoKeyboard;
pub use waveform_plot::WaveformPlot;
