mod master;
mod midi_config;

pub use master::MasterPanel;
pub use midi_config::MidiConfigPanel;
