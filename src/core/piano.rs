//! Note lifecycle controller: the registry plus everything a note event touches
//! outside the synth graph (device messages, waveform choice, volume policy).

use log::debug;

use crate::core::midi::{MidiMessage, NoteOutput};
use crate::core::oscillator::{Note, Waveform};
use crate::core::registry::NoteRegistry;
use crate::core::synth::bus::{volume_from_percent, GainStage, VoiceGain};
use crate::core::synth::Synth;

pub struct Piano<O: NoteOutput> {
    registry: NoteRegistry,
    output: O,
    waveform: Waveform,
    voice_gain: VoiceGain,
    volume_percent: f32,
    channel: u8,
    outbox: Vec<MidiMessage>,
}

impl<O: NoteOutput> Piano<O> {
    pub fn new(output: O) -> Self {
        Self {
            registry: NoteRegistry::new(),
            output,
            waveform: Waveform::default(),
            voice_gain: VoiceGain::default(),
            volume_percent: 50.0,
            channel: 0,
            outbox: Vec::new(),
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_voice_gain(mut self, voice_gain: VoiceGain) -> Self {
        self.voice_gain = voice_gain;
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel & 0x0F;
        self
    }

    /// Start `note`. Returns false when the note was already sounding, in
    /// which case nothing is created and nothing is queued for the device.
    pub fn note_on(&mut self, note: Note, synth: &mut Synth) -> bool {
        let gain = GainStage::frozen(self.voice_gain.level_for_new_voice(&synth.master));
        match self.registry.note_on(note, self.waveform, gain, synth) {
            Some(handle) => {
                debug!(
                    "Playing note {} ({:.2} Hz, {}, gain {:.2}) as {:?}",
                    note,
                    handle.frequency(),
                    handle.waveform(),
                    handle.gain(),
                    handle.id()
                );
                self.outbox.push(MidiMessage::note_on(self.channel, note));
                true
            },
            None => false,
        }
    }

    /// Stop `note`. Returns false when it was not sounding.
    pub fn note_off(&mut self, note: Note, synth: &mut Synth) -> bool {
        if !self.registry.note_off(note, synth) {
            return false;
        }
        debug!("Stopping note {}", note);
        self.outbox.push(MidiMessage::note_off(self.channel, note));
        true
    }

    /// Release every held note, e.g. on pointer release or focus loss.
    /// Returns how many voices were stopped.
    pub fn stop_all(&mut self, synth: &mut Synth) -> usize {
        let stopped = self.registry.stop_all(synth);
        let channel = self.channel;
        self.outbox.extend(stopped.iter().map(|note| MidiMessage::note_off(channel, *note)));
        if !stopped.is_empty() {
            debug!("Released {} held notes", stopped.len());
        }
        stopped.len()
    }

    /// Hand queued device messages to the output, oldest first.
    ///
    /// Device I/O happens here, so call it with the graph lock released.
    pub fn flush_output(&mut self) -> usize {
        let count = self.outbox.len();
        for message in self.outbox.drain(..) {
            self.output.send(message);
        }
        count
    }

    /// Shape for voices created from now on; sounding voices keep theirs
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Apply a 0-100 volume control position to the master bus
    pub fn set_volume_percent(&mut self, percent: f32, synth: &mut Synth) {
        self.volume_percent = percent.clamp(0.0, 100.0);
        synth.master.set_volume(volume_from_percent(self.volume_percent));
    }

    pub fn volume_percent(&self) -> f32 {
        self.volume_percent
    }

    pub fn is_active(&self, note: Note) -> bool {
        self.registry.is_active(note)
    }

    pub fn active_notes(&self) -> Vec<Note> {
        self.registry.active_notes()
    }

    #[cfg(test)]
    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::midi::testing::RecordingOutput;

    fn note(n: u8) -> Note {
        Note::new(n).unwrap()
    }

    fn setup() -> (Piano<RecordingOutput>, Synth) {
        (Piano::new(RecordingOutput::default()), Synth::new(44_100.0))
    }

    fn sent(piano: &mut Piano<RecordingOutput>) -> Vec<[u8; 3]> {
        piano.flush_output();
        piano.output().bytes()
    }

    #[test]
    fn test_single_note_scenario() {
        let (mut piano, mut synth) = setup();

        assert!(piano.note_on(note(60), &mut synth));
        assert_eq!(piano.active_notes(), vec![note(60)]);
        assert_eq!(sent(&mut piano), vec![[0x90, 60, 0x7F]]);
        assert_eq!(synth.voice_count(), 1);
        let voice = synth.voices().next().unwrap();
        assert!((voice.oscillator.frequency - 261.63).abs() < 0.01);

        // Key repeat or a second input source
        assert!(!piano.note_on(note(60), &mut synth));
        assert_eq!(piano.active_notes(), vec![note(60)]);
        assert_eq!(sent(&mut piano).len(), 1);
        assert_eq!(synth.voice_count(), 1);

        assert!(piano.note_off(note(60), &mut synth));
        assert!(piano.active_notes().is_empty());
        assert_eq!(sent(&mut piano)[1], [0x80, 60, 0x7F]);
        assert_eq!(synth.voice_count(), 0);
    }

    #[test]
    fn test_stop_all_releases_every_note() {
        let (mut piano, mut synth) = setup();
        piano.note_on(note(60), &mut synth);
        piano.note_on(note(64), &mut synth);

        assert_eq!(piano.stop_all(&mut synth), 2);
        assert!(piano.active_notes().is_empty());
        assert_eq!(synth.voice_count(), 0);

        let offs: Vec<[u8; 3]> = sent(&mut piano).into_iter().filter(|b| b[0] == 0x80).collect();
        assert_eq!(offs, vec![[0x80, 60, 0x7F], [0x80, 64, 0x7F]]);
    }

    #[test]
    fn test_stop_all_with_nothing_held() {
        let (mut piano, mut synth) = setup();
        assert_eq!(piano.stop_all(&mut synth), 0);
        assert!(sent(&mut piano).is_empty());
    }

    #[test]
    fn test_spurious_note_off_sends_nothing() {
        let (mut piano, mut synth) = setup();
        assert!(!piano.note_off(note(62), &mut synth));
        assert!(sent(&mut piano).is_empty());
        assert!(piano.registry().is_empty());
    }

    #[test]
    fn test_waveform_change_only_affects_new_voices() {
        let (mut piano, mut synth) = setup();
        piano.note_on(note(60), &mut synth);
        piano.set_waveform(Waveform::Square);
        piano.note_on(note(67), &mut synth);

        let first = piano.registry().get(note(60)).unwrap();
        let second = piano.registry().get(note(67)).unwrap();
        assert_eq!(first.waveform(), Waveform::Sine);
        assert_eq!(second.waveform(), Waveform::Square);
    }

    #[test]
    fn test_volume_zero_mutes_held_and_future_notes() {
        let (piano, mut synth) = setup();
        let mut piano = piano.with_voice_gain(VoiceGain::FrozenAtNoteOn);
        piano.set_volume_percent(80.0, &mut synth);
        piano.note_on(note(69), &mut synth);

        piano.set_volume_percent(0.0, &mut synth);
        piano.note_on(note(72), &mut synth);

        let mut buffer = [1.0f32; 512];
        synth.render(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));

        // Frozen gains are untouched by the later volume change
        assert!((piano.registry().get(note(69)).unwrap().gain() - 0.8).abs() < 1e-6);
        assert_eq!(piano.registry().get(note(72)).unwrap().gain(), 0.0);
    }

    #[test]
    fn test_unity_policy_uses_master_as_only_stage() {
        let (mut piano, mut synth) = setup();
        piano.set_volume_percent(25.0, &mut synth);
        piano.note_on(note(60), &mut synth);
        assert_eq!(piano.registry().get(note(60)).unwrap().gain(), 1.0);
        assert_eq!(synth.master.volume(), 0.25);
    }

    #[test]
    fn test_channel_is_applied_to_device_messages() {
        let (piano, mut synth) = setup();
        let mut piano = piano.with_channel(2);
        piano.note_on(note(65), &mut synth);
        assert_eq!(sent(&mut piano), vec![[0x92, 65, 0x7F]]);
    }

    #[test]
    fn test_device_messages_wait_for_flush() {
        let (mut piano, mut synth) = setup();
        piano.note_on(note(60), &mut synth);
        piano.note_on(note(64), &mut synth);
        piano.note_off(note(60), &mut synth);
        assert!(piano.output().sent.is_empty());

        assert_eq!(piano.flush_output(), 3);
        assert_eq!(
            piano.output().bytes(),
            vec![[0x90, 60, 0x7F], [0x90, 64, 0x7F], [0x80, 60, 0x7F]]
        );
        assert_eq!(piano.flush_output(), 0);
        assert_eq!(piano.output().sent.len(), 3);
    }
}
