use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use std::sync::{Arc, RwLock};

use super::SynthMessage;
use crate::core::midi::NoteOutput;
use crate::core::piano::Piano;
use crate::core::synth::Synth;

/// Upper bound on messages applied per UI frame
pub const MAX_MESSAGES_PER_FRAME: usize = 256;

/// MessageBus carries input events from widgets to the note controller
pub struct MessageBus {
    sender: Sender<SynthMessage>,
    receiver: Receiver<SynthMessage>,
    synth_ref: Arc<RwLock<Synth>>,
}

impl MessageBus {
    /// Create a new message bus connected to the synth graph
    pub fn new(synth: Arc<RwLock<Synth>>) -> Self {
        let (sender, receiver) = unbounded();

        MessageBus {
            sender,
            receiver,
            synth_ref: synth,
        }
    }

    /// Get a sender that can be cloned and passed to UI components
    pub fn sender(&self) -> Sender<SynthMessage> {
        self.sender.clone()
    }

    /// Send a message from the owner of the bus
    pub fn send(&self, msg: SynthMessage) {
        // The bus holds its own receiver, so this cannot disconnect
        self.sender.send(msg).ok();
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Apply up to `max_messages` queued messages in order, then pass the
    /// resulting device messages on once the graph lock is released.
    /// Returns the number applied.
    pub fn process_messages<O: NoteOutput>(&self, piano: &mut Piano<O>, max_messages: usize) -> usize {
        if self.receiver.is_empty() {
            return 0;
        }

        let count = {
            let mut synth = match self.synth_ref.write() {
                Ok(guard) => guard,
                Err(_) => {
                    warn!("Synth graph lock poisoned; dropping {} messages", self.receiver.len());
                    while self.receiver.try_recv().is_ok() {}
                    return 0;
                }
            };

            let mut count = 0;
            while count < max_messages {
                let Ok(msg) = self.receiver.try_recv() else {
                    break;
                };
                Self::handle_message(msg, piano, &mut synth);
                count += 1;
            }
            count
        };

        piano.flush_output();
        if self.pending() > 0 {
            debug!("{} messages deferred to the next frame", self.pending());
        }
        count
    }

    /// Handle an individual message
    fn handle_message<O: NoteOutput>(msg: SynthMessage, piano: &mut Piano<O>, synth: &mut Synth) {
        match msg {
            SynthMessage::NoteOn(note) => {
                piano.note_on(note, synth);
            },
            SynthMessage::NoteOff(note) => {
                piano.note_off(note, synth);
            },
            SynthMessage::StopAll => {
                piano.stop_all(synth);
            },
            SynthMessage::SetVolume(percent) => {
                piano.set_volume_percent(percent, synth);
            },
            SynthMessage::SetWaveform(waveform) => {
                piano.set_waveform(waveform);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::midi::testing::RecordingOutput;
    use crate::core::midi::MidiMessage;
    use crate::core::oscillator::{Note, Waveform};

    /// Records whether the graph lock was free each time a message arrived
    struct LockCheckingOutput {
        synth: Arc<RwLock<Synth>>,
        lock_was_free: Vec<bool>,
    }

    impl NoteOutput for LockCheckingOutput {
        fn send(&mut self, _message: MidiMessage) {
            self.lock_was_free.push(self.synth.try_write().is_ok());
        }
    }

    fn note(n: u8) -> Note {
        Note::new(n).unwrap()
    }

    fn setup() -> (MessageBus, Piano<RecordingOutput>, Arc<RwLock<Synth>>) {
        let synth = Arc::new(RwLock::new(Synth::new(44_100.0)));
        let bus = MessageBus::new(Arc::clone(&synth));
        (bus, Piano::new(RecordingOutput::default()), synth)
    }

    #[test]
    fn test_messages_are_applied_in_dispatch_order() {
        let (bus, mut piano, synth) = setup();
        let sender = bus.sender();
        sender.send(SynthMessage::NoteOn(note(60))).unwrap();
        sender.send(SynthMessage::NoteOff(note(60))).unwrap();
        sender.send(SynthMessage::NoteOn(note(64))).unwrap();

        assert_eq!(bus.process_messages(&mut piano, MAX_MESSAGES_PER_FRAME), 3);
        assert_eq!(piano.active_notes(), vec![note(64)]);
        assert_eq!(synth.read().unwrap().voice_count(), 1);
        assert_eq!(
            piano.output().bytes(),
            vec![[0x90, 60, 0x7F], [0x80, 60, 0x7F], [0x90, 64, 0x7F]]
        );
    }

    #[test]
    fn test_batch_limit_leaves_rest_queued() {
        let (bus, mut piano, _synth) = setup();
        for n in 60..70 {
            bus.send(SynthMessage::NoteOn(note(n)));
        }
        assert_eq!(bus.process_messages(&mut piano, 4), 4);
        assert_eq!(bus.pending(), 6);
        assert_eq!(bus.process_messages(&mut piano, MAX_MESSAGES_PER_FRAME), 6);
        assert_eq!(piano.active_notes().len(), 10);
    }

    #[test]
    fn test_controls_reach_master_bus_and_selector() {
        let (bus, mut piano, synth) = setup();
        bus.send(SynthMessage::SetVolume(20.0));
        bus.send(SynthMessage::SetWaveform(Waveform::Triangle));
        bus.send(SynthMessage::NoteOn(note(62)));
        bus.send(SynthMessage::StopAll);
        bus.process_messages(&mut piano, MAX_MESSAGES_PER_FRAME);

        assert!((synth.read().unwrap().master.volume() - 0.2).abs() < 1e-6);
        assert_eq!(piano.waveform(), Waveform::Triangle);
        assert!(piano.active_notes().is_empty());
        assert_eq!(synth.read().unwrap().voice_count(), 0);
    }

    #[test]
    fn test_device_is_written_with_graph_unlocked() {
        let synth = Arc::new(RwLock::new(Synth::new(44_100.0)));
        let bus = MessageBus::new(Arc::clone(&synth));
        let mut piano = Piano::new(LockCheckingOutput {
            synth: Arc::clone(&synth),
            lock_was_free: Vec::new(),
        });

        bus.send(SynthMessage::NoteOn(note(60)));
        bus.send(SynthMessage::NoteOn(note(67)));
        bus.send(SynthMessage::StopAll);
        assert_eq!(bus.process_messages(&mut piano, MAX_MESSAGES_PER_FRAME), 3);

        assert_eq!(piano.output().lock_was_free, vec![true; 4]);
    }

    #[test]
    fn test_empty_queue_is_a_no_op() {
        let (bus, mut piano, _synth) = setup();
        assert_eq!(bus.process_messages(&mut piano, MAX_MESSAGES_PER_FRAME), 0);
    }
}
