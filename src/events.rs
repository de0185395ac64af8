//! Notifications from the workstation to anything watching it.
//!
//! Panels subscribe to the bus and react to state changes without polling
//! the whole facade. Callbacks run synchronously on the emitting thread.

use crate::catalog::kits::{InstrumentId, KitId};
use crate::catalog::notes::NoteKey;
use crate::dsp::oscillator::Waveform;

#[derive(Debug, Clone, PartialEq)]
pub enum StationEvent {
    EngineReady,
    NoteOn { key: NoteKey },
    NoteOff { key: NoteKey },
    DrumHit { kit: KitId, instrument: InstrumentId },
    DrumSequencerStarted,
    DrumSequencerStopped,
    KitChanged { kit: KitId },
    MelodyStarted { preset: &'static str },
    MelodyStopped,
    OctaveChanged { octave: i32 },
    WaveformChanged { waveform: Waveform },
    RecordingStarted,
    RecordingStopped,
    LoopAdded { id: u64 },
    LoopDeleted { id: u64 },
    LoopPlaybackStarted { id: u64 },
    LoopPlaybackStopped,
}

type Callback = Box<dyn FnMut(&StationEvent) + Send>;

/// Token returned by `subscribe`; pass it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(u64, Callback)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&StationEvent) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        Subscription(id)
    }

    /// Remove a subscriber. Unknown tokens are ignored.
    pub fn unsubscribe(&mut self, token: Subscription) {
        self.subscribers.retain(|(id, _)| *id != token.0);
    }

    pub fn emit(&mut self, event: StationEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(&event);
        }
    }
}
