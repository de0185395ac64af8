use crate::catalog::melody_presets::{MelodyNote, MelodyPreset};
use crate::catalog::notes::NoteKey;

use super::{step_period_frames, StepSink};

/// Plays a factory melody on the synth voice. Notes are held across steps:
/// a note sounds while the current step lies inside its interval and is
/// released on the first step past it, so releases key off the same clock
/// as attacks.
pub struct MelodySequencer {
    preset: &'static MelodyPreset,
    running: bool,
    step: Option<usize>,
    to_next_tick: u64,
    active: Vec<MelodyNote>,
}

impl MelodySequencer {
    pub fn new(preset: &'static MelodyPreset) -> Self {
        Self {
            preset,
            running: false,
            step: None,
            to_next_tick: 0,
            active: Vec::new(),
        }
    }

    pub fn preset(&self) -> &'static MelodyPreset {
        self.preset
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_step(&self) -> Option<usize> {
        self.step
    }

    /// Swap melodies. Anything still sounding is released first.
    pub fn set_preset<S: StepSink>(&mut self, preset: &'static MelodyPreset, sink: &mut S) {
        self.release_all(sink);
        self.preset = preset;
        self.step = None;
        self.to_next_tick = 0;
    }

    pub fn start(&mut self) {
        self.running = true;
        self.step = None;
        self.to_next_tick = 0;
    }

    /// Stop and release every held note immediately.
    pub fn stop<S: StepSink>(&mut self, sink: &mut S) {
        self.running = false;
        self.step = None;
        self.release_all(sink);
    }

    pub fn process<S: StepSink>(&mut self, frames: u64, sample_rate: f32, sink: &mut S) {
        if !self.running {
            return;
        }
        let mut pos = 0u64;
        while pos + self.to_next_tick < frames {
            pos += self.to_next_tick;
            self.tick(pos as u32, sink);
            self.to_next_tick = step_period_frames(self.preset.bpm, sample_rate);
        }
        self.to_next_tick -= frames - pos;
    }

    fn tick<S: StepSink>(&mut self, offset: u32, sink: &mut S) {
        let length = self.preset.length;
        let step = self.step.map_or(0, |s| (s + 1) % length);
        self.step = Some(step);

        // Release pass first, so a note ending here frees its key before a
        // new note on the same key starts.
        self.active.retain(|note| {
            if covers(note, step, length) {
                true
            } else {
                sink.note_off(key_of(note), offset);
                false
            }
        });

        for note in self.preset.notes {
            if note.start != step {
                continue;
            }
            let key = key_of(note);
            // A key still inside an earlier interval is left ringing.
            if self.active.iter().any(|held| key_of(held) == key) {
                continue;
            }
            sink.note_on(key, offset);
            self.active.push(*note);
        }
    }

    fn release_all<S: StepSink>(&mut self, sink: &mut S) {
        for note in self.active.drain(..) {
            sink.note_off(key_of(&note), 0);
        }
    }
}

fn key_of(note: &MelodyNote) -> NoteKey {
    (note.pitch, note.octave)
}

/// Whether `step` falls inside the note's interval, loop wrap included.
fn covers(note: &MelodyNote, step: usize, length: usize) -> bool {
    (step + length - note.start) % length < note.duration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kits::{InstrumentId, KitId};
    use crate::catalog::melody_presets::melody_preset;
    use crate::catalog::notes::PitchClass;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[derive(Default)]
    struct NoteLog {
        events: Vec<(bool, NoteKey, u64)>, // (on, key, absolute frame)
        base: u64,
    }

    impl StepSink for NoteLog {
        fn drum_hit(&mut self, _: KitId, _: InstrumentId, _: f32, _: u32) {}
        fn note_on(&mut self, key: NoteKey, offset: u32) {
            self.events.push((true, key, self.base + offset as u64));
        }
        fn note_off(&mut self, key: NoteKey, offset: u32) {
            self.events.push((false, key, self.base + offset as u64));
        }
    }

    fn run(seq: &mut MelodySequencer, sink: &mut NoteLog, blocks: usize, block: u64) {
        for _ in 0..blocks {
            seq.process(block, SAMPLE_RATE, sink);
            sink.base += block;
        }
    }

    #[test]
    fn notes_are_released_when_their_interval_ends() {
        // happy-scale: every note lasts 2 steps, so each key gets an off
        // exactly two ticks after its on.
        let preset = melody_preset("happy-scale").unwrap();
        let period = step_period_frames(preset.bpm, SAMPLE_RATE);
        let mut seq = MelodySequencer::new(preset);
        seq.start();

        let mut log = NoteLog::default();
        run(&mut seq, &mut log, preset.length + 2, period);

        let first_key = (PitchClass::C, 4);
        let on = log
            .events
            .iter()
            .find(|(on, key, _)| *on && *key == first_key)
            .unwrap();
        let off = log
            .events
            .iter()
            .find(|(on, key, _)| !*on && *key == first_key)
            .unwrap();
        assert_eq!(off.2 - on.2, 2 * period);
    }

    #[test]
    fn a_held_key_is_not_retriggered() {
        let preset = melody_preset("twinkle").unwrap();
        let period = step_period_frames(preset.bpm, SAMPLE_RATE);
        let mut seq = MelodySequencer::new(preset);
        seq.start();

        let mut log = NoteLog::default();
        run(&mut seq, &mut log, preset.length, period);

        // Within one pass, ons and offs for each key must alternate.
        for note in preset.notes {
            let key = (note.pitch, note.octave);
            let mut held = false;
            for (on, k, _) in &log.events {
                if *k != key {
                    continue;
                }
                assert_ne!(*on, held, "double {} for {:?}", if *on { "on" } else { "off" }, key);
                held = *on;
            }
        }
    }

    #[test]
    fn a_four_step_note_gets_one_on_and_one_off() {
        // minor-melody holds C5 for steps [4, 8) and nowhere else.
        let preset = melody_preset("minor-melody").unwrap();
        let period = step_period_frames(preset.bpm, SAMPLE_RATE);
        let mut seq = MelodySequencer::new(preset);
        seq.start();

        let mut log = NoteLog::default();
        run(&mut seq, &mut log, preset.length, period);

        let key = (PitchClass::C, 5);
        let events: Vec<(bool, u64)> = log
            .events
            .iter()
            .filter(|(_, k, _)| *k == key)
            .map(|(on, _, at)| (*on, *at))
            .collect();
        assert_eq!(events, vec![(true, 4 * period), (false, 8 * period)]);
    }

    #[test]
    fn stop_releases_everything() {
        let preset = melody_preset("twinkle").unwrap();
        let period = step_period_frames(preset.bpm, SAMPLE_RATE);
        let mut seq = MelodySequencer::new(preset);
        seq.start();

        let mut log = NoteLog::default();
        run(&mut seq, &mut log, 1, period);
        assert!(log.events.iter().any(|(on, ..)| *on));

        seq.stop(&mut log);
        let ons: i32 = log
            .events
            .iter()
            .map(|(on, ..)| if *on { 1 } else { -1 })
            .sum();
        assert_eq!(ons, 0, "every on must be balanced by an off after stop");
        assert_eq!(seq.current_step(), None);
    }

    #[test]
    fn loop_wraps_back_to_step_zero() {
        let preset = melody_preset("synth-arp").unwrap();
        let period = step_period_frames(preset.bpm, SAMPLE_RATE);
        let mut seq = MelodySequencer::new(preset);
        seq.start();

        let mut log = NoteLog::default();
        run(&mut seq, &mut log, preset.length + 4, period);

        // C5 appears only at step 3 of the arp, so the gap between its two
        // triggers is exactly one full pass.
        let unique_key = (PitchClass::C, 5);
        let ons: Vec<u64> = log
            .events
            .iter()
            .filter(|(on, key, _)| *on && *key == unique_key)
            .map(|(.., at)| *at)
            .collect();
        assert_eq!(ons.len(), 2, "note should come around exactly once more");
        assert_eq!(ons[1] - ons[0], preset.length as u64 * period);
    }
}
