//! Step clocks for the drum machine and the melody line.
//!
//! Both sequencers count frames, not wall time: `process(frames, ...)` is
//! told how many frames the engine is about to render, and every tick that
//! falls inside that window fires with its exact in-block frame offset.
//! Tempo therefore never drifts against the audio clock, and two sequencers
//! driven by the same render loop stay locked to each other.

pub mod drum;
pub mod melody;

use crate::catalog::kits::{InstrumentId, KitId};
use crate::catalog::notes::NoteKey;

/// Receiver for sequencer triggers. The engine facade implements this by
/// forwarding to `note_on_at` / `play_drum_at` with the given offset.
pub trait StepSink {
    fn drum_hit(&mut self, kit: KitId, instrument: InstrumentId, velocity: f32, offset: u32);
    fn note_on(&mut self, key: NoteKey, offset: u32);
    fn note_off(&mut self, key: NoteKey, offset: u32);
}

/// Frames per sixteenth-note step. A step is a quarter of a beat.
pub fn step_period_frames(bpm: f32, sample_rate: f32) -> u64 {
    (60.0 / bpm as f64 / 4.0 * sample_rate as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_period_at_120_bpm() {
        // 120 BPM: a beat is 0.5 s, a step 0.125 s.
        assert_eq!(step_period_frames(120.0, 48_000.0), 6_000);
        assert_eq!(step_period_frames(120.0, 44_100.0), 5_513);
    }
}
