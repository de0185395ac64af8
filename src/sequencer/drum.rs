use crate::catalog::drum_presets::DrumPresetDef;
use crate::catalog::kits::{kit, InstrumentId, KitId};
use crate::catalog::{DEFAULT_BPM, MAX_BPM, MIN_BPM, STEP_COUNT};

use super::{step_period_frames, StepSink};

/// Velocity every programmed step fires with.
const STEP_VELOCITY: f32 = 0.8;

/// One row of on/off cells per instrument in the kit.
#[derive(Debug, Clone, PartialEq)]
pub struct DrumPattern {
    kit: KitId,
    rows: Vec<(InstrumentId, [bool; STEP_COUNT])>,
}

impl DrumPattern {
    pub fn empty(kit_id: KitId) -> Self {
        Self {
            kit: kit_id,
            rows: kit(kit_id)
                .instruments
                .iter()
                .map(|pad| (pad.id, [false; STEP_COUNT]))
                .collect(),
        }
    }

    pub fn from_preset(preset: &DrumPresetDef) -> Self {
        let mut pattern = Self::empty(preset.kit);
        for (instrument, steps) in preset.rows {
            for &step in *steps {
                pattern.set(instrument, step, true);
            }
        }
        pattern
    }

    pub fn kit(&self) -> KitId {
        self.kit
    }

    pub fn rows(&self) -> impl Iterator<Item = (InstrumentId, &[bool; STEP_COUNT])> {
        self.rows.iter().map(|(id, cells)| (*id, cells))
    }

    pub fn is_active(&self, instrument: InstrumentId, step: usize) -> bool {
        self.rows
            .iter()
            .find(|(id, _)| *id == instrument)
            .is_some_and(|(_, cells)| cells[step % STEP_COUNT])
    }

    pub fn set(&mut self, instrument: InstrumentId, step: usize, on: bool) {
        if let Some((_, cells)) = self.rows.iter_mut().find(|(id, _)| *id == instrument) {
            cells[step % STEP_COUNT] = on;
        }
    }

    /// Flip one cell and return its new state.
    pub fn toggle(&mut self, instrument: InstrumentId, step: usize) -> bool {
        let on = !self.is_active(instrument, step);
        self.set(instrument, step, on);
        on
    }

    pub fn clear(&mut self) {
        for (_, cells) in &mut self.rows {
            cells.fill(false);
        }
    }
}

/// 16-step drum machine clock. While running it walks the pattern one step
/// per period and fires every programmed pad into the sink.
pub struct DrumSequencer {
    pattern: DrumPattern,
    bpm: f32,
    running: bool,
    step: Option<usize>,
    to_next_tick: u64,
}

impl DrumSequencer {
    pub fn new(kit_id: KitId) -> Self {
        Self {
            pattern: DrumPattern::empty(kit_id),
            bpm: DEFAULT_BPM,
            running: false,
            step: None,
            to_next_tick: 0,
        }
    }

    pub fn pattern(&self) -> &DrumPattern {
        &self.pattern
    }

    pub fn pattern_mut(&mut self) -> &mut DrumPattern {
        &mut self.pattern
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Step currently sounding, for the grid highlight. `None` when stopped
    /// or before the first tick.
    pub fn current_step(&self) -> Option<usize> {
        self.step
    }

    /// Start from step 0. The first tick fires at the very start of the
    /// next processed block, not one period later.
    pub fn start(&mut self) {
        self.running = true;
        self.step = None;
        self.to_next_tick = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.step = None;
    }

    /// Change tempo. Takes effect from the next tick; the step position is
    /// kept so a live tempo ride does not restart the bar.
    pub fn set_bpm(&mut self, bpm: f32, sample_rate: f32) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        if self.running && self.step.is_some() {
            self.to_next_tick = step_period_frames(self.bpm, sample_rate);
        }
    }

    /// Switching kits resets the pattern: the new kit's pads do not line up
    /// with the old rows.
    pub fn set_kit(&mut self, kit_id: KitId) {
        self.pattern = DrumPattern::empty(kit_id);
    }

    pub fn load_preset(&mut self, preset: &DrumPresetDef, sample_rate: f32) {
        self.pattern = DrumPattern::from_preset(preset);
        self.set_bpm(preset.bpm, sample_rate);
    }

    /// Advance the clock across a block of `frames` frames, firing every
    /// tick that lands inside it at its exact offset.
    pub fn process<S: StepSink>(&mut self, frames: u64, sample_rate: f32, sink: &mut S) {
        if !self.running {
            return;
        }
        let mut pos = 0u64;
        while pos + self.to_next_tick < frames {
            pos += self.to_next_tick;
            self.tick(pos as u32, sink);
            self.to_next_tick = step_period_frames(self.bpm, sample_rate);
        }
        self.to_next_tick -= frames - pos;
    }

    fn tick<S: StepSink>(&mut self, offset: u32, sink: &mut S) {
        let step = self.step.map_or(0, |s| (s + 1) % STEP_COUNT);
        self.step = Some(step);
        let kit_id = self.pattern.kit;
        for (instrument, cells) in &self.pattern.rows {
            if cells[step] {
                sink.drum_hit(kit_id, instrument, STEP_VELOCITY, offset);
            }
        }
    }
}
