//! The mixer and master bus.
//!
//! `AudioEngine` owns every sounding voice and the persistent master chain:
//!
//! ```text
//! sum(voices, drums, loop) -> master gain -> state-variable filter
//!     -> delay network (feedback capped) -> analysis tap -> output
//! ```
//!
//! It advances a monotonic frame counter while rendering; that counter is
//! the clock every parameter timeline and cleanup deadline is scheduled
//! against, so nothing here depends on wall time.

mod voice;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::kits::{InstrumentId, KitId};
use crate::catalog::notes::NoteKey;
use crate::dsp::delay::{DelayLine, MAX_DELAY_SECS};
use crate::dsp::envelope::{schedule_attack, schedule_release, Adsr};
use crate::dsp::filter::{coefficients, FilterMode, SvFilter};
use crate::dsp::oscillator::Waveform;
use crate::dsp::param::AudioParam;
use crate::voices::{self, DrumVoice};
use crate::MAX_BLOCK_SIZE;

use voice::TonalVoice;

/// Feedback above this turns the delay into a self-oscillating screech.
pub const MAX_FEEDBACK: f32 = 0.95;

/// Smoothing time constant for the live parameter setters.
const SETTER_TAU: f64 = 0.01;

/// Extra silent margin between envelope end and voice teardown.
const STOP_MARGIN: f64 = 0.01;
const DISPOSE_MARGIN: f64 = 0.05;

const SCOPE_RING: usize = 8_192;
const RECORD_RING: usize = 1 << 17;

/// Master-chain settings, as a value so panels and presets can hold one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectsConfig {
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub filter_mode: FilterMode,
    pub delay_time: f32,
    pub feedback: f32,
    pub delay_mix: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: 8_000.0,
            resonance: 1.0,
            filter_mode: FilterMode::LowPass,
            delay_time: 0.3,
            feedback: 0.3,
            delay_mix: 0.0,
        }
    }
}

/// Consumer side of the post-master sample feed for the oscilloscope.
pub struct AnalysisTap {
    rx: rtrb::Consumer<f32>,
}

impl AnalysisTap {
    pub fn pop(&mut self) -> Option<f32> {
        self.rx.pop().ok()
    }
}

/// Handle to the engine's capture feed. Cloning shares the same underlying
/// ring, so asking for the stream twice observes one recording, not two.
#[derive(Clone)]
pub struct RecordingStream {
    rx: Arc<Mutex<rtrb::Consumer<f32>>>,
    sample_rate: f32,
}

impl RecordingStream {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Move every buffered sample into `into`.
    pub fn drain(&self, into: &mut Vec<f32>) {
        let mut rx = self.rx.lock().unwrap_or_else(|e| e.into_inner());
        while let Ok(sample) = rx.pop() {
            into.push(sample);
        }
    }

    pub fn shares_ring_with(&self, other: &RecordingStream) -> bool {
        Arc::ptr_eq(&self.rx, &other.rx)
    }
}

pub struct AudioEngine {
    sample_rate: f32,
    frames: u64,

    master_gain: AudioParam,
    cutoff: AudioParam,
    resonance: AudioParam,
    filter: SvFilter,

    delay: DelayLine,
    delay_time: AudioParam,
    feedback: AudioParam,
    wet: AudioParam,

    notes: HashMap<NoteKey, TonalVoice>,
    released: Vec<TonalVoice>,
    drums: Vec<DrumVoice>,
    loop_playback: Option<(Arc<[f32]>, usize)>,

    scope_tx: rtrb::Producer<f32>,
    scope_rx: Option<rtrb::Consumer<f32>>,
    record_tx: Option<rtrb::Producer<f32>>,
    record_stream: Option<RecordingStream>,
}

impl AudioEngine {
    pub fn new(sample_rate: f32) -> Self {
        let effects = EffectsConfig::default();
        let (scope_tx, scope_rx) = rtrb::RingBuffer::new(SCOPE_RING);
        Self {
            sample_rate,
            frames: 0,
            master_gain: AudioParam::new(0.5),
            cutoff: AudioParam::new(effects.cutoff_hz),
            resonance: AudioParam::new(effects.resonance),
            filter: SvFilter::new(effects.filter_mode),
            delay: DelayLine::new(sample_rate),
            delay_time: AudioParam::new(effects.delay_time),
            feedback: AudioParam::new(effects.feedback),
            wet: AudioParam::new(effects.delay_mix),
            notes: HashMap::new(),
            released: Vec::new(),
            drums: Vec::new(),
            loop_playback: None,
            scope_tx,
            scope_rx: Some(scope_rx),
            record_tx: None,
            record_stream: None,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current engine time in seconds. Advances only while rendering.
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn active_notes(&self) -> usize {
        self.notes.len()
    }

    /// Start a note `offset` frames into the next render block. A note
    /// already sounding on the same key is force-released first with a
    /// 10 ms tail so retriggering clicks instead of clips.
    pub fn note_on_at(
        &mut self,
        key: NoteKey,
        frequency: f32,
        waveform: Waveform,
        envelope: &Adsr,
        offset: u32,
    ) {
        let start_frame = self.frames + offset as u64;
        let start = start_frame as f64 / self.sample_rate as f64;

        if let Some(mut old) = self.notes.remove(&key) {
            let end = schedule_release(&mut old.gain, &Adsr::fast_release(0.01), start);
            old.stop_at = end + STOP_MARGIN;
            old.dispose_at = end + DISPOSE_MARGIN;
            self.released.push(old);
        }

        let mut voice = TonalVoice::new(frequency, waveform, start_frame, start);
        schedule_attack(&mut voice.gain, envelope, start);
        self.notes.insert(key, voice);
    }

    /// Release a note. No-op when the key is not sounding. The voice leaves
    /// the key registry immediately but keeps rendering its release tail
    /// until the disposal deadline passes on the engine clock.
    pub fn note_off_at(&mut self, key: NoteKey, envelope: &Adsr, offset: u32) {
        let Some(mut voice) = self.notes.remove(&key) else {
            return;
        };
        let start = (self.frames + offset as u64) as f64 / self.sample_rate as f64;
        let end = schedule_release(&mut voice.gain, envelope, start);
        voice.stop_at = end + STOP_MARGIN;
        voice.dispose_at = end + DISPOSE_MARGIN;
        self.released.push(voice);
    }

    pub fn play_drum_at(
        &mut self,
        kit: KitId,
        instrument: InstrumentId,
        velocity: f32,
        offset: u32,
    ) {
        let voice = voices::build(kit, instrument, velocity, self.sample_rate).with_offset(offset);
        self.drums.push(voice);
    }

    // Live setters glide over ~10 ms rather than jumping, matching what a
    // hand on a physical knob sounds like.

    pub fn set_master_volume(&mut self, volume: f32) {
        let now = self.now();
        self.master_gain
            .set_target(now, volume.clamp(0.0, 1.0), SETTER_TAU);
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let now = self.now();
        self.cutoff
            .set_target(now, cutoff_hz.clamp(20.0, 20_000.0), SETTER_TAU);
    }

    pub fn set_resonance(&mut self, q: f32) {
        let now = self.now();
        self.resonance.set_target(now, q.clamp(0.5, 20.0), SETTER_TAU);
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter.set_mode(mode);
    }

    pub fn set_delay_time(&mut self, secs: f32) {
        let now = self.now();
        self.delay_time
            .set_target(now, secs.clamp(0.0, MAX_DELAY_SECS), SETTER_TAU);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        let now = self.now();
        self.feedback
            .set_target(now, feedback.clamp(0.0, MAX_FEEDBACK), SETTER_TAU);
    }

    pub fn set_delay_mix(&mut self, mix: f32) {
        let now = self.now();
        self.wet.set_target(now, mix.clamp(0.0, 1.0), SETTER_TAU);
    }

    pub fn apply_effects(&mut self, effects: &EffectsConfig) {
        self.set_cutoff(effects.cutoff_hz);
        self.set_resonance(effects.resonance);
        self.set_filter_mode(effects.filter_mode);
        self.set_delay_time(effects.delay_time);
        self.set_feedback(effects.feedback);
        self.set_delay_mix(effects.delay_mix);
    }

    /// Start looping a stored take, summed into the bus before the master
    /// chain. Replaces any loop already playing.
    pub fn play_loop(&mut self, samples: Arc<[f32]>) {
        if samples.is_empty() {
            return;
        }
        self.loop_playback = Some((samples, 0));
    }

    pub fn stop_loop(&mut self) {
        self.loop_playback = None;
    }

    pub fn loop_playing(&self) -> bool {
        self.loop_playback.is_some()
    }

    /// Hand out the oscilloscope feed. The tap exists once; later calls
    /// return `None`.
    pub fn take_analysis_tap(&mut self) -> Option<AnalysisTap> {
        self.scope_rx.take().map(|rx| AnalysisTap { rx })
    }

    /// Hand out the capture feed, creating it on first use. Every call
    /// returns a handle to the same ring.
    pub fn recording_stream(&mut self) -> RecordingStream {
        if let Some(stream) = &self.record_stream {
            return stream.clone();
        }
        let (tx, rx) = rtrb::RingBuffer::new(RECORD_RING);
        let stream = RecordingStream {
            rx: Arc::new(Mutex::new(rx)),
            sample_rate: self.sample_rate,
        };
        self.record_tx = Some(tx);
        self.record_stream = Some(stream.clone());
        stream
    }

    /// Render one block. `out.len()` must not exceed `MAX_BLOCK_SIZE`;
    /// callers with larger buffers render in chunks.
    pub fn render(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);
        out.fill(0.0);

        let sample_rate = self.sample_rate;
        let dt = 1.0 / sample_rate as f64;

        for voice in self.notes.values_mut() {
            voice.render_add(out, self.frames, sample_rate);
        }
        for voice in &mut self.released {
            voice.render_add(out, self.frames, sample_rate);
        }
        for drum in &mut self.drums {
            drum.render_add(out, sample_rate);
        }
        if let Some((samples, head)) = &mut self.loop_playback {
            for sample in out.iter_mut() {
                *sample += samples[*head];
                *head = (*head + 1) % samples.len();
            }
        }

        for sample in out.iter_mut() {
            let mut v = *sample * self.master_gain.tick(dt);

            let (g, k) = coefficients(self.cutoff.tick(dt), self.resonance.tick(dt), sample_rate);
            v = self.filter.process(v, g, k);

            let delay_samples = (self.delay_time.tick(dt) * sample_rate) as usize;
            let echoed = self.delay.read(delay_samples);
            self.delay.write(v + echoed * self.feedback.tick(dt));
            v += echoed * self.wet.tick(dt);

            *sample = v;

            // Taps never block the render thread; a full ring drops samples.
            let _ = self.scope_tx.push(v);
            if let Some(tx) = &mut self.record_tx {
                let _ = tx.push(v);
            }
        }

        self.frames += out.len() as u64;

        let now = self.now();
        self.released.retain(|voice| voice.dispose_at > now);
        self.drums.retain(|drum| !drum.is_finished());
    }

    /// Silence everything with a minimal release and drop all voices.
    pub fn dispose(&mut self) {
        let keys: Vec<NoteKey> = self.notes.keys().copied().collect();
        for key in keys {
            self.note_off_at(key, &Adsr::fast_release(0.01), 0);
        }
        self.drums.clear();
        self.loop_playback = None;
    }
}
