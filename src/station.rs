//! The workstation facade.
//!
//! One object ties the whole instrument together: the engine, both
//! sequencers, the loop recorder and the event bus. A front end talks only
//! to this type; it never reaches into the engine directly. Everything here
//! is a no-op until `init_engine` is called, mirroring how a physical unit
//! does nothing until powered on.

use std::path::Path;

use crate::catalog::drum_presets::{drum_preset, DrumPresetDef};
use crate::catalog::kits::{InstrumentId, KitId};
use crate::catalog::melody_presets::{melody_preset, melody_presets, MelodyPreset};
use crate::catalog::notes::{frequency, NoteKey, PitchClass};
use crate::catalog::{DEFAULT_OCTAVE, MAX_OCTAVE, MIN_OCTAVE};
use crate::dsp::envelope::Adsr;
use crate::dsp::filter::FilterMode;
use crate::dsp::oscillator::Waveform;
use crate::engine::{AnalysisTap, AudioEngine, EffectsConfig};
use crate::events::{EventBus, StationEvent};
use crate::record::{LoopRecorder, LoopRecording};
use crate::sequencer::drum::DrumSequencer;
use crate::sequencer::melody::MelodySequencer;
use crate::sequencer::StepSink;
use crate::MAX_BLOCK_SIZE;

/// Forwards sequencer ticks into the engine with the facade's current
/// voice settings.
struct EngineSink<'a> {
    engine: &'a mut AudioEngine,
    waveform: Waveform,
    envelope: Adsr,
}

impl StepSink for EngineSink<'_> {
    fn drum_hit(&mut self, kit: KitId, instrument: InstrumentId, velocity: f32, offset: u32) {
        self.engine.play_drum_at(kit, instrument, velocity, offset);
    }

    fn note_on(&mut self, key: NoteKey, offset: u32) {
        let hz = frequency(key.0, key.1);
        self.engine
            .note_on_at(key, hz, self.waveform, &self.envelope, offset);
    }

    fn note_off(&mut self, key: NoteKey, offset: u32) {
        self.engine.note_off_at(key, &self.envelope, offset);
    }
}

pub struct Workstation {
    engine: Option<AudioEngine>,
    waveform: Waveform,
    octave: i32,
    envelope: Adsr,
    effects: EffectsConfig,
    master_volume: f32,

    drums: DrumSequencer,
    melody: MelodySequencer,

    recorder: LoopRecorder,
    loops: Vec<LoopRecording>,
    next_loop_id: u64,
    playing_loop: Option<u64>,

    events: EventBus,
}

impl Workstation {
    pub fn new() -> Self {
        Self {
            engine: None,
            waveform: Waveform::default(),
            octave: DEFAULT_OCTAVE,
            envelope: Adsr::default(),
            effects: EffectsConfig::default(),
            master_volume: 0.5,
            drums: DrumSequencer::new(KitId::default()),
            melody: MelodySequencer::new(&melody_presets()[0]),
            recorder: LoopRecorder::new(),
            loops: Vec::new(),
            next_loop_id: 1,
            playing_loop: None,
            events: EventBus::new(),
        }
    }

    /// Power on. Safe to call again; a second call keeps the running engine
    /// and everything scheduled on it.
    pub fn init_engine(&mut self, sample_rate: f32) {
        if self.engine.is_some() {
            return;
        }
        let mut engine = AudioEngine::new(sample_rate);
        engine.set_master_volume(self.master_volume);
        engine.apply_effects(&self.effects);
        self.engine = Some(engine);
        self.events.emit(StationEvent::EngineReady);
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.engine.as_ref().map(|e| e.sample_rate())
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Oscilloscope feed; available once, after the engine exists.
    pub fn take_analysis_tap(&mut self) -> Option<AnalysisTap> {
        self.engine.as_mut().and_then(|e| e.take_analysis_tap())
    }

    // --- synth voice -----------------------------------------------------

    pub fn note_on(&mut self, pitch: PitchClass, octave: i32) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let key = (pitch, octave);
        engine.note_on_at(key, frequency(pitch, octave), self.waveform, &self.envelope, 0);
        self.events.emit(StationEvent::NoteOn { key });
    }

    pub fn note_off(&mut self, pitch: PitchClass, octave: i32) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let key = (pitch, octave);
        engine.note_off_at(key, &self.envelope, 0);
        self.events.emit(StationEvent::NoteOff { key });
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        self.events.emit(StationEvent::WaveformChanged { waveform });
    }

    pub fn cycle_waveform(&mut self) {
        self.set_waveform(self.waveform.cycled());
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn set_octave(&mut self, octave: i32) {
        let clamped = octave.clamp(MIN_OCTAVE, MAX_OCTAVE);
        if clamped != self.octave {
            self.octave = clamped;
            self.events.emit(StationEvent::OctaveChanged { octave: clamped });
        }
    }

    pub fn shift_octave(&mut self, delta: i32) {
        self.set_octave(self.octave + delta);
    }

    pub fn envelope(&self) -> Adsr {
        self.envelope
    }

    /// New notes pick up the envelope; held ones keep the one they started
    /// with.
    pub fn set_envelope(&mut self, envelope: Adsr) {
        self.envelope = envelope;
    }

    // --- master chain ----------------------------------------------------

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        if let Some(engine) = &mut self.engine {
            engine.set_master_volume(self.master_volume);
        }
    }

    pub fn effects(&self) -> EffectsConfig {
        self.effects
    }

    pub fn set_effects(&mut self, effects: EffectsConfig) {
        self.effects = EffectsConfig {
            cutoff_hz: effects.cutoff_hz.clamp(20.0, 20_000.0),
            resonance: effects.resonance.clamp(0.5, 20.0),
            filter_mode: effects.filter_mode,
            delay_time: effects.delay_time.clamp(0.0, crate::dsp::delay::MAX_DELAY_SECS),
            feedback: effects.feedback.clamp(0.0, crate::engine::MAX_FEEDBACK),
            delay_mix: effects.delay_mix.clamp(0.0, 1.0),
        };
        if let Some(engine) = &mut self.engine {
            engine.apply_effects(&self.effects);
        }
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        let mut effects = self.effects;
        effects.filter_mode = mode;
        self.set_effects(effects);
    }

    // --- drums -----------------------------------------------------------

    pub fn kit(&self) -> KitId {
        self.drums.pattern().kit()
    }

    pub fn drums(&self) -> &DrumSequencer {
        &self.drums
    }

    /// One-shot pad hit at full velocity, outside the sequencer clock.
    pub fn play_drum_hit(&mut self, instrument: InstrumentId) {
        let kit = self.kit();
        let Some(engine) = &mut self.engine else {
            return;
        };
        engine.play_drum_at(kit, instrument, 1.0, 0);
        self.events.emit(StationEvent::DrumHit { kit, instrument });
    }

    pub fn toggle_step(&mut self, instrument: InstrumentId, step: usize) -> bool {
        self.drums.pattern_mut().toggle(instrument, step)
    }

    pub fn clear_pattern(&mut self) {
        self.drums.pattern_mut().clear();
    }

    pub fn set_kit(&mut self, kit: KitId) {
        self.drums.set_kit(kit);
        self.events.emit(StationEvent::KitChanged { kit });
    }

    pub fn cycle_kit(&mut self) {
        self.set_kit(self.kit().cycled());
    }

    pub fn load_drum_preset(&mut self, id: &str) -> bool {
        let Some(preset) = drum_preset(id) else {
            return false;
        };
        self.load_drum_preset_def(preset);
        true
    }

    pub fn load_drum_preset_def(&mut self, preset: &DrumPresetDef) {
        let sample_rate = self.sample_rate().unwrap_or(48_000.0);
        self.drums.load_preset(preset, sample_rate);
        self.events.emit(StationEvent::KitChanged { kit: preset.kit });
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        let sample_rate = self.sample_rate().unwrap_or(48_000.0);
        self.drums.set_bpm(bpm, sample_rate);
    }

    pub fn bpm(&self) -> f32 {
        self.drums.bpm()
    }

    pub fn toggle_drums(&mut self) {
        if self.drums.is_running() {
            self.drums.stop();
            self.events.emit(StationEvent::DrumSequencerStopped);
        } else {
            self.drums.start();
            self.events.emit(StationEvent::DrumSequencerStarted);
        }
    }

    pub fn drums_running(&self) -> bool {
        self.drums.is_running()
    }

    pub fn current_drum_step(&self) -> Option<usize> {
        self.drums.current_step()
    }

    // --- melody ----------------------------------------------------------

    pub fn melody_preset(&self) -> &'static MelodyPreset {
        self.melody.preset()
    }

    pub fn select_melody(&mut self, id: &str) -> bool {
        let Some(preset) = melody_preset(id) else {
            return false;
        };
        if let Some(engine) = &mut self.engine {
            let mut sink = EngineSink {
                engine,
                waveform: self.waveform,
                envelope: self.envelope,
            };
            self.melody.set_preset(preset, &mut sink);
        } else {
            self.melody = MelodySequencer::new(preset);
        }
        true
    }

    /// Start or stop the melody line. Starting adopts the preset's
    /// waveform, the way the original patches switched sounds with songs.
    pub fn toggle_melody(&mut self) {
        if self.melody.is_running() {
            if let Some(engine) = &mut self.engine {
                let mut sink = EngineSink {
                    engine,
                    waveform: self.waveform,
                    envelope: self.envelope,
                };
                self.melody.stop(&mut sink);
            }
            self.events.emit(StationEvent::MelodyStopped);
        } else {
            self.set_waveform(self.melody.preset().waveform);
            self.melody.start();
            self.events.emit(StationEvent::MelodyStarted {
                preset: self.melody.preset().id,
            });
        }
    }

    pub fn melody_running(&self) -> bool {
        self.melody.is_running()
    }

    pub fn current_melody_step(&self) -> Option<usize> {
        self.melody.current_step()
    }

    // --- loops -----------------------------------------------------------

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn recording_duration(&self) -> f32 {
        self.recorder.duration_secs()
    }

    pub fn start_loop_recording(&mut self) {
        if self.recorder.is_recording() {
            return;
        }
        let Some(engine) = &mut self.engine else {
            return;
        };
        self.recorder.start(engine.recording_stream());
        self.events.emit(StationEvent::RecordingStarted);
    }

    /// Drain pending capture samples. The UI loop calls this every pass.
    pub fn poll_recording(&mut self) {
        self.recorder.poll();
    }

    /// Finish the take. Returns the new loop's id, or `None` when nothing
    /// was recording.
    pub fn stop_loop_recording(&mut self) -> hound::Result<Option<u64>> {
        let Some((samples, sample_rate)) = self.recorder.stop() else {
            return Ok(None);
        };
        self.events.emit(StationEvent::RecordingStopped);

        let id = self.next_loop_id;
        self.next_loop_id += 1;
        let name = format!("Loop {id}");
        let recording = LoopRecording::new(id, name, samples, sample_rate)?;
        self.loops.push(recording);
        self.events.emit(StationEvent::LoopAdded { id });
        Ok(Some(id))
    }

    pub fn loops(&self) -> &[LoopRecording] {
        &self.loops
    }

    pub fn playing_loop(&self) -> Option<u64> {
        self.playing_loop
    }

    pub fn play_loop(&mut self, id: u64) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        let Some(recording) = self.loops.iter().find(|l| l.id == id) else {
            return;
        };
        engine.play_loop(recording.samples.clone());
        self.playing_loop = Some(id);
        self.events.emit(StationEvent::LoopPlaybackStarted { id });
    }

    pub fn stop_loop_playback(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.stop_loop();
        }
        if self.playing_loop.take().is_some() {
            self.events.emit(StationEvent::LoopPlaybackStopped);
        }
    }

    pub fn delete_loop(&mut self, id: u64) {
        if self.playing_loop == Some(id) {
            self.stop_loop_playback();
        }
        let before = self.loops.len();
        self.loops.retain(|l| l.id != id);
        if self.loops.len() != before {
            self.events.emit(StationEvent::LoopDeleted { id });
        }
    }

    pub fn save_loop(&self, id: u64, path: &Path) -> std::io::Result<bool> {
        match self.loops.iter().find(|l| l.id == id) {
            Some(recording) => recording.save_to(path).map(|_| true),
            None => Ok(false),
        }
    }

    // --- audio -----------------------------------------------------------

    /// Render the next block of output. Drives both sequencer clocks, then
    /// the engine, in chunks the engine accepts.
    pub fn render(&mut self, out: &mut [f32]) {
        let Some(engine) = &mut self.engine else {
            out.fill(0.0);
            return;
        };
        let sample_rate = engine.sample_rate();

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let frames = chunk.len() as u64;
            let mut sink = EngineSink {
                engine: &mut *engine,
                waveform: self.waveform,
                envelope: self.envelope,
            };
            self.drums.process(frames, sample_rate, &mut sink);
            self.melody.process(frames, sample_rate, &mut sink);
            engine.render(chunk);
        }
    }
}

impl Default for Workstation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn controls_work_before_power_on_without_sound() {
        let mut station = Workstation::new();
        station.note_on(PitchClass::A, 4);
        station.play_drum_hit("kick");
        station.toggle_step("kick", 0);
        assert!(!station.is_ready());

        let mut out = [1.0f32; 256];
        station.render(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn init_engine_is_idempotent() {
        let mut station = Workstation::new();
        let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = counter.clone();
        station.events().subscribe(move |event| {
            if *event == StationEvent::EngineReady {
                seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        });

        station.init_engine(SAMPLE_RATE);
        station.init_engine(SAMPLE_RATE);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(station.sample_rate(), Some(SAMPLE_RATE));
    }

    #[test]
    fn control_values_are_clamped() {
        let mut station = Workstation::new();
        station.set_octave(99);
        assert_eq!(station.octave(), MAX_OCTAVE);
        station.set_octave(-5);
        assert_eq!(station.octave(), MIN_OCTAVE);

        station.set_master_volume(3.0);
        assert_eq!(station.master_volume(), 1.0);

        station.set_effects(EffectsConfig {
            feedback: 2.0,
            delay_mix: -1.0,
            ..EffectsConfig::default()
        });
        assert_eq!(station.effects().feedback, crate::engine::MAX_FEEDBACK);
        assert_eq!(station.effects().delay_mix, 0.0);

        station.set_bpm(9_999.0);
        assert_eq!(station.bpm(), crate::catalog::MAX_BPM);
    }

    #[test]
    fn starting_the_melody_adopts_its_waveform() {
        let mut station = Workstation::new();
        station.init_engine(SAMPLE_RATE);
        assert!(station.select_melody("synth-arp"));
        station.toggle_melody();
        assert!(station.melody_running());
        assert_eq!(station.waveform(), Waveform::Sawtooth);
        station.toggle_melody();
        assert!(!station.melody_running());
    }

    #[test]
    fn kit_cycle_resets_the_pattern() {
        let mut station = Workstation::new();
        station.toggle_step("kick", 0);
        assert!(station.drums().pattern().is_active("kick", 0));
        station.cycle_kit();
        assert!(!station.drums().pattern().is_active("kick", 0));
    }

    #[test]
    fn running_drums_make_sound_through_render() {
        let mut station = Workstation::new();
        station.init_engine(SAMPLE_RATE);
        station.toggle_step("kick", 0);
        station.toggle_drums();

        let mut out = vec![0.0f32; 4096];
        station.render(&mut out);
        let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.01, "kick on step 0 should be audible, got {peak}");
        assert_eq!(station.current_drum_step(), Some(0));
    }
}
