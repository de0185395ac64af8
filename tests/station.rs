//! End-to-end exercises through the `Workstation` facade, the way a front
//! end would drive it.

use std::io::Cursor;

use tonedeck::catalog::notes::PitchClass;
use tonedeck::station::Workstation;

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 512;

fn render_blocks(station: &mut Workstation, blocks: usize) -> Vec<f32> {
    let mut all = Vec::with_capacity(blocks * BLOCK);
    let mut out = [0.0f32; BLOCK];
    for _ in 0..blocks {
        station.render(&mut out);
        all.extend_from_slice(&out);
    }
    all
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

#[test]
fn a_full_jam_session_produces_audio_from_every_source() {
    let mut station = Workstation::new();
    station.init_engine(SAMPLE_RATE);

    // Drums: kick on the downbeats.
    station.toggle_step("kick", 0);
    station.toggle_step("kick", 8);
    station.toggle_drums();

    // Melody on top.
    assert!(station.select_melody("bass-line"));
    station.toggle_melody();

    // And a held key.
    station.note_on(PitchClass::E, 4);

    let rendered = render_blocks(&mut station, 40);
    assert!(peak(&rendered) > 0.05, "mix should be clearly audible");

    station.note_off(PitchClass::E, 4);
    station.toggle_drums();
    station.toggle_melody();

    // Everything released: after the tails die the output is silence.
    render_blocks(&mut station, 200);
    let tail = render_blocks(&mut station, 10);
    assert!(peak(&tail) < 1e-3, "stopped station should fall silent");
}

#[test]
fn recorded_loop_matches_rendered_length_and_decodes_as_wav() {
    let mut station = Workstation::new();
    station.init_engine(SAMPLE_RATE);

    station.start_loop_recording();
    assert!(station.is_recording());

    station.note_on(PitchClass::A, 3);
    let blocks = 30;
    for _ in 0..blocks {
        let mut out = [0.0f32; BLOCK];
        station.render(&mut out);
        station.poll_recording();
    }
    station.note_off(PitchClass::A, 3);

    let expected_secs = (blocks * BLOCK) as f32 / SAMPLE_RATE;
    assert!((station.recording_duration() - expected_secs).abs() < 1e-6);

    let id = station.stop_loop_recording().unwrap().unwrap();
    assert!(!station.is_recording());

    let recording = &station.loops()[0];
    assert_eq!(recording.id, id);
    assert!((recording.duration_secs - expected_secs).abs() < 1e-6);

    let reader = hound::WavReader::new(Cursor::new(recording.wav.as_slice())).unwrap();
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE as u32);
    assert_eq!(reader.len() as usize, blocks * BLOCK);
}

#[test]
fn loop_playback_round_trip() {
    let mut station = Workstation::new();
    station.init_engine(SAMPLE_RATE);

    station.start_loop_recording();
    station.note_on(PitchClass::C, 4);
    for _ in 0..20 {
        let mut out = [0.0f32; BLOCK];
        station.render(&mut out);
        station.poll_recording();
    }
    station.note_off(PitchClass::C, 4);
    let id = station.stop_loop_recording().unwrap().unwrap();

    // Let the release tail fully die before judging playback.
    render_blocks(&mut station, 200);

    station.play_loop(id);
    assert_eq!(station.playing_loop(), Some(id));
    let playing = render_blocks(&mut station, 20);
    assert!(peak(&playing) > 0.01, "loop playback should be audible");

    // Deleting the playing loop stops playback too.
    station.delete_loop(id);
    assert_eq!(station.playing_loop(), None);
    assert!(station.loops().is_empty());
    render_blocks(&mut station, 50);
    let after = render_blocks(&mut station, 10);
    assert!(peak(&after) < 1e-3);
}

#[test]
fn stopping_a_recording_twice_yields_nothing_new() {
    let mut station = Workstation::new();
    station.init_engine(SAMPLE_RATE);

    station.start_loop_recording();
    render_blocks(&mut station, 4);
    station.poll_recording();
    assert!(station.stop_loop_recording().unwrap().is_some());
    assert!(station.stop_loop_recording().unwrap().is_none());
    assert_eq!(station.loops().len(), 1);
}

#[test]
fn drum_preset_brings_its_own_kit_and_tempo() {
    let mut station = Workstation::new();
    station.init_engine(SAMPLE_RATE);

    assert!(station.load_drum_preset("house"));
    let preset = tonedeck::catalog::drum_presets::drum_preset("house").unwrap();
    assert_eq!(station.bpm(), preset.bpm);
    assert_eq!(station.kit(), preset.kit);

    station.toggle_drums();
    let rendered = render_blocks(&mut station, 10);
    assert!(peak(&rendered) > 0.01);
}
