//! Factory melodies for the melody sequencer.
//!
//! Steps are sixteenth notes; a note occupies `[start, start + duration)`
//! steps. The preset also fixes the tempo and the oscillator waveform the
//! melody is meant to be heard with.

use crate::catalog::notes::PitchClass;
use crate::dsp::oscillator::Waveform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyNote {
    pub start: usize,
    pub pitch: PitchClass,
    pub octave: i32,
    pub duration: usize, // in steps: 1 = sixteenth, 4 = quarter
}

#[derive(Debug, Clone, Copy)]
pub struct MelodyPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub bpm: f32,
    pub waveform: Waveform,
    pub length: usize, // total steps in the loop
    pub notes: &'static [MelodyNote],
}

const fn note(start: usize, pitch: PitchClass, octave: i32, duration: usize) -> MelodyNote {
    MelodyNote {
        start,
        pitch,
        octave,
        duration,
    }
}

use PitchClass::*;

static PRESETS: [MelodyPreset; 6] = [
    MelodyPreset {
        id: "twinkle",
        name: "Twinkle",
        bpm: 120.0,
        waveform: Waveform::Sine,
        length: 32,
        notes: &[
            note(0, C, 4, 2),
            note(2, C, 4, 2),
            note(4, G, 4, 2),
            note(6, G, 4, 2),
            note(8, A, 4, 2),
            note(10, A, 4, 2),
            note(12, G, 4, 4),
            note(16, F, 4, 2),
            note(18, F, 4, 2),
            note(20, E, 4, 2),
            note(22, E, 4, 2),
            note(24, D, 4, 2),
            note(26, D, 4, 2),
            note(28, C, 4, 4),
        ],
    },
    MelodyPreset {
        id: "synth-arp",
        name: "Synth Arp",
        bpm: 130.0,
        waveform: Waveform::Sawtooth,
        length: 16,
        notes: &[
            note(0, C, 4, 1),
            note(1, E, 4, 1),
            note(2, G, 4, 1),
            note(3, C, 5, 1),
            note(4, G, 4, 1),
            note(5, E, 4, 1),
            note(6, C, 4, 1),
            note(7, G, 3, 1),
            note(8, A, 3, 1),
            note(9, C, 4, 1),
            note(10, E, 4, 1),
            note(11, A, 4, 1),
            note(12, E, 4, 1),
            note(13, C, 4, 1),
            note(14, A, 3, 1),
            note(15, E, 3, 1),
        ],
    },
    MelodyPreset {
        id: "bass-line",
        name: "Bass Line",
        bpm: 110.0,
        waveform: Waveform::Square,
        length: 16,
        notes: &[
            note(0, C, 3, 2),
            note(2, C, 3, 1),
            note(4, E, 3, 2),
            note(6, G, 3, 1),
            note(8, A, 3, 2),
            note(10, A, 3, 1),
            note(12, G, 3, 2),
            note(14, F, 3, 2),
        ],
    },
    MelodyPreset {
        id: "minor-melody",
        name: "Minor",
        bpm: 100.0,
        waveform: Waveform::Triangle,
        length: 32,
        notes: &[
            note(0, A, 4, 2),
            note(2, B, 4, 2),
            note(4, C, 5, 4),
            note(8, B, 4, 2),
            note(10, A, 4, 2),
            note(12, G, 4, 4),
            note(16, F, 4, 2),
            note(18, E, 4, 2),
            note(20, D, 4, 4),
            note(24, E, 4, 2),
            note(26, F, 4, 2),
            note(28, E, 4, 4),
        ],
    },
    MelodyPreset {
        id: "techno-seq",
        name: "Techno",
        bpm: 135.0,
        waveform: Waveform::Sawtooth,
        length: 16,
        notes: &[
            note(0, C, 3, 1),
            note(2, C, 3, 1),
            note(3, Ds, 3, 1),
            note(4, C, 3, 1),
            note(6, C, 3, 1),
            note(7, As, 2, 1),
            note(8, C, 3, 1),
            note(10, C, 3, 1),
            note(11, Ds, 3, 1),
            note(12, F, 3, 1),
            note(13, Ds, 3, 1),
            note(14, C, 3, 1),
            note(15, As, 2, 1),
        ],
    },
    MelodyPreset {
        id: "happy-scale",
        name: "Major Scale",
        bpm: 120.0,
        waveform: Waveform::Sine,
        length: 16,
        notes: &[
            note(0, C, 4, 2),
            note(2, D, 4, 2),
            note(4, E, 4, 2),
            note(6, F, 4, 2),
            note(8, G, 4, 2),
            note(10, A, 4, 2),
            note(12, B, 4, 2),
            note(14, C, 5, 2),
        ],
    },
];

pub fn melody_presets() -> &'static [MelodyPreset] {
    &PRESETS
}

pub fn melody_preset(id: &str) -> Option<&'static MelodyPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_fit_inside_their_loop() {
        for preset in melody_presets() {
            for n in preset.notes {
                assert!(n.start < preset.length, "{}", preset.id);
                assert!(
                    n.start + n.duration <= preset.length,
                    "{}: note at {} overruns",
                    preset.id,
                    n.start
                );
                assert!(n.duration >= 1);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(melody_preset("twinkle").is_some());
        assert!(melody_preset("nope").is_none());
    }
}
