//! Factory drum patterns.
//!
//! A preset names a kit, a tempo, and the active step indices per
//! instrument. Instruments of the kit not listed here are simply empty rows.

use crate::catalog::kits::{InstrumentId, KitId};

/// A factory pattern. `rows` lists (instrument, active step indices).
#[derive(Debug, Clone, Copy)]
pub struct DrumPresetDef {
    pub id: &'static str,
    pub name: &'static str,
    pub kit: KitId,
    pub bpm: f32,
    pub rows: &'static [(InstrumentId, &'static [usize])],
}

static PRESETS: [DrumPresetDef; 8] = [
    DrumPresetDef {
        id: "basic-rock",
        name: "Rock",
        kit: KitId::Acoustic,
        bpm: 120.0,
        rows: &[
            ("kick", &[0, 8]),
            ("snare", &[4, 12]),
            ("hihat-closed", &[0, 2, 4, 6, 8, 10, 12, 14]),
        ],
    },
    DrumPresetDef {
        id: "hip-hop",
        name: "Hip Hop",
        kit: KitId::Classic808,
        bpm: 90.0,
        rows: &[
            ("kick", &[0, 3, 7, 10]),
            ("snare", &[4, 12]),
            ("hihat-closed", &[0, 2, 4, 6, 8, 10, 12, 14]),
            ("hihat-open", &[5, 13]),
        ],
    },
    DrumPresetDef {
        id: "house",
        name: "House",
        kit: KitId::Electronic,
        bpm: 128.0,
        rows: &[
            ("kick", &[0, 4, 8, 12]),
            ("clap", &[4, 12]),
            ("hihat-closed", &[2, 6, 10, 14]),
            ("hihat-open", &[3, 11]),
            ("perc-1", &[0, 7, 14]),
        ],
    },
    DrumPresetDef {
        id: "reggaeton",
        name: "Reggaeton",
        kit: KitId::Classic808,
        bpm: 95.0,
        rows: &[
            ("kick", &[0, 3, 4, 7, 8, 11, 12, 15]),
            ("snare", &[3, 7, 11, 15]),
            ("hihat-closed", &[0, 2, 4, 6, 8, 10, 12, 14]),
            ("clap", &[4, 12]),
        ],
    },
    DrumPresetDef {
        id: "bossa-nova",
        name: "Bossa Nova",
        kit: KitId::Acoustic,
        bpm: 140.0,
        rows: &[
            ("kick", &[0, 3, 6, 10]),
            ("rim", &[2, 5, 8, 11, 14]),
            ("hihat-closed", &[0, 2, 4, 6, 8, 10, 12, 14]),
            ("snare", &[12]),
        ],
    },
    DrumPresetDef {
        id: "trap",
        name: "Trap",
        kit: KitId::Classic808,
        bpm: 140.0,
        rows: &[
            ("kick", &[0, 7, 8]),
            ("snare", &[4, 12]),
            (
                "hihat-closed",
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            ),
            ("hihat-open", &[6, 14]),
            ("clap", &[4, 12]),
        ],
    },
    DrumPresetDef {
        id: "funk",
        name: "Funk",
        kit: KitId::Acoustic,
        bpm: 100.0,
        rows: &[
            ("kick", &[0, 3, 6, 10, 14]),
            ("snare", &[4, 12]),
            (
                "hihat-closed",
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            ),
            ("hihat-open", &[7, 15]),
            ("ride", &[0, 4, 8, 12]),
        ],
    },
    DrumPresetDef {
        id: "disco",
        name: "Disco",
        kit: KitId::Electronic,
        bpm: 120.0,
        rows: &[
            ("kick", &[0, 4, 8, 12]),
            ("snare", &[4, 12]),
            ("hihat-closed", &[0, 2, 4, 6, 8, 10, 12, 14]),
            ("hihat-open", &[1, 3, 5, 7, 9, 11, 13, 15]),
            ("clap", &[4, 12]),
        ],
    },
];

pub fn drum_presets() -> &'static [DrumPresetDef] {
    &PRESETS
}

pub fn drum_preset(id: &str) -> Option<&'static DrumPresetDef> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kits::kit;
    use crate::catalog::{MAX_BPM, MIN_BPM, STEP_COUNT};

    #[test]
    fn preset_rows_reference_kit_instruments() {
        for preset in drum_presets() {
            let kit = kit(preset.kit);
            for (instrument, _) in preset.rows {
                assert!(
                    kit.instruments.iter().any(|i| i.id == *instrument),
                    "preset {} references unknown instrument {instrument}",
                    preset.id
                );
            }
        }
    }

    #[test]
    fn preset_steps_and_tempi_are_in_range() {
        for preset in drum_presets() {
            assert!(preset.bpm >= MIN_BPM && preset.bpm <= MAX_BPM);
            for (_, steps) in preset.rows {
                assert!(steps.iter().all(|&s| s < STEP_COUNT), "{}", preset.id);
            }
        }
    }

    #[test]
    fn lookup_by_id() {
        assert!(drum_preset("trap").is_some());
        assert!(drum_preset("nope").is_none());
    }
}
