//! Drum kit definitions.
//!
//! Each kit maps the same eight pad slots to differently-voiced synthesis
//! recipes (see `voices`). Instrument ids are stable strings shared by kits
//! where the role matches - a preset written for one kit degrades gracefully
//! on another.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for a pad's instrument within a kit.
pub type InstrumentId = &'static str;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KitId {
    #[default]
    Classic808,
    Acoustic,
    Electronic,
}

impl KitId {
    pub const ALL: [KitId; 3] = [KitId::Classic808, KitId::Acoustic, KitId::Electronic];

    pub fn cycled(self) -> Self {
        match self {
            KitId::Classic808 => KitId::Acoustic,
            KitId::Acoustic => KitId::Electronic,
            KitId::Electronic => KitId::Classic808,
        }
    }
}

/// One pad slot: id for dispatch, name and accent color for display.
#[derive(Debug, Clone, Copy)]
pub struct DrumInstrument {
    pub id: InstrumentId,
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DrumKit {
    pub id: KitId,
    pub name: &'static str,
    pub instruments: &'static [DrumInstrument],
}

const fn inst(id: InstrumentId, name: &'static str, color: &'static str) -> DrumInstrument {
    DrumInstrument { id, name, color }
}

static KIT_808: DrumKit = DrumKit {
    id: KitId::Classic808,
    name: "808",
    instruments: &[
        inst("kick", "Kick", "#FF6B35"),
        inst("snare", "Snare", "#4ECB71"),
        inst("hihat-closed", "HH Closed", "#4DABF7"),
        inst("hihat-open", "HH Open", "#888"),
        inst("clap", "Clap", "#FF6B35"),
        inst("tom-low", "Tom Low", "#4ECB71"),
        inst("tom-mid", "Tom Mid", "#4DABF7"),
        inst("tom-high", "Tom High", "#888"),
    ],
};

static KIT_ACOUSTIC: DrumKit = DrumKit {
    id: KitId::Acoustic,
    name: "Acoustic",
    instruments: &[
        inst("kick", "Kick", "#FF6B35"),
        inst("snare", "Snare", "#4ECB71"),
        inst("hihat-closed", "HH Closed", "#4DABF7"),
        inst("hihat-open", "HH Open", "#888"),
        inst("clap", "Clap", "#FF6B35"),
        inst("ride", "Ride", "#4ECB71"),
        inst("crash", "Crash", "#4DABF7"),
        inst("rim", "Rim", "#888"),
    ],
};

static KIT_ELECTRONIC: DrumKit = DrumKit {
    id: KitId::Electronic,
    name: "Electronic",
    instruments: &[
        inst("kick", "Kick", "#FF6B35"),
        inst("snare", "Snare", "#4ECB71"),
        inst("hihat-closed", "HH Closed", "#4DABF7"),
        inst("hihat-open", "HH Open", "#888"),
        inst("clap", "Clap", "#FF6B35"),
        inst("perc-1", "Perc 1", "#4ECB71"),
        inst("perc-2", "Perc 2", "#4DABF7"),
        inst("fx", "FX", "#888"),
    ],
};

/// All kits, in selector order.
pub fn kits() -> &'static [DrumKit] {
    static ALL: [DrumKit; 3] = [KIT_808, KIT_ACOUSTIC, KIT_ELECTRONIC];
    &ALL
}

/// Look up a kit by id.
pub fn kit(id: KitId) -> &'static DrumKit {
    match id {
        KitId::Classic808 => &KIT_808,
        KitId::Acoustic => &KIT_ACOUSTIC,
        KitId::Electronic => &KIT_ELECTRONIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kit_has_eight_pads() {
        for k in kits() {
            assert_eq!(k.instruments.len(), 8, "{} kit", k.name);
        }
    }

    #[test]
    fn pad_ids_are_unique_within_a_kit() {
        for k in kits() {
            for (i, a) in k.instruments.iter().enumerate() {
                for b in &k.instruments[i + 1..] {
                    assert_ne!(a.id, b.id, "{} kit", k.name);
                }
            }
        }
    }

    #[test]
    fn kit_cycle_covers_all() {
        let mut id = KitId::Classic808;
        let mut seen = vec![id];
        for _ in 0..2 {
            id = id.cycled();
            seen.push(id);
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(id.cycled(), KitId::Classic808);
    }
}
