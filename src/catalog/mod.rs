//! Read-only musical data: the note table, drum kits, and the preset
//! catalogs for drum patterns and melodies.
//!
//! Nothing in here is mutated at runtime; sequencers and the station read
//! it, never write it.

pub mod drum_presets;
pub mod kits;
pub mod melody_presets;
pub mod notes;

pub use drum_presets::{drum_preset, drum_presets, DrumPresetDef};
pub use kits::{kit, kits, DrumInstrument, DrumKit, InstrumentId, KitId};
pub use melody_presets::{melody_preset, melody_presets, MelodyNote, MelodyPreset};
pub use notes::{frequency, NoteKey, PitchClass};

/// Playable octave range for the keyboard.
pub const MIN_OCTAVE: i32 = 1;
pub const MAX_OCTAVE: i32 = 7;
pub const DEFAULT_OCTAVE: i32 = 3;

/// Sequencer tempo range in beats per minute.
pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 300.0;
pub const DEFAULT_BPM: f32 = 120.0;

/// Length of a drum pattern, in sixteenth-note steps.
pub const STEP_COUNT: usize = 16;
