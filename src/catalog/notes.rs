//! Twelve-tone equal-tempered pitch names and frequencies.
//!
//! The reference octave is 4 with A4 = 440 Hz; any other octave is a
//! power-of-two scaling: `frequency = base * 2^(octave - 4)`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the twelve pitch classes. `Cs` reads "C sharp".
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

/// Identity of a sounding note: pitch class plus octave. At most one voice
/// per key can sound at a time.
pub type NoteKey = (PitchClass, i32);

impl PitchClass {
    /// All pitch classes in chromatic order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Reference frequency at octave 4, A4 = 440 Hz tuning.
    pub fn base_frequency(self) -> f32 {
        match self {
            PitchClass::C => 261.63,
            PitchClass::Cs => 277.18,
            PitchClass::D => 293.66,
            PitchClass::Ds => 311.13,
            PitchClass::E => 329.63,
            PitchClass::F => 349.23,
            PitchClass::Fs => 369.99,
            PitchClass::G => 392.00,
            PitchClass::Gs => 415.30,
            PitchClass::A => 440.00,
            PitchClass::As => 466.16,
            PitchClass::B => 493.88,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Frequency of a pitch at an octave.
pub fn frequency(pitch: PitchClass, octave: i32) -> f32 {
    pitch.base_frequency() * 2.0f32.powi(octave - 4)
}
