//! ADSR envelope scheduling.
//!
//! Unlike a per-sample envelope state machine, notes here are shaped by
//! writing ramp schedules onto a voice's gain parameter. The shape is the
//! classic linear ADSR:
//!
//! ```text
//!   Level
//!     1.0 ┐     ╱╲
//!         │    ╱  ╲___________
//!     S   │   ╱               ╲
//!         │  ╱                 ╲
//!     0.0 └─╱───────────────────╲──→ Time
//!         Attack Decay  Sustain  Release
//! ```
//!
//! Key behavior: release always starts from the gain's CURRENT value, not
//! from the sustain level. A note released mid-attack fades from wherever it
//! was, so retriggers never click.

use crate::dsp::param::{AudioParam, MIN_RAMP_TIME};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ADSR envelope settings. Durations in seconds, sustain is a level
/// fraction. The constructor clamps each field to its legal range.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: f32,  // 0.001 - 2.0
    pub decay: f32,   // 0.001 - 2.0
    pub sustain: f32, // 0.0 - 1.0
    pub release: f32, // 0.001 - 5.0
}

impl Adsr {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.clamp(0.001, 2.0),
            decay: decay.clamp(0.001, 2.0),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.clamp(0.001, 5.0),
        }
    }

    /// An envelope that exists only to fade a voice out in `release`
    /// seconds. Used for force-release and teardown.
    pub fn fast_release(release: f32) -> Self {
        Self::new(0.001, 0.001, 0.0, release)
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new(0.01, 0.3, 0.7, 0.3)
    }
}

/// Schedule the attack/decay portion onto a gain parameter.
///
/// Cancels pending automation from `start`, pins the gain to 0, ramps to 1.0
/// over the attack, then down to the sustain level over the decay.
pub fn schedule_attack(gain: &mut AudioParam, envelope: &Adsr, start: f64) {
    let attack = (envelope.attack as f64).max(MIN_RAMP_TIME);
    let decay = (envelope.decay as f64).max(MIN_RAMP_TIME);

    gain.cancel_scheduled(start);
    gain.set_value_at(start, 0.0);
    gain.ramp_to(start + attack, 1.0);
    gain.ramp_to(start + attack + decay, envelope.sustain);
}

/// Schedule the release portion onto a gain parameter.
///
/// Cancels pending automation from `start`, pins the gain to its current
/// value (whatever the envelope reached, including mid-attack), and ramps to
/// 0. Returns the time at which the gain falls silent so the caller can
/// schedule oscillator stop and cleanup precisely.
pub fn schedule_release(gain: &mut AudioParam, envelope: &Adsr, start: f64) -> f64 {
    let release = (envelope.release as f64).max(MIN_RAMP_TIME);

    gain.cancel_scheduled(start);
    gain.set_value_at(start, gain.value());
    gain.ramp_to(start + release, 0.0);

    start + release
}
