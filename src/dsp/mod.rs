//! Low-level, realtime-safe DSP primitives.
//!
//! Everything in here is allocation-free after construction and driven by a
//! single sample clock. Higher layers (`engine`, `voices`) combine these
//! blocks into the persistent master bus and transient per-hit subgraphs.

/// Circular delay line for the echo network.
pub mod delay;
/// ADSR ramp scheduling against an automated gain parameter.
pub mod envelope;
/// State-variable filter with selectable response.
pub mod filter;
/// White noise source for percussion.
pub mod noise;
/// Audio-band oscillators.
pub mod oscillator;
/// Scalar parameters with an automation timeline.
pub mod param;
