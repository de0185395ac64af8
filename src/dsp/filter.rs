use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| response  | passes          | rejects      |
| --------- | --------------- | ------------ |
| low-pass  | below cutoff    | above cutoff |
| high-pass | above cutoff    | below cutoff |
| band-pass | around cutoff   | outside      |
| notch     | outside         | around cutoff|
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

/// Topology-preserving state-variable filter (Simper SVF).
///
/// Coefficients are supplied per call so the engine can sweep cutoff and
/// resonance smoothly; percussion voices compute them once per hit.
pub struct SvFilter {
    ic1eq: f32, // first integrator memory
    ic2eq: f32, // second integrator memory
    mode: FilterMode,
}

/// Compute the (g, k) coefficient pair for a cutoff and Q at a sample rate.
pub fn coefficients(cutoff_hz: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let cutoff = cutoff_hz.clamp(20.0, sample_rate * 0.45);
    let g = (PI * cutoff / sample_rate).tan();
    let k = 1.0 / q.clamp(0.5, 20.0);
    (g, k)
}

impl SvFilter {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            mode,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Switch responses. Discrete change, applied instantaneously; the
    /// integrator state carries over so the signal does not restart.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    pub fn process(&mut self, sample: f32, g: f32, k: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        match self.mode {
            FilterMode::LowPass => v2,
            FilterMode::BandPass => v1,
            FilterMode::HighPass => sample - k * v1 - v2,
            FilterMode::Notch => sample - k * v1,
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak_after_transient(filter: &mut SvFilter, frequency: f32, cutoff: f32) -> f32 {
        let (g, k) = coefficients(cutoff, 1.0, SAMPLE_RATE);
        let mut osc = Oscillator::new(Waveform::Sine);
        let mut peak = 0.0f32;
        for n in 0..4096 {
            let y = filter.process(osc.next_sample(frequency, SAMPLE_RATE), g, k);
            if n >= 512 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let passed = peak_after_transient(&mut SvFilter::new(FilterMode::LowPass), 100.0, 1_000.0);
        let rejected =
            peak_after_transient(&mut SvFilter::new(FilterMode::LowPass), 10_000.0, 1_000.0);
        assert!(passed > 0.9, "in-band tone should pass, got {passed}");
        assert!(rejected < 0.1, "out-of-band tone should drop, got {rejected}");
    }

    #[test]
    fn highpass_attenuates_below_cutoff() {
        let rejected =
            peak_after_transient(&mut SvFilter::new(FilterMode::HighPass), 100.0, 4_000.0);
        let passed =
            peak_after_transient(&mut SvFilter::new(FilterMode::HighPass), 12_000.0, 4_000.0);
        assert!(rejected < 0.1, "low tone should drop, got {rejected}");
        assert!(passed > 0.8, "high tone should pass, got {passed}");
    }

    #[test]
    fn bandpass_prefers_the_center() {
        let center =
            peak_after_transient(&mut SvFilter::new(FilterMode::BandPass), 2_000.0, 2_000.0);
        let edge = peak_after_transient(&mut SvFilter::new(FilterMode::BandPass), 150.0, 2_000.0);
        assert!(center > edge * 3.0, "center {center} vs edge {edge}");
    }
}
