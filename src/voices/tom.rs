use crate::dsp::oscillator::Waveform;

use super::Layer;

/// Toms sweep from 1.5x the fundamental down to it over 50 ms.
pub(super) fn layers(fundamental: f32, velocity: f32) -> Vec<Layer> {
    vec![Layer::tone(Waveform::Sine, fundamental * 1.5, fundamental, 0.05)
        .decay(0.3)
        .peak(0.8 * velocity)]
}
