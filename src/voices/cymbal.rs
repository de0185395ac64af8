use crate::dsp::filter::FilterMode;

use super::Layer;

pub(super) fn ride(velocity: f32, sample_rate: f32) -> Vec<Layer> {
    vec![Layer::noise()
        .filtered(FilterMode::BandPass, 8_000.0, 3.0, sample_rate)
        .attack(0.001)
        .decay(0.6)
        .peak(0.4 * velocity)]
}

pub(super) fn crash(velocity: f32, sample_rate: f32) -> Vec<Layer> {
    vec![Layer::noise()
        .filtered(FilterMode::HighPass, 4_000.0, 1.0, sample_rate)
        .attack(0.001)
        .decay(1.2)
        .peak(0.5 * velocity)]
}
