use crate::dsp::filter::FilterMode;

use super::Layer;

/// Three bandpassed noise bursts 10 ms apart imitate the spread of several
/// palms, and a longer tail from 30 ms carries the room.
pub(super) fn layers(velocity: f32, sample_rate: f32) -> Vec<Layer> {
    let mut stack = Vec::with_capacity(4);
    for burst in 0..3 {
        stack.push(
            Layer::noise()
                .filtered(FilterMode::BandPass, 2_500.0, 2.0, sample_rate)
                .starting_at(burst as f32 * 0.01)
                .attack(0.005)
                .decay(0.02)
                .peak(0.6 * velocity),
        );
    }
    stack.push(
        Layer::noise()
            .filtered(FilterMode::BandPass, 2_500.0, 2.0, sample_rate)
            .starting_at(0.03)
            .attack(0.005)
            .decay(0.15)
            .peak(0.5 * velocity),
    );
    stack
}
