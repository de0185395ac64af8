use crate::dsp::oscillator::Waveform;

use super::Layer;

/// Rimshot: a bare 800 Hz square, 40 ms and gone.
pub(super) fn rim(velocity: f32) -> Vec<Layer> {
    vec![Layer::tone(Waveform::Square, 800.0, 800.0, 0.01)
        .attack(0.001)
        .decay(0.04)
        .peak(0.5 * velocity)]
}

/// Electronic percussion blip: square dropping an octave over 50 ms.
pub(super) fn blip(frequency: f32, velocity: f32) -> Vec<Layer> {
    vec![
        Layer::tone(Waveform::Square, frequency, frequency * 0.5, 0.05)
            .attack(0.001)
            .decay(0.1)
            .peak(0.5 * velocity),
    ]
}

/// Riser: sawtooth sweeping 300 to 1200 Hz over 200 ms.
pub(super) fn sweep_fx(velocity: f32) -> Vec<Layer> {
    vec![Layer::tone(Waveform::Sawtooth, 300.0, 1_200.0, 0.2)
        .decay(0.2)
        .peak(0.4 * velocity)]
}
