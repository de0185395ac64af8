use crate::catalog::kits::KitId;
use crate::dsp::oscillator::Waveform;

use super::Layer;

/// Swept-sine kicks. The 808 starts higher and rings long; the acoustic
/// variant drops fast and dies early; the electronic one sits in between
/// with a deeper landing pitch.
pub(super) fn layers(kit: KitId, velocity: f32) -> Vec<Layer> {
    let (start_hz, end_hz, sweep, decay) = match kit {
        KitId::Classic808 => (150.0, 40.0, 0.1, 0.5),
        KitId::Acoustic => (120.0, 50.0, 0.05, 0.3),
        KitId::Electronic => (140.0, 30.0, 0.08, 0.4),
    };

    vec![Layer::tone(Waveform::Sine, start_hz, end_hz, sweep)
        .decay(decay)
        .peak(velocity)]
}
