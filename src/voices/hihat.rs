use crate::catalog::kits::KitId;
use crate::dsp::filter::FilterMode;

use super::Layer;

/// Hi-hats are highpassed noise. Only the decay differs between the closed
/// and open articulations, with per-kit lengths.
pub(super) fn layers(kit: KitId, velocity: f32, sample_rate: f32, open: bool) -> Vec<Layer> {
    let (closed_decay, open_decay) = match kit {
        KitId::Classic808 => (0.05, 0.3),
        KitId::Acoustic => (0.04, 0.25),
        KitId::Electronic => (0.03, 0.2),
    };
    let decay = if open { open_decay } else { closed_decay };

    vec![Layer::noise()
        .filtered(FilterMode::HighPass, 7_000.0, 1.0, sample_rate)
        .attack(0.001)
        .decay(decay)
        .peak(0.6 * velocity)]
}
