use crate::catalog::kits::KitId;
use crate::dsp::filter::FilterMode;
use crate::dsp::oscillator::Waveform;

use super::Layer;

/// Snares are two layers: a filtered noise body and a short pitched thump.
pub(super) fn layers(kit: KitId, velocity: f32, sample_rate: f32) -> Vec<Layer> {
    match kit {
        KitId::Classic808 => vec![
            Layer::noise()
                .filtered(FilterMode::HighPass, 1_000.0, 1.0, sample_rate)
                .decay(0.2)
                .peak(0.7 * velocity),
            Layer::tone(Waveform::Triangle, 180.0, 80.0, 0.05)
                .decay(0.1)
                .peak(0.5 * velocity),
        ],
        KitId::Acoustic => vec![
            Layer::noise()
                .filtered(FilterMode::BandPass, 3_000.0, 1.0, sample_rate)
                .decay(0.15)
                .peak(0.8 * velocity),
            Layer::tone(Waveform::Triangle, 200.0, 120.0, 0.04)
                .decay(0.08)
                .peak(0.4 * velocity),
        ],
        KitId::Electronic => vec![
            Layer::noise()
                .filtered(FilterMode::HighPass, 1_500.0, 1.0, sample_rate)
                .decay(0.15)
                .peak(0.7 * velocity),
            Layer::tone(Waveform::Triangle, 220.0, 100.0, 0.04)
                .decay(0.08)
                .peak(0.5 * velocity),
        ],
    }
}
