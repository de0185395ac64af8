//! Benchmarks for the render path.
//!
//! Run with: cargo bench
//!
//! Everything here must finish far inside the block deadline; at 48 kHz a
//! 512-sample block gives the engine 10.67 ms.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tonedeck::catalog::kits::KitId;
use tonedeck::catalog::notes::PitchClass;
use tonedeck::dsp::envelope::Adsr;
use tonedeck::dsp::filter::{coefficients, FilterMode, SvFilter};
use tonedeck::dsp::oscillator::{Oscillator, Waveform};
use tonedeck::dsp::param::AudioParam;
use tonedeck::engine::AudioEngine;
use tonedeck::voices;

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn bench_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/param");
    let dt = 1.0 / SAMPLE_RATE as f64;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut flat = AudioParam::new(0.5);
        group.bench_with_input(BenchmarkId::new("flat", size), &size, |b, _| {
            b.iter(|| flat.render(black_box(&mut buffer), dt))
        });

        // A busy timeline: the release ramp never finishes inside the run.
        let mut ramping = AudioParam::new(0.0);
        ramping.ramp_to(3_600.0, 1.0);
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, _| {
            b.iter(|| ramping.render(black_box(&mut buffer), dt))
        });
    }

    group.finish();
}

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let mut osc = Oscillator::new(waveform);
            group.bench_with_input(
                BenchmarkId::new(waveform.label(), size),
                &size,
                |b, _| {
                    b.iter(|| osc.render(black_box(&mut buffer), 440.0, SAMPLE_RATE));
                },
            );
        }
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let (g, k) = coefficients(2_000.0, 1.0, SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let buffer = vec![0.1f32; size];
        let mut filter = SvFilter::new(FilterMode::LowPass);
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                for &sample in &buffer {
                    black_box(filter.process(black_box(sample), g, k));
                }
            })
        });
    }

    group.finish();
}

fn bench_drum_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("voices/drum");
    let mut buffer = vec![0.0f32; 512];

    for instrument in ["kick", "snare", "clap"] {
        group.bench_function(instrument, |b| {
            b.iter(|| {
                let mut voice = voices::build(KitId::Classic808, instrument, 1.0, SAMPLE_RATE);
                voice.render_add(black_box(&mut buffer), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}

fn bench_engine_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/render");

    // Eight held notes plus a drum hit: a busy but realistic moment.
    let mut engine = AudioEngine::new(SAMPLE_RATE);
    let envelope = Adsr::default();
    for (i, pitch) in PitchClass::ALL.iter().take(8).enumerate() {
        engine.note_on_at((*pitch, 4), 220.0 + i as f32 * 55.0, Waveform::Sawtooth, &envelope, 0);
    }
    engine.play_drum_at(KitId::Classic808, "kick", 1.0, 0);
    engine.set_delay_mix(0.4);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("8_voices", size), &size, |b, _| {
            b.iter(|| engine.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_param,
    bench_oscillator,
    bench_filter,
    bench_drum_voice,
    bench_engine_block,
);
criterion_main!(benches);
