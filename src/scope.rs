//! Oscilloscope state.
//!
//! The scope pulls the engine's analysis tap into a rolling window and can
//! present it either as the raw waveform or as a log-binned spectrum. The
//! terminal front end only draws; all signal handling lives here so it can
//! be tested without a terminal.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::engine::AnalysisTap;

/// Samples kept in the rolling display window. Also the FFT size.
pub const SCOPE_WINDOW: usize = 1024;

/// Log-spaced frequency bins shown in spectrum mode.
const SPECTRUM_BINS: usize = 48;

const DB_FLOOR: f64 = -120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeMode {
    #[default]
    Waveform,
    Spectrum,
}

impl ScopeMode {
    pub fn cycled(self) -> Self {
        match self {
            ScopeMode::Waveform => ScopeMode::Spectrum,
            ScopeMode::Spectrum => ScopeMode::Waveform,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScopeMode::Waveform => "WAVE",
            ScopeMode::Spectrum => "SPECT",
        }
    }
}

/// Windowed FFT over the scope buffer, reduced to log-spaced dB bins
/// between 20 Hz and Nyquist.
pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        // Hann window keeps tones from smearing across bins.
        let denom = (fft_size - 1).max(1) as f32;
        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
            .collect();

        let min_freq = 20.0f64;
        let max_freq = (sample_rate as f64 / 2.0).min(20_000.0);
        let ratio = max_freq / min_freq;
        let half = fft_size / 2;

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = min_freq * ratio.powf(t);
            let index = (freq * fft_size as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half.saturating_sub(1)));
            spectrum.push((freq, DB_FLOOR));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            spectrum,
        }
    }

    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }
        for (slot, (sample, w)) in self
            .scratch
            .iter_mut()
            .zip(samples.iter().zip(&self.window))
        {
            slot.re = sample * w;
            slot.im = 0.0;
        }
        self.fft.process(&mut self.scratch);

        for (i, &index) in self.bin_indices.iter().enumerate() {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12) as f64;
            self.spectrum[i].1 = (10.0 * power.log10()).max(DB_FLOOR);
        }
    }

    /// `(frequency_hz, magnitude_db)` per bin.
    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub struct Scope {
    tap: Option<AnalysisTap>,
    window: Vec<f32>,
    mode: ScopeMode,
    analyzer: SpectrumAnalyzer,
}

impl Scope {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            tap: None,
            window: vec![0.0; SCOPE_WINDOW],
            mode: ScopeMode::default(),
            analyzer: SpectrumAnalyzer::new(SCOPE_WINDOW, sample_rate),
        }
    }

    pub fn attach(&mut self, tap: AnalysisTap) {
        self.tap = Some(tap);
    }

    pub fn is_attached(&self) -> bool {
        self.tap.is_some()
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.cycled();
    }

    /// Pull everything the engine has produced since the last call into the
    /// rolling window. Returns false when unattached or no new samples
    /// arrived, so an idle UI can skip redrawing.
    pub fn update(&mut self) -> bool {
        let Some(tap) = &mut self.tap else {
            return false;
        };

        let mut fresh = 0usize;
        while let Some(sample) = tap.pop() {
            self.window.rotate_left(1);
            if let Some(last) = self.window.last_mut() {
                *last = sample;
            }
            fresh += 1;
        }
        if fresh == 0 {
            return false;
        }
        if self.mode == ScopeMode::Spectrum {
            self.analyzer.update(&self.window);
        }
        true
    }

    pub fn waveform(&self) -> &[f32] {
        &self.window
    }

    pub fn spectrum(&self) -> &[(f64, f64)] {
        self.analyzer.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AudioEngine;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn unattached_scope_idles() {
        let mut scope = Scope::new(SAMPLE_RATE);
        assert!(!scope.update());
        assert!(scope.waveform().iter().all(|s| *s == 0.0));
    }

    #[test]
    fn window_holds_the_most_recent_samples() {
        let mut engine = AudioEngine::new(SAMPLE_RATE);
        let mut scope = Scope::new(SAMPLE_RATE);
        scope.attach(engine.take_analysis_tap().unwrap());

        let samples: std::sync::Arc<[f32]> = vec![0.25f32; 64].into();
        engine.play_loop(samples);
        let mut block = [0.0f32; 512];
        engine.render(&mut block);

        assert!(scope.update());
        // The tail of the window is the block just rendered.
        assert_eq!(scope.waveform()[SCOPE_WINDOW - 1], block[511]);
        assert_eq!(scope.waveform()[SCOPE_WINDOW - 512], block[0]);
    }

    #[test]
    fn spectrum_peaks_near_the_driving_tone() {
        let mut analyzer = SpectrumAnalyzer::new(SCOPE_WINDOW, SAMPLE_RATE);
        let tone: Vec<f32> = (0..SCOPE_WINDOW)
            .map(|n| (std::f32::consts::TAU * 1_000.0 * n as f32 / SAMPLE_RATE).sin())
            .collect();
        analyzer.update(&tone);

        let peak = analyzer
            .data()
            .iter()
            .cloned()
            .fold((0.0, f64::MIN), |best, bin| {
                if bin.1 > best.1 {
                    bin
                } else {
                    best
                }
            });
        assert!(
            (peak.0 - 1_000.0).abs() < 300.0,
            "peak landed at {} Hz",
            peak.0
        );
    }

    #[test]
    fn mode_cycles_between_both_views() {
        let mut scope = Scope::new(SAMPLE_RATE);
        assert_eq!(scope.mode(), ScopeMode::Waveform);
        scope.cycle_mode();
        assert_eq!(scope.mode(), ScopeMode::Spectrum);
        scope.cycle_mode();
        assert_eq!(scope.mode(), ScopeMode::Waveform);
    }
}
