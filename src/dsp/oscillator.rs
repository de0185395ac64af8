use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Oscillator waveforms, in the cycle order the panel steps through them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// The next waveform in panel order (wraps around).
    pub fn cycled(self) -> Self {
        match self {
            Waveform::Sine => Waveform::Square,
            Waveform::Square => Waveform::Sawtooth,
            Waveform::Sawtooth => Waveform::Triangle,
            Waveform::Triangle => Waveform::Sine,
        }
    }

    /// Three-letter display label.
    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "SIN",
            Waveform::Square => "SQR",
            Waveform::Sawtooth => "SAW",
            Waveform::Triangle => "TRI",
        }
    }
}

/// Phase-accumulator oscillator. Frequency is supplied per sample so voices
/// can sweep pitch without rebuilding the oscillator.
pub struct Oscillator {
    waveform: Waveform,
    phase: f32, // 0.0 .. 1.0
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
        };

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();

        sample
    }

    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}
