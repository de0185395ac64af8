//! Percussion synthesis.
//!
//! Every drum hit is a short self-terminating voice assembled from one or
//! more `Layer`s: a pitch-swept oscillator, or white noise through a fixed
//! filter. Each layer carries its own start offset, linear attack and
//! exponential decay, so a clap can stack three bursts plus a tail while a
//! kick is a single swept sine.
//!
//! The recipe files in this module map `(kit, instrument)` pairs to layer
//! stacks. Velocity scales peak gain linearly.

mod clap;
mod cymbal;
mod hihat;
mod kick;
mod perc;
mod snare;
mod tom;

use crate::catalog::kits::{InstrumentId, KitId};
use crate::dsp::filter::{coefficients, FilterMode, SvFilter};
use crate::dsp::noise::Noise;
use crate::dsp::oscillator::{Oscillator, Waveform};

/// Decay terminates when the exponential reaches this fraction of peak.
const DECAY_FLOOR: f32 = 0.001;

pub(crate) enum Source {
    Tone {
        osc: Oscillator,
        start_hz: f32,
        end_hz: f32,
        sweep_secs: f32,
    },
    Noise(Noise),
}

pub(crate) struct Layer {
    source: Source,
    filter: Option<(SvFilter, f32, f32)>,
    start: f32,
    attack: f32,
    decay: f32,
    peak: f32,
}

impl Layer {
    pub(crate) fn tone(waveform: Waveform, start_hz: f32, end_hz: f32, sweep_secs: f32) -> Self {
        Self {
            source: Source::Tone {
                osc: Oscillator::new(waveform),
                start_hz,
                end_hz,
                sweep_secs: sweep_secs.max(1e-3),
            },
            filter: None,
            start: 0.0,
            attack: 0.002,
            decay: 0.1,
            peak: 1.0,
        }
    }

    pub(crate) fn noise() -> Self {
        Self {
            source: Source::Noise(Noise::new()),
            filter: None,
            start: 0.0,
            attack: 0.002,
            decay: 0.1,
            peak: 1.0,
        }
    }

    pub(crate) fn filtered(
        mut self,
        mode: FilterMode,
        cutoff_hz: f32,
        q: f32,
        sample_rate: f32,
    ) -> Self {
        let (g, k) = coefficients(cutoff_hz, q, sample_rate);
        self.filter = Some((SvFilter::new(mode), g, k));
        self
    }

    pub(crate) fn starting_at(mut self, secs: f32) -> Self {
        self.start = secs;
        self
    }

    pub(crate) fn attack(mut self, secs: f32) -> Self {
        self.attack = secs.max(1e-4);
        self
    }

    pub(crate) fn decay(mut self, secs: f32) -> Self {
        self.decay = secs.max(1e-3);
        self
    }

    pub(crate) fn peak(mut self, level: f32) -> Self {
        self.peak = level;
        self
    }

    fn end(&self) -> f32 {
        self.start + self.attack + self.decay
    }

    fn sample_at(&mut self, t: f32, sample_rate: f32) -> f32 {
        let local = t - self.start;
        if local < 0.0 {
            return 0.0;
        }

        let amp = if local < self.attack {
            self.peak * local / self.attack
        } else {
            self.peak * DECAY_FLOOR.powf((local - self.attack) / self.decay)
        };

        let raw = match &mut self.source {
            Source::Tone {
                osc,
                start_hz,
                end_hz,
                sweep_secs,
            } => {
                let progress = (local / *sweep_secs).min(1.0);
                let frequency = *start_hz * (*end_hz / *start_hz).powf(progress);
                osc.next_sample(frequency, sample_rate)
            }
            Source::Noise(noise) => noise.next_sample(),
        };

        let shaped = match &mut self.filter {
            Some((filter, g, k)) => filter.process(raw, *g, *k),
            None => raw,
        };

        amp * shaped
    }
}

/// A triggered drum hit. Renders additively into the mix until every layer
/// has decayed to the floor, then reports itself finished.
pub struct DrumVoice {
    layers: Vec<Layer>,
    frame: i64,
    end_secs: f32,
    done: bool,
}

impl DrumVoice {
    pub(crate) fn from_layers(layers: Vec<Layer>) -> Self {
        let end_secs = layers.iter().map(Layer::end).fold(0.0, f32::max);
        Self {
            layers,
            frame: 0,
            end_secs,
            done: false,
        }
    }

    /// Delay the first sample by `frames` within the next render block, so a
    /// sequencer tick can land mid-block instead of snapping to its start.
    pub fn with_offset(mut self, frames: u32) -> Self {
        self.frame = -(frames as i64);
        self
    }

    pub fn render_add(&mut self, out: &mut [f32], sample_rate: f32) {
        for sample in out.iter_mut() {
            if self.frame >= 0 {
                let t = self.frame as f32 / sample_rate;
                if t <= self.end_secs {
                    for layer in &mut self.layers {
                        *sample += layer.sample_at(t, sample_rate);
                    }
                } else {
                    self.done = true;
                }
            }
            self.frame += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }
}

/// Build the one-shot recipe for a pad. Unknown instruments fall back to the
/// kick so a stale preset row still makes a sound instead of going silent.
pub fn build(kit: KitId, instrument: InstrumentId, velocity: f32, sample_rate: f32) -> DrumVoice {
    let velocity = velocity.clamp(0.0, 1.0);
    let layers = match instrument {
        "kick" => kick::layers(kit, velocity),
        "snare" => snare::layers(kit, velocity, sample_rate),
        "hihat-closed" => hihat::layers(kit, velocity, sample_rate, false),
        "hihat-open" => hihat::layers(kit, velocity, sample_rate, true),
        "clap" => clap::layers(velocity, sample_rate),
        "tom-low" => tom::layers(80.0, velocity),
        "tom-mid" => tom::layers(120.0, velocity),
        "tom-high" => tom::layers(180.0, velocity),
        "ride" => cymbal::ride(velocity, sample_rate),
        "crash" => cymbal::crash(velocity, sample_rate),
        "rim" => perc::rim(velocity),
        "perc-1" => perc::blip(800.0, velocity),
        "perc-2" => perc::blip(1_200.0, velocity),
        "fx" => perc::sweep_fx(velocity),
        _ => kick::layers(kit, velocity),
    };
    DrumVoice::from_layers(layers)
}
