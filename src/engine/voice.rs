use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::dsp::param::AudioParam;

/// One held (or releasing) synth note. The gain param carries the full
/// envelope automation on the engine clock; the voice itself only knows how
/// to render and when it may be dropped.
pub(crate) struct TonalVoice {
    osc: Oscillator,
    frequency: f32,
    pub(crate) gain: AudioParam,
    start_frame: u64,
    /// Engine time after which the voice is silent. `f64::INFINITY` while
    /// the key is held.
    pub(crate) stop_at: f64,
    /// Engine time after which the voice may be dropped from the mix.
    pub(crate) dispose_at: f64,
}

impl TonalVoice {
    pub(crate) fn new(frequency: f32, waveform: Waveform, start_frame: u64, start_time: f64) -> Self {
        Self {
            osc: Oscillator::new(waveform),
            frequency,
            gain: AudioParam::at(0.0, start_time),
            start_frame,
            stop_at: f64::INFINITY,
            dispose_at: f64::INFINITY,
        }
    }

    pub(crate) fn render_add(&mut self, out: &mut [f32], block_start: u64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            let frame = block_start + i as u64;
            if frame < self.start_frame {
                continue;
            }
            let amp = self.gain.tick(dt);
            *sample += amp * self.osc.next_sample(self.frequency, sample_rate);
        }
    }
}
