/// Longest supported echo, in seconds. Matches the delay-time control range.
pub const MAX_DELAY_SECS: f32 = 2.0;

/// Circular delay line. Reads happen before writes, so a one-sample delay is
/// the shortest meaningful setting; a zero-sample request reads silence.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(sample_rate: f32) -> Self {
        let capacity = (MAX_DELAY_SECS * sample_rate) as usize + 1;
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// The sample written `delay_samples` ago.
    pub fn read(&self, delay_samples: usize) -> f32 {
        if delay_samples == 0 {
            return 0.0;
        }
        let len = self.buffer.len();
        let delay = delay_samples.min(len - 1);
        let read_pos = (self.write_pos + len - delay) % len;
        self.buffer[read_pos]
    }

    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_reappears_after_the_delay() {
        let mut line = DelayLine::new(1_000.0);
        let delay = 10;

        let mut heard_at = None;
        for n in 0..32 {
            let input = if n == 0 { 1.0 } else { 0.0 };
            let out = line.read(delay);
            line.write(input);
            if out != 0.0 && heard_at.is_none() {
                heard_at = Some(n);
            }
        }
        assert_eq!(heard_at, Some(delay));
    }

    #[test]
    fn zero_delay_reads_silence() {
        let mut line = DelayLine::new(1_000.0);
        line.write(0.7);
        assert_eq!(line.read(0), 0.0);
    }

    #[test]
    fn requests_beyond_capacity_are_clamped() {
        let mut line = DelayLine::new(100.0); // 201-sample buffer
        line.write(0.5);
        // Must not panic and must return something from the buffer.
        let _ = line.read(10_000);
    }
}
