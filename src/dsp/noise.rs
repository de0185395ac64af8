use rand::{rngs::SmallRng, Rng, SeedableRng};

/// White noise source. Each instance carries its own small RNG so two
/// simultaneous hits never share a sequence.
pub struct Noise {
    rng: SmallRng,
}

impl Noise {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests and offline rendering.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        self.rng.gen_range(-1.0f32..1.0)
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range_and_is_not_constant() {
        let mut noise = Noise::seeded(42);
        let samples: Vec<f32> = (0..1024).map(|_| noise.next_sample()).collect();
        assert!(samples.iter().all(|s| s.abs() < 1.0));
        assert!(samples.iter().any(|&s| s != samples[0]));
    }
}
