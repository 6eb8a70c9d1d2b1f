//! Seedable random source handed to generators and the emission scheduler

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct ParticleRng {
    inner: SmallRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy, for hosts that don't need reproducible runs
    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_entropy(),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Returns a double in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// `base` offset by a uniform draw in [-deviation, +deviation]
    pub fn jitter(&mut self, base: f32, deviation: f32) -> f32 {
        base + deviation * (self.next_f32() * 2.0 - 1.0)
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
