//! Random sources for interval fuzz.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Yields values in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Seedable generator used by the app.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Always returns the same value.
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(pub f64);

impl FixedRandom {
    /// Fuzz factor of exactly 1.0.
    pub fn no_fuzz() -> Self {
        FixedRandom(0.5)
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}
