//! Random source adapter backed by `rand`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::RandomSource;

/// Standard random source, seeded from entropy or from a fixed seed
pub struct StdRandomAdapter {
    rng: StdRng,
}

impl StdRandomAdapter {
    /// Create a random source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible random source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for StdRandomAdapter {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
