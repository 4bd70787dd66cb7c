//! Injectable randomness for the few selections that are random by design
//! (verse of the day, category keyword choice).

use std::sync::Mutex;

/// Picks an index in `0..len`. Callers guarantee `len > 0`.
pub trait RandomSource: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform selection from fastrand's thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        fastrand::usize(..len)
    }
}

/// Reproducible uniform selection from a seeded generator.
#[derive(Debug)]
pub struct SeededRandom(Mutex<fastrand::Rng>);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(fastrand::Rng::with_seed(seed)))
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, len: usize) -> usize {
        match self.0.lock() {
            Ok(mut rng) => rng.usize(..len),
            // poisoned only if a previous pick panicked; any index is fine
            Err(_) => 0,
        }
    }
}

/// Always picks the same position (modulo `len`). For tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}
