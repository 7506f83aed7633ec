//! Sources of randomness used to pick run order and rollout percentages.
//!
//! Everything random in this crate goes through a [`RandomSource`], so tests
//! can swap in [`SeededRandom`] or [`Fixed`] and get reproducible ordering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// A swappable source of randomness
pub trait RandomSource: Send + Sync {
    /// A uniformly distributed value in `[0, 1)`
    fn next_f64(&self) -> f64;

    /// An unbiased coin flip
    fn coin_flip(&self) -> bool {
        self.next_f64() < 0.5
    }
}

/// Draws from the thread-local generator. This is the default source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// A seeded generator; the same seed always yields the same sequence
#[derive(Debug)]
pub struct SeededRandom(Mutex<StdRng>);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        // a panic while holding the lock cannot leave the generator half-written
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen::<f64>()
    }
}

/// Always flips the same way. `Fixed(true)` means control runs first.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub bool);

impl RandomSource for Fixed {
    fn next_f64(&self) -> f64 {
        if self.0 {
            0.0
        } else {
            1.0 - f64::EPSILON
        }
    }

    fn coin_flip(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);

        let left: Vec<f64> = (0..16).map(|_| a.next_f64()).collect();
        let right: Vec<f64> = (0..16).map(|_| b.next_f64()).collect();

        assert_eq!(left, right);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let rng = SeededRandom::new(42);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }

        for _ in 0..1000 {
            let v = ThreadRandom.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn coin_flips_land_both_ways() {
        let rng = SeededRandom::new(1);
        let heads = (0..1000).filter(|_| rng.coin_flip()).count();

        assert!(heads > 400 && heads < 600, "heads = {}", heads);
    }

    #[test]
    fn fixed_never_changes() {
        assert!((0..10).all(|_| Fixed(true).coin_flip()));
        assert!((0..10).all(|_| !Fixed(false).coin_flip()));
        assert!(Fixed(true).next_f64() < 0.5);
        assert!(Fixed(false).next_f64() >= 0.5);
    }
}
