use crate::random::{RandomSource, ThreadRandom};
use std::sync::Arc;

/// A method for deciding if an experiment should run its candidate at all
pub trait Rollout {
    /// `true` runs control and candidate and compares them, `false` runs only
    /// the control
    fn enabled(&self) -> bool;
}

impl Rollout for bool {
    fn enabled(&self) -> bool {
        *self
    }
}

impl<F> Rollout for F
where
    F: Fn() -> bool,
{
    fn enabled(&self) -> bool {
        self()
    }
}

/// The simplest rollout strategy, a floating point number between 0 and 100 that
/// represents the percentage of runs which should exercise the candidate. The
/// candidate results will be compared to the control results.
pub struct Percent {
    fraction: f64,
    source: Arc<dyn RandomSource>,
}

impl Percent {
    /// Create a new rollout Percent
    pub fn new(percent: f64) -> Self {
        Self::with_source(percent, Arc::new(ThreadRandom))
    }

    /// Create a rollout Percent that draws from `source` instead of the thread
    /// generator
    pub fn with_source(percent: f64, source: Arc<dyn RandomSource>) -> Self {
        Self {
            fraction: percent / 100.0,
            source,
        }
    }
}

impl Rollout for Percent {
    fn enabled(&self) -> bool {
        self.source.next_f64() < self.fraction
    }
}
