//! Science provides the `Experiment` struct, which runs a trusted code path
//! (the control) next to a refactored one (the candidate), times both,
//! compares what they return and reports the outcome, without changing what
//! the surrounding code observes.
//!
//! Let's imagine that we already have a function called `load_from_db`, which
//! loads some data from a database. We've written `load_from_cache` to get the
//! same data from a cache instead, and before switching over we want to know
//! whether the two ever disagree in production. Every run of the experiment
//! executes both, in random order, catches any panic raised by the cache path,
//! and hands an `Outcome` to the publish sink.
//!
//! ```
//! use science::Experiment;
//! use std::sync::{Arc, Mutex};
//!
//! fn load_from_db(id: u32) -> u32 { id }
//! fn load_from_cache(id: u32) -> u32 { id }
//!
//! let mismatches = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&mismatches);
//!
//! let id = 4;
//! let experiment = Experiment::new("cache migration")
//!     .control(move || load_from_db(id))
//!     .candidate(move || load_from_cache(id))
//!     .publish(move |outcome| {
//!         if !outcome.matched {
//!             eprintln!(
//!                 "DB & cache data differ - db={:?}, cache={:?}",
//!                 outcome.control.value,
//!                 outcome.candidate.value,
//!             );
//!             sink.lock().unwrap().push(outcome);
//!         }
//!     });
//!
//! experiment.run().unwrap();
//! assert!(mismatches.lock().unwrap().is_empty());
//! ```
//!
//! Use `enabled` with a [`rollout::Percent`] to only run the comparison for a
//! fraction of calls; the rest execute the control alone.

pub mod comparator;
pub mod error;
pub mod experiment;
pub mod outcome;
pub mod random;
pub mod rollout;

pub use error::{Error, Result};
pub use experiment::{Experiment, RunOrder};
pub use outcome::{Observation, Outcome};
pub use random::RandomSource;
pub use rollout::Rollout;
