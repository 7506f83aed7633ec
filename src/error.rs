use thiserror::Error;

/// Result type returned by [`Experiment::run`](crate::Experiment::run)
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors detected before anything executes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("control function missing")]
    MissingControl,

    #[error("candidate function missing")]
    MissingCandidate,

    #[error("comparator function missing")]
    MissingComparator,
}
