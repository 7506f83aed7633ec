use chrono::{DateTime, Utc};
use std::time::Duration;

/// One execution of the control or the candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T> {
    /// Wall-clock time spent inside the function
    pub duration: Duration,

    /// The returned value. Only `None` when the candidate panicked.
    pub value: Option<T>,

    /// Panic message, if the candidate panicked with a string payload
    pub panic: Option<String>,
}

impl<T> Observation<T> {
    pub(crate) fn returned(duration: Duration, value: T) -> Self {
        Self {
            duration,
            value: Some(value),
            panic: None,
        }
    }

    pub(crate) fn panicked(duration: Duration, message: Option<String>) -> Self {
        Self {
            duration,
            value: None,
            panic: message,
        }
    }

    /// `true` when the function panicked instead of returning
    pub fn is_panicked(&self) -> bool {
        self.value.is_none()
    }
}

/// The full record of one enabled run, handed to the publish sink
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    /// Name of the experiment
    pub name: String,

    /// Time the measured pair started
    pub timestamp: DateTime<Utc>,

    /// Whether the control ran before the candidate
    pub control_first: bool,

    /// Whether the comparator accepted the two values. Always `false` when
    /// the candidate panicked.
    pub matched: bool,

    /// Control results
    pub control: Observation<T>,

    /// Candidate results
    pub candidate: Observation<T>,
}

impl<T> Outcome<T> {
    /// `true` when the candidate panicked during this run
    pub fn candidate_panicked(&self) -> bool {
        self.candidate.is_panicked()
    }
}
