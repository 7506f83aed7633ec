use crate::comparator::deep_equal;
use crate::error::{Error, Result};
use crate::outcome::{Observation, Outcome};
use crate::random::{RandomSource, ThreadRandom};
use crate::rollout::Rollout;
use chrono::Utc;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

type ExperimentFn<T> = Box<dyn Fn() -> T + Send + Sync>;
type ComparatorFn<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;
type PublishFn<T> = Box<dyn Fn(Outcome<T>) + Send + Sync>;

/// Which of the two functions runs first during an enabled run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOrder {
    /// A single coin flip, made when the experiment is built, decides the
    /// order for every run of that experiment
    FixedPerExperiment,

    /// A fresh coin flip on every run
    RandomPerRun,

    /// The control always runs before the candidate
    ControlFirst,
}

impl Default for RunOrder {
    fn default() -> Self {
        RunOrder::FixedPerExperiment
    }
}

/// Runs a trusted `control` function and a refactored `candidate` side by
/// side, times both, compares their values and hands the [`Outcome`] to an
/// optional publish sink.
///
/// A panic inside the candidate is caught and recorded; a panic inside the
/// control propagates to the caller of [`run`](Experiment::run).
pub struct Experiment<T> {
    name: String,
    control: Option<ExperimentFn<T>>,
    candidate: Option<ExperimentFn<T>>,
    comparator: Option<ComparatorFn<T>>,
    enabled: Option<Box<dyn Rollout + Send + Sync>>,
    publish: Option<PublishFn<T>>,
    run_order: RunOrder,
    control_first: bool,
    random: Arc<dyn RandomSource>,
}

impl<T: PartialEq + 'static> Experiment<T> {
    /// Create a new experiment which compares values with `PartialEq` and is
    /// always enabled
    pub fn new(name: impl Into<String>) -> Self {
        Self::empty(name).comparator(deep_equal::<T>).enabled(true)
    }
}

impl<T: 'static> Experiment<T> {
    /// Create an experiment with no comparator and no enable predicate.
    ///
    /// Without a comparator [`run`](Experiment::run) fails with
    /// [`Error::MissingComparator`]; without an enable predicate only the
    /// control runs.
    pub fn empty(name: impl Into<String>) -> Self {
        let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);

        Self {
            name: name.into(),
            control: None,
            candidate: None,
            comparator: None,
            enabled: None,
            publish: None,
            run_order: RunOrder::default(),
            control_first: random.coin_flip(),
            random,
        }
    }

    /// Set the trusted code path
    pub fn control<F>(mut self, control: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.control = Some(Box::new(control));
        self
    }

    /// Set the code path being validated
    pub fn candidate<F>(mut self, candidate: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.candidate = Some(Box::new(candidate));
        self
    }

    /// Set the function deciding whether two values match. It is always called
    /// as `comparator(control, candidate)`.
    pub fn comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Set the predicate consulted at the start of every run
    pub fn enabled<R>(mut self, rollout: R) -> Self
    where
        R: Rollout + Send + Sync + 'static,
    {
        self.enabled = Some(Box::new(rollout));
        self
    }

    /// Set the sink which receives every outcome. It runs synchronously,
    /// before `run` returns.
    pub fn publish<F>(mut self, publish: F) -> Self
    where
        F: Fn(Outcome<T>) + Send + Sync + 'static,
    {
        self.publish = Some(Box::new(publish));
        self
    }

    /// Set how the run order is chosen
    pub fn run_order(mut self, run_order: RunOrder) -> Self {
        self.run_order = run_order;
        self
    }

    /// Replace the randomness source. The per-experiment ordering flag is
    /// flipped again from the new source.
    pub fn random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.control_first = random.coin_flip();
        self.random = random;
        self
    }

    /// Name passed through to every outcome
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the experiment.
    ///
    /// Only a missing control, candidate or comparator is an error, and in
    /// that case nothing executes. Mismatches and candidate panics are
    /// reported through the publish sink.
    pub fn run(&self) -> Result<()> {
        let control = self.control.as_ref().ok_or(Error::MissingControl)?;
        let candidate = self.candidate.as_ref().ok_or(Error::MissingCandidate)?;
        let comparator = self.comparator.as_ref().ok_or(Error::MissingComparator)?;

        let enabled = self
            .enabled
            .as_ref()
            .map_or(false, |rollout| rollout.enabled());

        if !enabled {
            tracing::debug!(name = %self.name, "experiment disabled, running control only");
            metrics::counter!(
                "science_experiment_run",
                "name" => self.name.clone(),
                "result" => "disabled"
            )
            .increment(1);

            control();
            return Ok(());
        }

        let span = tracing::info_span!("experiment", name = %self.name);
        let _entered = span.enter();

        let control_first = self.control_runs_first();
        let timestamp = Utc::now();

        let (control, candidate) = if control_first {
            let control = observe(control);
            (control, observe_isolated(candidate))
        } else {
            let candidate = observe_isolated(candidate);
            (observe(control), candidate)
        };

        let matched = match (&control.value, &candidate.value) {
            (Some(control), Some(candidate)) => comparator(control, candidate),
            _ => false,
        };

        let result = if candidate.is_panicked() {
            tracing::warn!(panic = ?candidate.panic, "candidate panicked");
            "candidate_panicked"
        } else if matched {
            "matched"
        } else {
            tracing::warn!(
                control_duration = ?control.duration,
                candidate_duration = ?candidate.duration,
                "control and candidate values differ"
            );
            "mismatched"
        };

        metrics::counter!(
            "science_experiment_run",
            "name" => self.name.clone(),
            "result" => result
        )
        .increment(1);
        metrics::histogram!(
            "science_experiment_duration_seconds",
            "name" => self.name.clone(),
            "variant" => "control"
        )
        .record(control.duration.as_secs_f64());
        metrics::histogram!(
            "science_experiment_duration_seconds",
            "name" => self.name.clone(),
            "variant" => "candidate"
        )
        .record(candidate.duration.as_secs_f64());

        if let Some(publish) = &self.publish {
            publish(Outcome {
                name: self.name.clone(),
                timestamp,
                control_first,
                matched,
                control,
                candidate,
            });
        }

        Ok(())
    }

    fn control_runs_first(&self) -> bool {
        match self.run_order {
            RunOrder::FixedPerExperiment => self.control_first,
            RunOrder::RandomPerRun => self.random.coin_flip(),
            RunOrder::ControlFirst => true,
        }
    }
}

impl<T> fmt::Debug for Experiment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Experiment")
            .field("name", &self.name)
            .field("control", &self.control.is_some())
            .field("candidate", &self.candidate.is_some())
            .field("comparator", &self.comparator.is_some())
            .field("enabled", &self.enabled.is_some())
            .field("publish", &self.publish.is_some())
            .field("run_order", &self.run_order)
            .field("control_first", &self.control_first)
            .finish()
    }
}

fn observe<T>(f: &ExperimentFn<T>) -> Observation<T> {
    let start = Instant::now();
    let value = f();

    Observation::returned(start.elapsed(), value)
}

fn observe_isolated<T>(f: &ExperimentFn<T>) -> Observation<T> {
    let start = Instant::now();
    let value = panic::catch_unwind(AssertUnwindSafe(|| f()));
    let duration = start.elapsed();

    match value {
        Ok(value) => Observation::returned(duration, value),
        Err(payload) => Observation::panicked(duration, panic_message(&*payload)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}
