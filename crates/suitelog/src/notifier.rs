//! Run notifications: listeners, the notifier that fans events out, and the
//! tally of results collected along the way.

use std::time::Duration;

use tracing::debug;

use crate::{
    description::Description,
    error::{Error, Result},
};

/// A failed test and the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// The failing test (or suite, for class-level failures).
    pub description: Description,
    /// Failure message.
    pub message: String,
}

impl Failure {
    /// Create a failure for `description`.
    pub fn new(description: Description, message: impl Into<String>) -> Self {
        Self {
            description,
            message: message.into(),
        }
    }
}

/// Counts accumulated while a run is in progress.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Tests that finished (passed or failed).
    pub run_count: usize,
    /// Tests reported as ignored.
    pub ignore_count: usize,
    /// Failures in report order.
    pub failures: Vec<Failure>,
    /// Wall-clock duration of the whole run.
    pub run_time: Duration,
}

impl RunResult {
    /// Number of failures.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of finished tests that did not fail.
    pub fn passed_count(&self) -> usize {
        self.run_count.saturating_sub(self.failures.len())
    }

    /// True when nothing failed.
    pub fn was_successful(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Receives events as a run progresses. Every callback defaults to a no-op.
pub trait RunListener {
    /// Called once before any test runs.
    fn test_run_started(&mut self, _description: &Description) {}

    /// Called once after the whole run completed normally.
    fn test_run_finished(&mut self, _result: &RunResult) {}

    /// Called when a test is about to start.
    fn test_started(&mut self, _description: &Description) {}

    /// Called when a test has finished, whether it passed or failed.
    fn test_finished(&mut self, _description: &Description) {}

    /// Called when a test fails. Precedes `test_finished` for that test.
    fn test_failure(&mut self, _failure: &Failure) {}

    /// Called for tests that are skipped without being started.
    fn test_ignored(&mut self, _description: &Description) {}
}

/// Fans run events out to registered listeners and tallies the results.
///
/// Passed through unchanged by every runner wrapper.
#[derive(Default)]
pub struct RunNotifier {
    /// Listeners, notified in registration order.
    listeners: Vec<Box<dyn RunListener>>,
    /// Running tally.
    result: RunResult,
    /// Set by [`Self::please_stop`]; checked when a test starts.
    stop_requested: bool,
    /// Request a stop on the first failure.
    fail_fast: bool,
}

impl RunNotifier {
    /// Create a notifier with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop after the first failure.
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Register a listener.
    pub fn add_listener(&mut self, listener: Box<dyn RunListener>) {
        self.listeners.push(listener);
    }

    /// Ask the run to stop. The next [`Self::fire_test_started`] returns
    /// [`Error::StoppedByUser`].
    pub fn please_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Whether a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// The tally so far.
    pub fn result(&self) -> &RunResult {
        &self.result
    }

    /// Notify listeners that the run is starting.
    pub fn fire_test_run_started(&mut self, description: &Description) {
        for l in &mut self.listeners {
            l.test_run_started(description);
        }
    }

    /// Record the run time and notify listeners that the run finished.
    pub fn fire_test_run_finished(&mut self, run_time: Duration) -> RunResult {
        self.result.run_time = run_time;
        let result = self.result.clone();
        for l in &mut self.listeners {
            l.test_run_finished(&result);
        }
        result
    }

    /// Notify listeners that a test is starting, unless a stop was requested.
    pub fn fire_test_started(&mut self, description: &Description) -> Result<()> {
        if self.stop_requested {
            debug!(test = %description, "stop requested; refusing to start test");
            return Err(Error::StoppedByUser);
        }
        for l in &mut self.listeners {
            l.test_started(description);
        }
        Ok(())
    }

    /// Record a failure and notify listeners.
    pub fn fire_test_failure(&mut self, failure: Failure) {
        for l in &mut self.listeners {
            l.test_failure(&failure);
        }
        self.result.failures.push(failure);
        if self.fail_fast {
            self.stop_requested = true;
        }
    }

    /// Record a finished test and notify listeners.
    pub fn fire_test_finished(&mut self, description: &Description) {
        self.result.run_count += 1;
        for l in &mut self.listeners {
            l.test_finished(description);
        }
    }

    /// Record an ignored test and notify listeners.
    pub fn fire_test_ignored(&mut self, description: &Description) {
        self.result.ignore_count += 1;
        for l in &mut self.listeners {
            l.test_ignored(description);
        }
    }
}
