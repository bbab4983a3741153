//! The suite logging collaborator and its structured-log implementation.

use std::sync::Arc;

use tracing::info;

use crate::description::Description;

/// Receives suite start/finish events from [`crate::LoggingComputer`].
///
/// Formatting and delivery are entirely up to the implementation.
pub trait SuiteLogger {
    /// A suite with `test_count` tests is about to run.
    fn on_suite_started(&self, description: &Description, test_count: usize);

    /// A suite finished normally after `elapsed_ms` milliseconds.
    fn on_suite_finished(&self, description: &Description, test_count: usize, elapsed_ms: u64);
}

impl<T: SuiteLogger + ?Sized> SuiteLogger for Arc<T> {
    fn on_suite_started(&self, description: &Description, test_count: usize) {
        (**self).on_suite_started(description, test_count);
    }

    fn on_suite_finished(&self, description: &Description, test_count: usize, elapsed_ms: u64) {
        (**self).on_suite_finished(description, test_count, elapsed_ms);
    }
}

/// Fan out to both loggers, first then second.
impl<A: SuiteLogger, B: SuiteLogger> SuiteLogger for (A, B) {
    fn on_suite_started(&self, description: &Description, test_count: usize) {
        self.0.on_suite_started(description, test_count);
        self.1.on_suite_started(description, test_count);
    }

    fn on_suite_finished(&self, description: &Description, test_count: usize, elapsed_ms: u64) {
        self.0.on_suite_finished(description, test_count, elapsed_ms);
        self.1.on_suite_finished(description, test_count, elapsed_ms);
    }
}

/// Emits suite events as `tracing` events at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SuiteLogger for TracingLogger {
    fn on_suite_started(&self, description: &Description, test_count: usize) {
        info!(
            suite = %description,
            tests = test_count as u64,
            "suite_started"
        );
    }

    fn on_suite_finished(&self, description: &Description, test_count: usize, elapsed_ms: u64) {
        info!(
            suite = %description,
            tests = test_count as u64,
            elapsed_ms,
            "suite_finished"
        );
    }
}
