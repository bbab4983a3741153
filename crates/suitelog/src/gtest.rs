//! googletest-style console output.
//!
//! [`GtestLogger`] renders the familiar `[ RUN      ]` / `[       OK ]` lines.
//! It handles suite events directly as a [`SuiteLogger`]; per-test and per-run
//! lines are driven by [`GtestListener`], which shares the same logger.

use std::{
    collections::HashMap,
    io::Write,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{
    description::Description,
    logger::SuiteLogger,
    notifier::{Failure, RunListener, RunResult},
};

/// Writes googletest-formatted progress lines to a sink.
///
/// Write errors are ignored; console output is best-effort.
pub struct GtestLogger {
    /// Output sink.
    out: Mutex<Box<dyn Write + Send>>,
}

impl GtestLogger {
    /// Create a logger writing to `out`.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Write one line and flush.
    fn line(&self, text: &str) {
        let mut out = self.out.lock();
        let _ignored = writeln!(out, "{}", text);
        let _ignored = out.flush();
    }

    /// Bare `Class.method` line, used when listing tests.
    pub fn list_test(&self, test: &Description) {
        self.line(&test_name(test));
    }

    /// `[==========] Running N tests.`
    pub fn test_run_started(&self, test_count: usize) {
        self.line(&format!("[==========] Running {} tests.", test_count));
    }

    /// `[ RUN      ] Class.method`
    pub fn test_started(&self, test: &Description) {
        self.line(&format!("[ RUN      ] {}", test_name(test)));
    }

    /// `[       OK ]` or `[  FAILED  ]` with the test's elapsed time.
    pub fn test_finished(&self, test: &Description, passed: bool, elapsed_ms: u64) {
        let tag = if passed { "[       OK ]" } else { "[  FAILED  ]" };
        self.line(&format!("{} {} ({} ms)", tag, test_name(test), elapsed_ms));
    }

    /// Summary block closing the run.
    pub fn test_run_finished(&self, passed: usize, failed: &[Description], elapsed_ms: u64) {
        self.line(&format!(
            "[==========] {} tests ran. ({} ms total)",
            passed + failed.len(),
            elapsed_ms
        ));
        self.line(&format!("[  PASSED  ] {} tests.", passed));
        if !failed.is_empty() {
            self.line(&format!(
                "[  FAILED  ] {} tests, listed below:",
                failed.len()
            ));
            for test in failed {
                self.line(&format!("[  FAILED  ] {}", test_name(test)));
            }
            self.line("");
            self.line(&format!("{} FAILED TESTS", failed.len()));
        }
    }
}

impl SuiteLogger for GtestLogger {
    fn on_suite_started(&self, description: &Description, test_count: usize) {
        self.line(&format!(
            "[----------] Running {} tests from {}.",
            test_count,
            description.class_name()
        ));
    }

    fn on_suite_finished(&self, description: &Description, test_count: usize, elapsed_ms: u64) {
        self.line(&format!(
            "[----------] Run {} test cases from {} ({} ms)",
            test_count,
            description.class_name(),
            elapsed_ms
        ));
        self.line("");
    }
}

/// `Class.method` for tests, the display name otherwise.
fn test_name(d: &Description) -> String {
    match d.method_name() {
        Some(m) => format!("{}.{}", d.class_name(), m),
        None => d.display_name().to_string(),
    }
}

/// Drives a [`GtestLogger`] from notifier events.
pub struct GtestListener {
    /// Shared output.
    logger: Arc<GtestLogger>,
    /// Start time of the run.
    run_start: Option<Instant>,
    /// Start time of the running test.
    test_start: Option<Instant>,
    /// Failures not yet matched by a finish, by display name.
    failed: HashMap<String, Description>,
    /// Failed tests in finish order.
    failed_tests: Vec<Description>,
}

impl GtestListener {
    /// Create a listener writing through `logger`.
    pub fn new(logger: Arc<GtestLogger>) -> Self {
        Self {
            logger,
            run_start: None,
            test_start: None,
            failed: HashMap::new(),
            failed_tests: Vec::new(),
        }
    }
}

impl RunListener for GtestListener {
    fn test_run_started(&mut self, description: &Description) {
        self.run_start = Some(Instant::now());
        self.logger.test_run_started(description.test_count());
    }

    fn test_run_finished(&mut self, result: &RunResult) {
        // Failures reported against a suite never see a test_finished.
        let mut orphans: Vec<_> = self.failed.drain().map(|(_, d)| d).collect();
        orphans.sort_by(|a, b| a.display_name().cmp(b.display_name()));
        self.failed_tests.extend(orphans);
        let elapsed = if result.run_time.is_zero() {
            self.run_start.map(|s| s.elapsed()).unwrap_or(Duration::ZERO)
        } else {
            result.run_time
        };
        self.logger.test_run_finished(
            result.passed_count(),
            &self.failed_tests,
            elapsed.as_millis() as u64,
        );
    }

    fn test_started(&mut self, description: &Description) {
        self.test_start = Some(Instant::now());
        self.logger.test_started(description);
    }

    fn test_failure(&mut self, failure: &Failure) {
        self.failed.insert(
            failure.description.display_name().to_string(),
            failure.description.clone(),
        );
    }

    fn test_finished(&mut self, description: &Description) {
        let elapsed_ms = self
            .test_start
            .take()
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0);
        let passed = self.failed.remove(description.display_name()).is_none();
        if !passed {
            self.failed_tests.push(description.clone());
        }
        self.logger.test_finished(description, passed, elapsed_ms);
    }
}
