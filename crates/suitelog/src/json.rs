//! JSON results file.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    description::Description,
    error::Result,
    notifier::{Failure, RunListener, RunResult},
};

/// Outcome of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Finished without failure.
    Passed,
    /// Reported at least one failure.
    Failed,
    /// Skipped without running.
    Ignored,
}

/// One entry in the results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Class name.
    pub class: String,
    /// Method name.
    pub method: String,
    /// Outcome.
    pub status: Status,
    /// Elapsed time in milliseconds (zero for ignored tests).
    pub elapsed_ms: u64,
    /// Failure message, for failed tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The whole results document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonResults {
    /// Number of passed tests.
    pub passed: usize,
    /// Number of failed tests.
    pub failed: usize,
    /// Number of ignored tests.
    pub ignored: usize,
    /// Run duration in milliseconds.
    pub elapsed_ms: u64,
    /// Per-test records in completion order.
    pub tests: Vec<TestRecord>,
}

impl JsonResults {
    /// Read a results file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write a results file, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Collects per-test records and writes them as JSON when the run finishes.
pub struct JsonListener {
    /// Destination file.
    path: PathBuf,
    /// Results accumulated so far.
    results: JsonResults,
    /// Start times of tests in flight, by display name.
    started: HashMap<String, Instant>,
    /// Failures not yet matched by a finish, by display name.
    failures: HashMap<String, Failure>,
}

impl JsonListener {
    /// Create a listener that writes to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            results: JsonResults::default(),
            started: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    /// Build a record for `description`.
    fn record(
        description: &Description,
        status: Status,
        elapsed_ms: u64,
        message: Option<String>,
    ) -> TestRecord {
        TestRecord {
            class: description.class_name().to_string(),
            method: description
                .method_name()
                .unwrap_or(description.display_name())
                .to_string(),
            status,
            elapsed_ms,
            message,
        }
    }
}

impl RunListener for JsonListener {
    fn test_started(&mut self, description: &Description) {
        self.started
            .insert(description.display_name().to_string(), Instant::now());
    }

    fn test_failure(&mut self, failure: &Failure) {
        self.failures.insert(
            failure.description.display_name().to_string(),
            failure.clone(),
        );
    }

    fn test_finished(&mut self, description: &Description) {
        let key = description.display_name();
        let elapsed_ms = self
            .started
            .remove(key)
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0);
        let rec = match self.failures.remove(key) {
            Some(failure) => {
                self.results.failed += 1;
                Self::record(description, Status::Failed, elapsed_ms, Some(failure.message))
            }
            None => {
                self.results.passed += 1;
                Self::record(description, Status::Passed, elapsed_ms, None)
            }
        };
        self.results.tests.push(rec);
    }

    fn test_ignored(&mut self, description: &Description) {
        self.results.ignored += 1;
        self.results
            .tests
            .push(Self::record(description, Status::Ignored, 0, None));
    }

    fn test_run_finished(&mut self, result: &RunResult) {
        // Suite-level failures have no matching test_finished.
        let mut orphans: Vec<_> = self.failures.drain().map(|(_, f)| f).collect();
        orphans.sort_by(|a, b| a.description.display_name().cmp(b.description.display_name()));
        for f in orphans {
            self.results.failed += 1;
            self.results.tests.push(Self::record(
                &f.description,
                Status::Failed,
                0,
                Some(f.message),
            ));
        }
        self.results.elapsed_ms = result.run_time.as_millis() as u64;
        match self.results.save(&self.path) {
            Ok(()) => info!(
                path = %self.path.display(),
                tests = self.results.tests.len() as u64,
                "json_results_written"
            ),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write JSON results"
            ),
        }
    }
}
