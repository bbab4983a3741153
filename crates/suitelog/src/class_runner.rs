//! Test classes and the runner that executes one class.

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    result,
    time::Instant,
};

use tracing::trace;

use crate::{
    description::Description,
    error::{Error, Result},
    filter::{Filter, Filterable},
    notifier::{Failure, RunNotifier},
    runner::Runner,
};

/// Body of a single test case. `Err` or a panic marks the test failed.
pub type TestFn = fn() -> result::Result<(), String>;

/// One named case within a [`TestClass`].
#[derive(Clone)]
pub struct TestCase {
    /// Method name.
    name: String,
    /// Test body.
    body: TestFn,
    /// Report as ignored instead of running.
    ignored: bool,
}

impl TestCase {
    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this case is skipped.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

/// A named group of test cases, the unit a [`crate::RunnerBuilder`] turns
/// into a runner.
#[derive(Debug, Clone)]
pub struct TestClass {
    /// Class name.
    name: String,
    /// Cases in declaration order.
    cases: Vec<TestCase>,
}

impl TestClass {
    /// Create an empty class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Add a test case.
    pub fn test(mut self, name: impl Into<String>, body: TestFn) -> Self {
        self.cases.push(TestCase {
            name: name.into(),
            body,
            ignored: false,
        });
        self
    }

    /// Add a case that is reported as ignored and never run.
    pub fn ignored(mut self, name: impl Into<String>, body: TestFn) -> Self {
        self.cases.push(TestCase {
            name: name.into(),
            body,
            ignored: true,
        });
        self
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases in declaration order.
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }
}

/// Runs the cases of one [`TestClass`] in order.
#[derive(Debug)]
pub struct ClassRunner {
    /// Class name.
    class_name: String,
    /// Cases still selected to run.
    cases: Vec<TestCase>,
}

impl ClassRunner {
    /// Build a runner for `class`. Fails when the class has no cases.
    pub fn new(class: &TestClass) -> Result<Self> {
        if class.cases.is_empty() {
            return Err(Error::init(&class.name, "no runnable methods"));
        }
        Ok(Self {
            class_name: class.name.clone(),
            cases: class.cases.clone(),
        })
    }

    /// Description of one case.
    fn case_description(&self, case: &TestCase) -> Description {
        Description::test(&self.class_name, &case.name)
    }

    /// Run one case, reporting its outcome.
    fn run_case(&self, case: &TestCase, notifier: &mut RunNotifier) -> Result<()> {
        let desc = self.case_description(case);
        if case.ignored {
            notifier.fire_test_ignored(&desc);
            return Ok(());
        }
        notifier.fire_test_started(&desc)?;
        let start = Instant::now();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(case.body)) {
            Ok(r) => r,
            Err(payload) => Err(panic_message(payload.as_ref())),
        };
        trace!(
            test = %desc,
            ok = outcome.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "case_done"
        );
        if let Err(message) = outcome {
            notifier.fire_test_failure(Failure::new(desc.clone(), message));
        }
        notifier.fire_test_finished(&desc);
        Ok(())
    }
}

impl Runner for ClassRunner {
    fn description(&self) -> Description {
        let mut d = Description::class(&self.class_name);
        for case in &self.cases {
            d.add_child(self.case_description(case));
        }
        d
    }

    fn run(&mut self, notifier: &mut RunNotifier) -> Result<()> {
        for case in &self.cases {
            self.run_case(case, notifier)?;
        }
        Ok(())
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        Some(self)
    }
}

impl Filterable for ClassRunner {
    fn filter(&mut self, filter: &dyn Filter) -> Result<()> {
        let class_name = &self.class_name;
        self.cases
            .retain(|case| filter.should_run(&Description::test(class_name, &case.name)));
        if self.cases.is_empty() {
            return Err(Error::no_tests_remain(filter.describe()));
        }
        Ok(())
    }
}

/// Extract a printable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test panicked".to_string()
    }
}
