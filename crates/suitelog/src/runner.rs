//! The runner abstraction and the builder seam used to construct runners per
//! test class.

use crate::{
    class_runner::{ClassRunner, TestClass},
    description::Description,
    error::Result,
    filter::{Filter, Filterable},
    notifier::RunNotifier,
};

/// Something that can execute a group of tests and report through a notifier.
pub trait Runner {
    /// Describe the tests this runner will execute.
    fn description(&self) -> Description;

    /// Execute the tests, reporting through `notifier`.
    ///
    /// Test failures are reported to the notifier, not returned. An `Err`
    /// means the run itself was aborted.
    fn run(&mut self, notifier: &mut RunNotifier) -> Result<()>;

    /// Filtering capability, if this runner supports it.
    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        None
    }

    /// Number of tests this runner will execute.
    fn test_count(&self) -> usize {
        self.description().test_count()
    }
}

/// Apply `filter` to `runner` if it is filterable; otherwise do nothing.
pub fn apply_filter(runner: &mut dyn Runner, filter: &dyn Filter) -> Result<()> {
    match runner.as_filterable() {
        Some(f) => f.filter(filter),
        None => Ok(()),
    }
}

/// Builds a runner for a test class.
pub trait RunnerBuilder {
    /// Produce a runner for `class`, or an initialization error.
    fn runner_for_class(&self, class: &TestClass) -> Result<Box<dyn Runner>>;
}

impl<F> RunnerBuilder for F
where
    F: Fn(&TestClass) -> Result<Box<dyn Runner>>,
{
    fn runner_for_class(&self, class: &TestClass) -> Result<Box<dyn Runner>> {
        self(class)
    }
}

/// Default builder producing a [`ClassRunner`] for each class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassRunnerBuilder;

impl RunnerBuilder for ClassRunnerBuilder {
    fn runner_for_class(&self, class: &TestClass) -> Result<Box<dyn Runner>> {
        Ok(Box::new(ClassRunner::new(class)?))
    }
}
