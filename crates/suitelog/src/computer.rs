//! A computer that logs the start and end of every test class, googletest
//! style.
//!
//! [`LoggingComputer`] wraps the builder it is handed so that every per-class
//! runner comes back inside a [`SuiteRunner`]. The wrapper forwards
//! descriptions and filtering untouched and brackets `run` with
//! [`SuiteLogger::on_suite_started`] and [`SuiteLogger::on_suite_finished`].

use std::{sync::Arc, time::Instant};

use crate::{
    class_runner::TestClass,
    description::Description,
    error::Result,
    filter::{Filter, Filterable},
    logger::SuiteLogger,
    notifier::RunNotifier,
    runner::{Runner, RunnerBuilder},
    suite::{Computer, DEFAULT_SUITE_NAME, Suite},
};

/// Builds suites whose per-class runners report to a [`SuiteLogger`].
#[derive(Clone)]
pub struct LoggingComputer {
    /// Logger shared by every wrapped runner.
    logger: Arc<dyn SuiteLogger>,
}

impl LoggingComputer {
    /// Create a computer reporting to `logger`.
    pub fn new(logger: Arc<dyn SuiteLogger>) -> Self {
        Self { logger }
    }

    /// Build the suite for `classes`, wrapping each class runner.
    ///
    /// A builder failure for any class is returned unchanged.
    pub fn build_suite(&self, builder: &dyn RunnerBuilder, classes: &[TestClass]) -> Result<Suite> {
        self.suite(builder, classes)
    }
}

impl Computer for LoggingComputer {
    fn suite(&self, builder: &dyn RunnerBuilder, classes: &[TestClass]) -> Result<Suite> {
        let wrapping = WrappingBuilder {
            inner: builder,
            logger: &self.logger,
        };
        Suite::from_classes(DEFAULT_SUITE_NAME, &wrapping, classes)
    }
}

/// Builder adapter that wraps each produced runner in a [`SuiteRunner`].
struct WrappingBuilder<'a> {
    /// The caller's builder.
    inner: &'a dyn RunnerBuilder,
    /// Logger handed to each wrapper.
    logger: &'a Arc<dyn SuiteLogger>,
}

impl RunnerBuilder for WrappingBuilder<'_> {
    fn runner_for_class(&self, class: &TestClass) -> Result<Box<dyn Runner>> {
        let inner = self.inner.runner_for_class(class)?;
        Ok(Box::new(SuiteRunner::new(inner, Arc::clone(self.logger))))
    }
}

/// A runner that logs the start and end of the runner it contains.
pub struct SuiteRunner {
    /// The wrapped runner.
    inner: Box<dyn Runner>,
    /// Destination for start/finish events.
    logger: Arc<dyn SuiteLogger>,
}

impl SuiteRunner {
    /// Wrap `inner`, reporting to `logger`.
    pub fn new(inner: Box<dyn Runner>, logger: Arc<dyn SuiteLogger>) -> Self {
        Self { inner, logger }
    }
}

impl Runner for SuiteRunner {
    fn description(&self) -> Description {
        self.inner.description()
    }

    fn run(&mut self, notifier: &mut RunNotifier) -> Result<()> {
        let start = Instant::now();
        // Some runners clear their own metadata while running, so the
        // description and count must be read before the run.
        let desc = self.inner.description();
        let test_count = desc.test_count();
        self.logger.on_suite_started(&desc, test_count);
        self.inner.run(notifier)?;
        self.logger
            .on_suite_finished(&desc, test_count, start.elapsed().as_millis() as u64);
        Ok(())
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        Some(self)
    }
}

impl Filterable for SuiteRunner {
    fn filter(&mut self, filter: &dyn Filter) -> Result<()> {
        match self.inner.as_filterable() {
            Some(f) => f.filter(filter),
            None => Ok(()),
        }
    }
}
