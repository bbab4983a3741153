//! Composite suites and the computers that assemble them.

use std::mem;

use tracing::debug;

use crate::{
    class_runner::TestClass,
    description::Description,
    error::{Error, Result},
    filter::{Filter, Filterable},
    notifier::RunNotifier,
    runner::{Runner, RunnerBuilder, apply_filter},
};

/// Name given to suites assembled by a [`Computer`].
pub const DEFAULT_SUITE_NAME: &str = "classes";

/// A runner made of child runners, executed in order.
pub struct Suite {
    /// Suite name.
    name: String,
    /// Child runners.
    runners: Vec<Box<dyn Runner>>,
}

impl Suite {
    /// Create a suite from already-built runners.
    pub fn new(name: impl Into<String>, runners: Vec<Box<dyn Runner>>) -> Self {
        Self {
            name: name.into(),
            runners,
        }
    }

    /// Build one runner per class with `builder`, in order. The first builder
    /// error is returned as-is.
    pub fn from_classes(
        name: impl Into<String>,
        builder: &dyn RunnerBuilder,
        classes: &[TestClass],
    ) -> Result<Self> {
        let runners = classes
            .iter()
            .map(|c| builder.runner_for_class(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, runners))
    }

    /// Number of child runners.
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// True when the suite has no children.
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

impl Runner for Suite {
    fn description(&self) -> Description {
        let mut d = Description::suite(&self.name);
        for r in &self.runners {
            d.add_child(r.description());
        }
        d
    }

    fn run(&mut self, notifier: &mut RunNotifier) -> Result<()> {
        for r in &mut self.runners {
            r.run(notifier)?;
        }
        Ok(())
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        Some(self)
    }
}

impl Filterable for Suite {
    /// Drop children the filter rejects outright, filter the rest, and drop
    /// those that end up empty. Errors other than "no tests remain" abort;
    /// the failing child and every child not yet visited stay in the suite.
    fn filter(&mut self, filter: &dyn Filter) -> Result<()> {
        let mut kept = Vec::with_capacity(self.runners.len());
        let mut pending = mem::take(&mut self.runners).into_iter();
        while let Some(mut r) = pending.next() {
            if !filter.should_run(&r.description()) {
                continue;
            }
            match apply_filter(r.as_mut(), filter) {
                Ok(()) => kept.push(r),
                Err(Error::NoTestsRemain { .. }) => {}
                Err(e) => {
                    kept.push(r);
                    kept.extend(pending);
                    self.runners = kept;
                    return Err(e);
                }
            }
        }
        debug!(suite = %self.name, kept = kept.len(), filter = %filter.describe(), "suite_filtered");
        self.runners = kept;
        if self.runners.is_empty() {
            return Err(Error::no_tests_remain(filter.describe()));
        }
        Ok(())
    }
}

/// Strategy that turns a runner builder and a list of classes into a suite.
pub trait Computer {
    /// Build the suite for `classes`. The default builds an unwrapped
    /// [`Suite`] named [`DEFAULT_SUITE_NAME`].
    fn suite(&self, builder: &dyn RunnerBuilder, classes: &[TestClass]) -> Result<Suite> {
        Suite::from_classes(DEFAULT_SUITE_NAME, builder, classes)
    }
}

/// The plain computer: classes run one after another, with no decoration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComputer;

impl Computer for SerialComputer {}

#[cfg(test)]
mod tests {
    use std::result;

    use super::*;
    use crate::{
        filter::{All, GtestFilter},
        runner::ClassRunnerBuilder,
    };

    fn pass() -> result::Result<(), String> {
        Ok(())
    }

    fn classes() -> Vec<TestClass> {
        vec![
            TestClass::new("FooTest").test("a", pass).test("b", pass),
            TestClass::new("BarTest").test("c", pass),
        ]
    }

    #[test]
    fn serial_computer_runs_every_class() {
        let mut suite = SerialComputer.suite(&ClassRunnerBuilder, &classes()).unwrap();
        assert_eq!(suite.len(), 2);
        assert_eq!(suite.test_count(), 3);
        assert_eq!(suite.description().display_name(), DEFAULT_SUITE_NAME);

        let mut n = RunNotifier::new();
        suite.run(&mut n).unwrap();
        assert_eq!(n.result().run_count, 3);
    }

    #[test]
    fn builder_errors_propagate() {
        let mut cs = classes();
        cs.push(TestClass::new("EmptyTest"));
        let err = SerialComputer.suite(&ClassRunnerBuilder, &cs).err().unwrap();
        assert!(matches!(err, Error::Initialization { ref class, .. } if class == "EmptyTest"));
    }

    #[test]
    fn filter_drops_unmatched_children() {
        let mut suite = SerialComputer.suite(&ClassRunnerBuilder, &classes()).unwrap();
        suite.filter(&GtestFilter::parse("BarTest.*").unwrap()).unwrap();
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.test_count(), 1);
    }

    #[test]
    fn filter_removing_all_children_errors() {
        let mut suite = SerialComputer.suite(&ClassRunnerBuilder, &classes()).unwrap();
        let err = suite.filter(&GtestFilter::parse("Nope.*").unwrap()).unwrap_err();
        assert!(matches!(err, Error::NoTestsRemain { .. }));
    }

    /// Runner whose filter always fails with an invalid-filter error.
    struct Picky;

    impl Runner for Picky {
        fn description(&self) -> Description {
            Description::class("Picky").with_child(Description::test("Picky", "x"))
        }

        fn run(&mut self, _notifier: &mut RunNotifier) -> Result<()> {
            Ok(())
        }

        fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
            Some(self)
        }
    }

    impl Filterable for Picky {
        fn filter(&mut self, _filter: &dyn Filter) -> Result<()> {
            Err(Error::InvalidFilter("picky".into()))
        }
    }

    #[test]
    fn filter_error_keeps_children() {
        let mut built = SerialComputer.suite(&ClassRunnerBuilder, &classes()).unwrap();
        let bar = built.runners.pop().unwrap();
        let foo = built.runners.pop().unwrap();
        let mut suite = Suite::new("s", vec![foo, Box::new(Picky), bar]);

        let err = suite.filter(&All).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(ref m) if m == "picky"));
        assert_eq!(suite.len(), 3);
        assert_eq!(suite.test_count(), 4);
    }
}
