#![warn(missing_docs)]

//! Suite-level start/finish logging for test runners.
//!
//! The core piece is [`LoggingComputer`]: given a [`RunnerBuilder`] and a list
//! of [`TestClass`]es it builds a [`Suite`] in which every per-class runner is
//! wrapped by a [`SuiteRunner`]. Each wrapped runner reports
//! `on_suite_started` before it runs and `on_suite_finished` (with elapsed
//! milliseconds) after it returns normally, to any [`SuiteLogger`].
//!
//! Around that sit the pieces a harness needs: descriptions, a notifier with
//! listeners, googletest-style filters and console output, a JSON results
//! listener, and a [`test_main`] entry point for test binaries.

pub mod class_runner;
pub mod computer;
pub mod description;
pub mod error;
pub mod filter;
pub mod gtest;
pub mod json;
pub mod logger;
pub mod notifier;
pub mod runner;
pub mod suite;
pub mod test_main;

#[cfg(test)]
mod testing;

pub use class_runner::{ClassRunner, TestCase, TestClass, TestFn};
pub use computer::{LoggingComputer, SuiteRunner};
pub use description::Description;
pub use error::{Error, Result};
pub use filter::{All, Filter, Filterable, GtestFilter};
pub use gtest::{GtestListener, GtestLogger};
pub use json::{JsonListener, JsonResults, Status, TestRecord};
pub use logger::{SuiteLogger, TracingLogger};
pub use notifier::{Failure, RunListener, RunNotifier, RunResult};
pub use runner::{ClassRunnerBuilder, Runner, RunnerBuilder, apply_filter};
pub use suite::{Computer, SerialComputer, Suite};
