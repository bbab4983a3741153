//! Harness entry point: parse arguments, build the logging suite, run it.
//!
//! A test binary typically does nothing more than
//!
//! ```no_run
//! use std::process::ExitCode;
//! use suitelog::TestClass;
//!
//! fn main() -> ExitCode {
//!     let classes = vec![TestClass::new("FooTest").test("works", || Ok(()))];
//!     suitelog::test_main::main(&classes)
//! }
//! ```

use std::{
    env,
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Instant,
};

use clap::Parser;
use logging::LogArgs;
use tracing::{error, info, warn};

use crate::{
    class_runner::TestClass,
    computer::LoggingComputer,
    error::{Error, Result},
    filter::{Filterable, GtestFilter},
    gtest::{GtestListener, GtestLogger},
    json::JsonListener,
    logger::TracingLogger,
    notifier::{RunNotifier, RunResult},
    runner::{ClassRunnerBuilder, Runner},
};

/// Command-line arguments understood by test binaries.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "suitelog",
    about = "Run test classes with googletest-style output",
    version
)]
pub struct TestArgs {
    /// Logging controls
    #[command(flatten)]
    pub log: LogArgs,

    /// Only run tests matching this googletest filter, e.g. `FooTest.*-FooTest.slow`
    #[arg(
        long = "gtest-filter",
        alias = "gtest_filter",
        value_name = "PATTERN",
        allow_hyphen_values = true
    )]
    pub gtest_filter: Option<String>,

    /// Write per-test results to this JSON file
    #[arg(long, value_name = "PATH")]
    pub json_results_file: Option<PathBuf>,

    /// Stop after the first failing test
    #[arg(long)]
    pub fail_fast: bool,

    /// List the selected tests instead of running them
    #[arg(long)]
    pub list: bool,
}

/// Run `runner` to completion, bracketing it with run started/finished
/// notifications.
///
/// A stop request ends the run early but still yields a result; any other
/// runner error is returned.
pub fn run_runner(runner: &mut dyn Runner, notifier: &mut RunNotifier) -> Result<RunResult> {
    let start = Instant::now();
    notifier.fire_test_run_started(&runner.description());
    match runner.run(notifier) {
        Ok(()) => {}
        Err(Error::StoppedByUser) => warn!("test run stopped early"),
        Err(e) => return Err(e),
    }
    Ok(notifier.fire_test_run_finished(start.elapsed()))
}

/// Build, filter, and run `classes` according to `args`, writing
/// googletest-style output to `out`.
pub fn run_classes(
    classes: &[TestClass],
    args: &TestArgs,
    out: Box<dyn Write + Send>,
) -> Result<RunResult> {
    let gtest = Arc::new(GtestLogger::new(out));
    let computer = LoggingComputer::new(Arc::new((Arc::clone(&gtest), TracingLogger)));
    let mut suite = computer.build_suite(&ClassRunnerBuilder, classes)?;

    if let Some(spec) = &args.gtest_filter {
        let filter = GtestFilter::parse(spec)?;
        suite.filter(&filter)?;
    }

    if args.list {
        for test in suite.description().tests() {
            gtest.list_test(test);
        }
        return Ok(RunResult::default());
    }

    let mut notifier = RunNotifier::new().with_fail_fast(args.fail_fast);
    notifier.add_listener(Box::new(GtestListener::new(Arc::clone(&gtest))));
    if let Some(path) = &args.json_results_file {
        notifier.add_listener(Box::new(JsonListener::new(path)));
    }

    info!(
        classes = suite.len() as u64,
        tests = suite.test_count() as u64,
        "running suite"
    );
    run_runner(&mut suite, &mut notifier)
}

/// Parse `args`, install logging, run `classes` to stdout, and return the
/// process exit status: 0 on success, 1 on failures or errors, 2 on bad usage.
pub fn run_main<I, T>(classes: &[TestClass], args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match TestArgs::try_parse_from(args) {
        Ok(a) => a,
        Err(e) => {
            let _ignored = e.print();
            return if e.use_stderr() { 2 } else { 0 };
        }
    };
    logging::init(&args.log.spec());

    match run_classes(classes, &args, Box::new(io::stdout())) {
        Ok(result) if result.was_successful() => 0,
        Ok(result) => {
            info!(failed = result.failure_count() as u64, "test run failed");
            1
        }
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            1
        }
    }
}

/// Entry point for test binaries, reading arguments from the environment.
pub fn main(classes: &[TestClass]) -> ExitCode {
    ExitCode::from(run_main(classes, env::args_os()))
}

#[cfg(test)]
mod tests {
    use std::result;

    use super::*;
    use crate::{json::JsonResults, testing::SharedBuf};

    fn pass() -> result::Result<(), String> {
        Ok(())
    }

    fn fail() -> result::Result<(), String> {
        Err("mismatch".into())
    }

    fn classes() -> Vec<TestClass> {
        vec![
            TestClass::new("FooTest")
                .test("one", pass)
                .test("two", pass)
                .test("three", pass),
            TestClass::new("BarTest").test("bad", fail).test("good", pass),
        ]
    }

    fn args(extra: &[&str]) -> TestArgs {
        TestArgs::try_parse_from(["suitelog"].iter().chain(extra)).unwrap()
    }

    #[test]
    fn parses_flags() {
        let a = args(&[
            "--gtest-filter",
            "Foo*",
            "--json-results-file",
            "out.json",
            "--fail-fast",
            "--debug",
        ]);
        assert_eq!(a.gtest_filter.as_deref(), Some("Foo*"));
        assert_eq!(a.json_results_file, Some(PathBuf::from("out.json")));
        assert!(a.fail_fast);
        assert!(a.log.debug);
        assert!(!a.list);

        let alias = args(&["--gtest_filter=Bar.*"]);
        assert_eq!(alias.gtest_filter.as_deref(), Some("Bar.*"));
    }

    #[test]
    fn negative_only_filter_is_a_value() {
        let a = args(&["--gtest-filter", "-FooTest.two:BarTest.*", "--list"]);
        assert_eq!(a.gtest_filter.as_deref(), Some("-FooTest.two:BarTest.*"));
        assert!(a.list);
    }

    #[test]
    fn conflicting_log_flags_are_rejected() {
        assert!(TestArgs::try_parse_from(["suitelog", "--trace", "--debug"]).is_err());
    }

    #[test]
    fn runs_all_classes_with_suite_lines() {
        let buf = SharedBuf::default();
        let r = run_classes(&classes(), &args(&[]), Box::new(buf.clone())).unwrap();
        assert_eq!(r.run_count, 5);
        assert_eq!(r.failure_count(), 1);

        let text = buf.text();
        assert!(text.starts_with("[==========] Running 5 tests.\n"));
        assert!(text.contains("[----------] Running 3 tests from FooTest.\n"));
        assert!(text.contains("[----------] Running 2 tests from BarTest.\n"));
        assert!(text.contains("[  FAILED  ] BarTest.bad ("));
        assert!(text.contains("[  PASSED  ] 4 tests.\n"));
        assert!(text.ends_with("1 FAILED TESTS\n"));

        let foo_start = text.find("Running 3 tests from FooTest").unwrap();
        let foo_run = text.find("[ RUN      ] FooTest.one").unwrap();
        let foo_end = text.find("Run 3 test cases from FooTest").unwrap();
        assert!(foo_start < foo_run && foo_run < foo_end);
    }

    #[test]
    fn filter_applies_before_logging() {
        let buf = SharedBuf::default();
        let r = run_classes(
            &classes(),
            &args(&["--gtest-filter", "FooTest.t*"]),
            Box::new(buf.clone()),
        )
        .unwrap();
        assert_eq!(r.run_count, 2);
        assert!(r.was_successful());

        let text = buf.text();
        assert!(text.contains("[----------] Running 2 tests from FooTest.\n"));
        assert!(!text.contains("BarTest"));
    }

    #[test]
    fn filter_matching_nothing_is_an_error() {
        let err = run_classes(
            &classes(),
            &args(&["--gtest-filter", "Nope.*"]),
            Box::new(SharedBuf::default()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoTestsRemain { .. }));
    }

    #[test]
    fn list_prints_selected_names() {
        let buf = SharedBuf::default();
        run_classes(
            &classes(),
            &args(&["--list", "--gtest-filter", "-FooTest.two"]),
            Box::new(buf.clone()),
        )
        .unwrap();
        assert_eq!(
            buf.text(),
            "FooTest.one\nFooTest.three\nBarTest.bad\nBarTest.good\n"
        );
    }

    #[test]
    fn fail_fast_stops_after_first_failure() {
        let buf = SharedBuf::default();
        let cs = vec![
            TestClass::new("BarTest").test("bad", fail).test("good", pass),
            TestClass::new("FooTest").test("one", pass),
        ];
        let r = run_classes(&cs, &args(&["--fail-fast"]), Box::new(buf.clone())).unwrap();
        assert_eq!(r.run_count, 1);
        assert_eq!(r.failure_count(), 1);

        let text = buf.text();
        assert!(!text.contains("Run 2 test cases from BarTest"));
        assert!(!text.contains("FooTest"));
        assert!(text.contains("[==========] 1 tests ran."));
    }

    #[test]
    fn writes_json_results() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("results.json");
        let path_arg = path.to_string_lossy().into_owned();
        run_classes(
            &classes(),
            &args(&["--json-results-file", &path_arg]),
            Box::new(SharedBuf::default()),
        )
        .unwrap();

        let r = JsonResults::load(&path).unwrap();
        assert_eq!((r.passed, r.failed, r.ignored), (4, 1, 0));
        assert_eq!(r.tests[3].method, "bad");
    }

    #[test]
    fn run_main_exit_codes() {
        assert_eq!(run_main(&classes(), ["t", "--gtest-filter", "FooTest.*"]), 0);
        assert_eq!(run_main(&classes(), ["t"]), 1);
        assert_eq!(run_main(&classes(), ["t", "--gtest-filter", "Nope"]), 1);
        assert_eq!(run_main(&classes(), ["t", "--no-such-flag"]), 2);
    }
}
