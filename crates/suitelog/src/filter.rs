//! Filters that narrow which tests a runner executes.

use regex::Regex;

use crate::{
    description::Description,
    error::{Error, Result},
};

/// A predicate over test descriptions.
pub trait Filter {
    /// Whether the described test should run. For suites, implementations
    /// should answer true when any contained test would run.
    fn should_run(&self, description: &Description) -> bool;

    /// Short human-readable description, used in errors and logs.
    fn describe(&self) -> String;
}

/// A runner that can drop tests in response to a filter.
pub trait Filterable {
    /// Remove tests that `filter` rejects. Fails with
    /// [`Error::NoTestsRemain`] when nothing is left.
    fn filter(&mut self, filter: &dyn Filter) -> Result<()>;
}

/// Filter that accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct All;

impl Filter for All {
    fn should_run(&self, _description: &Description) -> bool {
        true
    }

    fn describe(&self) -> String {
        "all tests".to_string()
    }
}

/// googletest-style name filter.
///
/// Syntax is `POSITIVE[:POSITIVE...][-NEGATIVE[:NEGATIVE...]]`, where each
/// pattern may use `*` (any run of characters) and `?` (one character) and is
/// matched against the full `Class.method` name. An empty positive part means
/// every test.
#[derive(Debug, Clone)]
pub struct GtestFilter {
    /// The filter string as given.
    spec: String,
    /// Patterns a test must match (any of). Empty accepts all.
    positive: Vec<Regex>,
    /// Patterns that exclude a test.
    negative: Vec<Regex>,
}

impl GtestFilter {
    /// Parse a googletest filter string.
    pub fn parse(spec: &str) -> Result<Self> {
        let (pos, neg) = match spec.split_once('-') {
            Some((p, n)) => (p, n),
            None => (spec, ""),
        };
        Ok(Self {
            spec: spec.to_string(),
            positive: patterns(pos)?,
            negative: patterns(neg)?,
        })
    }

    /// Whether the full `Class.method` name passes this filter.
    pub fn matches_name(&self, name: &str) -> bool {
        let included = self.positive.is_empty() || self.positive.iter().any(|r| r.is_match(name));
        included && !self.negative.iter().any(|r| r.is_match(name))
    }
}

impl Filter for GtestFilter {
    fn should_run(&self, description: &Description) -> bool {
        if description.is_test() {
            return self.matches_name(description.display_name());
        }
        description
            .children()
            .iter()
            .any(|child| self.should_run(child))
    }

    fn describe(&self) -> String {
        format!("gtest-filter: {}", self.spec)
    }
}

/// Split a `:`-separated pattern list and compile each entry.
fn patterns(list: &str) -> Result<Vec<Regex>> {
    list.split(':')
        .filter(|p| !p.is_empty())
        .map(glob_to_regex)
        .collect()
}

/// Compile a `*`/`?` wildcard pattern into an anchored regex.
fn glob_to_regex(glob: &str) -> Result<Regex> {
    let mut re = String::with_capacity(glob.len() + 4);
    re.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| Error::InvalidFilter(format!("bad pattern {glob:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_and_negative_patterns() {
        let f = GtestFilter::parse("Foo*.*:Bar.exact-FooSlow.*:*.flaky").unwrap();
        assert!(f.matches_name("FooTest.works"));
        assert!(f.matches_name("Bar.exact"));
        assert!(!f.matches_name("Bar.other"));
        assert!(!f.matches_name("FooSlow.anything"));
        assert!(!f.matches_name("FooTest.flaky"));
    }

    #[test]
    fn empty_positive_means_all() {
        let f = GtestFilter::parse("-*.skip_me").unwrap();
        assert!(f.matches_name("Any.thing"));
        assert!(!f.matches_name("Any.skip_me"));
    }

    #[test]
    fn question_mark_and_literal_dots() {
        let f = GtestFilter::parse("A.t?").unwrap();
        assert!(f.matches_name("A.t1"));
        assert!(!f.matches_name("A.t12"));
        assert!(!f.matches_name("AXt1"));
    }

    #[test]
    fn suites_match_when_any_child_matches() {
        let suite = Description::class("FooTest")
            .with_child(Description::test("FooTest", "a"))
            .with_child(Description::test("FooTest", "b"));
        assert!(GtestFilter::parse("FooTest.b").unwrap().should_run(&suite));
        assert!(!GtestFilter::parse("FooTest.c").unwrap().should_run(&suite));
        assert!(All.should_run(&suite));
    }
}
