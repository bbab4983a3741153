//! Metadata describing tests and suites.

use std::fmt;

/// Identifies a single test or a suite of tests.
///
/// A test leaf carries both a class and a method name. A suite carries a
/// display name and an ordered list of children. Runners hand descriptions out
/// by value, so a description never changes after it has been obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// Human-readable name (`Class.method` for tests).
    display_name: String,
    /// Owning class name, when known.
    class_name: Option<String>,
    /// Method name, present only on test leaves.
    method_name: Option<String>,
    /// Child descriptions, in run order.
    children: Vec<Self>,
}

impl Description {
    /// Create a suite description with no children.
    pub fn suite(name: impl Into<String>) -> Self {
        Self {
            display_name: name.into(),
            class_name: None,
            method_name: None,
            children: Vec::new(),
        }
    }

    /// Create a suite description for a test class.
    pub fn class(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            display_name: class_name.clone(),
            class_name: Some(class_name),
            method_name: None,
            children: Vec::new(),
        }
    }

    /// Create a test leaf for `method_name` in `class_name`.
    pub fn test(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        let method_name = method_name.into();
        Self {
            display_name: format!("{}.{}", class_name, method_name),
            class_name: Some(class_name),
            method_name: Some(method_name),
            children: Vec::new(),
        }
    }

    /// Append a child description.
    pub fn add_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Builder-style variant of [`Self::add_child`].
    pub fn with_child(mut self, child: Self) -> Self {
        self.add_child(child);
        self
    }

    /// Display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Class name, falling back to the display name for anonymous suites.
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or(&self.display_name)
    }

    /// Method name for test leaves.
    pub fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    /// Child descriptions.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Whether this describes a single test.
    pub fn is_test(&self) -> bool {
        self.method_name.is_some()
    }

    /// Whether this describes a suite.
    pub fn is_suite(&self) -> bool {
        !self.is_test()
    }

    /// Number of tests under this description. A test counts as one; an
    /// empty suite counts as zero.
    pub fn test_count(&self) -> usize {
        if self.is_test() {
            1
        } else {
            self.children.iter().map(Self::test_count).sum()
        }
    }

    /// All test leaves beneath this description, depth first.
    pub fn tests(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        self.collect_tests(&mut out);
        out
    }

    /// Depth-first accumulator for [`Self::tests`].
    fn collect_tests<'a>(&'a self, out: &mut Vec<&'a Self>) {
        if self.is_test() {
            out.push(self);
        } else {
            for child in &self.children {
                child.collect_tests(out);
            }
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tests_recursively() {
        let foo = Description::class("FooTest")
            .with_child(Description::test("FooTest", "a"))
            .with_child(Description::test("FooTest", "b"));
        let bar = Description::class("BarTest").with_child(Description::test("BarTest", "c"));
        let all = Description::suite("all").with_child(foo).with_child(bar);

        assert_eq!(all.test_count(), 3);
        assert_eq!(all.children()[0].test_count(), 2);
        let names: Vec<_> = all.tests().into_iter().map(|d| d.display_name()).collect();
        assert_eq!(names, vec!["FooTest.a", "FooTest.b", "BarTest.c"]);
    }

    #[test]
    fn empty_suite_counts_zero() {
        let d = Description::suite("empty");
        assert!(d.is_suite());
        assert_eq!(d.test_count(), 0);
        assert_eq!(d.class_name(), "empty");
    }

    #[test]
    fn test_leaf_names() {
        let d = Description::test("FooTest", "works");
        assert!(d.is_test());
        assert_eq!(d.to_string(), "FooTest.works");
        assert_eq!(d.class_name(), "FooTest");
        assert_eq!(d.method_name(), Some("works"));
    }
}
