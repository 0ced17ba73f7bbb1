//! Policy layer: turns a [`Diff`] into assertion failures.

use std::collections::BTreeSet;

use regex::RegexBuilder;
use serde_json::Value;

use crate::diff::{diff, Diff};
use crate::error::{ComparisonError, Mismatch, PathParseError};
use crate::path::{JsonPath, Segment};

/// Tolerances applied by [`compare`].
///
/// ```
/// use assay_diff::CompareOptions;
///
/// let options = CompareOptions::new()
///     .ignore_order(true)
///     .try_exclude("root['meta']['requestId']")
///     .unwrap();
/// assert!(options.ignore_order);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Match array elements regardless of position.
    pub ignore_order: bool,
    /// Compare strings and patterns case-insensitively.
    pub ignore_string_case: bool,
    /// Subtrees left out of the comparison entirely.
    pub exclude_paths: BTreeSet<JsonPath>,
}

impl CompareOptions {
    /// Strict options: positional arrays, case-sensitive, nothing excluded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether array order is ignored.
    #[must_use]
    pub fn ignore_order(mut self, ignore: bool) -> Self {
        self.ignore_order = ignore;
        self
    }

    /// Sets whether string case is ignored.
    #[must_use]
    pub fn ignore_string_case(mut self, ignore: bool) -> Self {
        self.ignore_string_case = ignore;
        self
    }

    /// Excludes a subtree.
    #[must_use]
    pub fn exclude_path(mut self, path: JsonPath) -> Self {
        self.exclude_paths.insert(path);
        self
    }

    /// Excludes a subtree given in `root['a'][0]` notation.
    pub fn try_exclude(self, path: &str) -> Result<Self, PathParseError> {
        Ok(self.exclude_path(path.parse()?))
    }

    /// Excludes several subtrees given in `root['a'][0]` notation.
    pub fn try_exclude_all<I, S>(mut self, paths: I) -> Result<Self, PathParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self = self.try_exclude(path.as_ref())?;
        }
        Ok(self)
    }

    /// Returns true if `path` is an excluded path or lies below one.
    #[must_use]
    pub fn is_excluded(&self, path: &JsonPath) -> bool {
        self.exclude_paths
            .iter()
            .any(|excluded| path.starts_with(excluded))
    }
}

/// Compares `actual` against `expected`.
///
/// Fails with every mismatch found:
///
/// - an object member removed from `actual` is an error unless `expected`
///   holds `null` there
/// - a changed value is an error unless `^(?:expected)$` matches the actual value
///   rendered as a string, or `expected` is `null`
/// - paths only present in `actual` are ignored, and so are array elements
///   only present in `expected`
///
/// ```
/// use assay_diff::{compare, CompareOptions};
/// use serde_json::json;
///
/// let err = compare(&json!({"a": 1}), &json!({"a": 1, "b": 2}), &CompareOptions::new())
///     .unwrap_err();
/// assert_eq!(err.mismatches().len(), 1);
/// ```
pub fn compare(
    actual: &Value,
    expected: &Value,
    options: &CompareOptions,
) -> Result<(), ComparisonError> {
    let differences = diff(expected, actual, options);
    let errors = mismatches(&differences, expected, options);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ComparisonError::new(errors))
    }
}

/// Classifies the entries of `diff` under the comparison policy.
///
/// `expected` must be the baseline document the diff was computed from.
pub fn mismatches(diff: &Diff, expected: &Value, options: &CompareOptions) -> Vec<Mismatch> {
    let missing = diff
        .removed
        .iter()
        .filter(|path| matches!(path.segments().last(), Some(Segment::Key(_))))
        .filter(|path| matches!(path.resolve(expected), Some(value) if !value.is_null()))
        .map(|path| Mismatch::Missing { path: path.clone() });

    // A null expectation marks the field as optional.
    let not_matching = diff.changed.iter().filter(|change| !change.expected.is_null());
    let not_matching = not_matching.filter_map(|change| {
        let pattern = render(&change.expected);
        let source = render(&change.actual);
        if pattern_matches(&pattern, &source, options.ignore_string_case) {
            None
        } else {
            Some(Mismatch::NotMatching {
                path: change.path.clone(),
                expected: pattern,
                actual: source,
            })
        }
    });

    missing.chain(not_matching).collect()
}

// Strings render raw; everything else as compact JSON, so `1` matches "1".
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pattern_matches(pattern: &str, source: &str, ignore_case: bool) -> bool {
    let anchored = format!("^(?:{pattern})$");
    match RegexBuilder::new(&anchored)
        .case_insensitive(ignore_case)
        .build()
    {
        Ok(re) => re.is_match(source),
        // Not a valid pattern: fall back to a literal comparison.
        Err(_) if ignore_case => pattern.to_lowercase() == source.to_lowercase(),
        Err(_) => pattern == source,
    }
}
