//! Structural diff between two JSON documents.

use serde_json::Value;

use crate::compare::{self, CompareOptions};
use crate::path::JsonPath;

/// A value that differs between the expected and the actual document.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Where the values differ.
    pub path: JsonPath,
    /// Value in the expected document.
    pub expected: Value,
    /// Value in the actual document.
    pub actual: Value,
}

/// Raw differences between an expected (baseline) and an actual document.
///
/// A `Diff` only describes what differs. Whether a difference is an error is
/// decided by [`mismatches`](crate::mismatches).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    /// Present in the expected document, absent in the actual one. Holds
    /// both object members and array elements.
    pub removed: Vec<JsonPath>,
    /// Present only in the actual document.
    pub added: Vec<JsonPath>,
    /// Present in both with different values.
    pub changed: Vec<Change>,
}

impl Diff {
    /// Returns true if the documents are structurally identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
    }
}

/// Computes the differences of `actual` relative to `expected`.
///
/// Excluded paths and everything below them are skipped. With
/// `ignore_order`, array elements are paired with the first unused actual
/// element that compares clean under the same options; leftovers are
/// reported as removed (expected side) or added (actual side).
pub fn diff(expected: &Value, actual: &Value, options: &CompareOptions) -> Diff {
    let mut differ = Differ {
        options,
        baseline: expected,
        out: Diff::default(),
    };
    differ.walk(&JsonPath::root(), expected, actual);
    differ.out
}

struct Differ<'a> {
    options: &'a CompareOptions,
    baseline: &'a Value,
    out: Diff,
}

impl Differ<'_> {
    fn walk(&mut self, path: &JsonPath, expected: &Value, actual: &Value) {
        if self.options.is_excluded(path) {
            return;
        }

        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                for (key, exp_value) in exp {
                    let child = path.key(key);
                    match act.get(key) {
                        Some(act_value) => self.walk(&child, exp_value, act_value),
                        None => self.removed(child),
                    }
                }
                for key in act.keys().filter(|k| !exp.contains_key(*k)) {
                    self.added(path.key(key));
                }
            }
            (Value::Array(exp), Value::Array(act)) if self.options.ignore_order => {
                self.walk_unordered(path, exp, act);
            }
            (Value::Array(exp), Value::Array(act)) => {
                for index in 0..exp.len().max(act.len()) {
                    let child = path.index(index);
                    match (exp.get(index), act.get(index)) {
                        (Some(e), Some(a)) => self.walk(&child, e, a),
                        (Some(_), None) => self.removed(child),
                        (None, Some(_)) => self.added(child),
                        (None, None) => {}
                    }
                }
            }
            _ => {
                if !self.scalars_equal(expected, actual) {
                    self.out.changed.push(Change {
                        path: path.clone(),
                        expected: expected.clone(),
                        actual: actual.clone(),
                    });
                }
            }
        }
    }

    fn walk_unordered(&mut self, path: &JsonPath, expected: &[Value], actual: &[Value]) {
        let mut used = vec![false; actual.len()];
        let mut paired = vec![false; expected.len()];

        // Identical elements first, so a pattern cannot take a literal's twin.
        for (index, exp_value) in expected.iter().enumerate() {
            if self.options.is_excluded(&path.index(index)) {
                paired[index] = true;
                continue;
            }
            if let Some(j) = (0..actual.len()).find(|&j| !used[j] && actual[j] == *exp_value) {
                used[j] = true;
                paired[index] = true;
            }
        }

        for (index, exp_value) in expected.iter().enumerate() {
            if paired[index] {
                continue;
            }
            let child = path.index(index);
            let found = (0..actual.len())
                .find(|&j| !used[j] && self.element_matches(&child, exp_value, &actual[j]));
            match found {
                Some(j) => used[j] = true,
                None => self.removed(child),
            }
        }

        for (j, _) in used.iter().enumerate().filter(|(_, u)| !**u) {
            self.added(path.index(j));
        }
    }

    // An element matches when a diff rooted at its position yields no mismatch.
    fn element_matches(&self, path: &JsonPath, expected: &Value, actual: &Value) -> bool {
        let mut sub = Differ {
            options: self.options,
            baseline: self.baseline,
            out: Diff::default(),
        };
        sub.walk(path, expected, actual);
        compare::mismatches(&sub.out, self.baseline, self.options).is_empty()
    }

    fn scalars_equal(&self, expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::Number(e), Value::Number(a)) => {
                e == a || matches!((e.as_f64(), a.as_f64()), (Some(x), Some(y)) if x == y)
            }
            (Value::String(e), Value::String(a)) if self.options.ignore_string_case => {
                e.to_lowercase() == a.to_lowercase()
            }
            _ => expected == actual,
        }
    }

    fn removed(&mut self, path: JsonPath) {
        if !self.options.is_excluded(&path) {
            self.out.removed.push(path);
        }
    }

    fn added(&mut self, path: JsonPath) {
        if !self.options.is_excluded(&path) {
            self.out.added.push(path);
        }
    }
}
