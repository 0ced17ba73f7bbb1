//! Comparison error types.

use std::fmt;

use thiserror::Error;

use crate::path::JsonPath;

/// A single difference that the comparison policy treats as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    /// The expected document has a non-null value the actual one lacks.
    #[error("Field in the response body is missing: {path}")]
    Missing {
        /// Location in the expected document.
        path: JsonPath,
    },

    /// The actual value does not match the expected pattern.
    #[error(
        "Field in the response body is not matching: {path}, expected: < {expected} > but actually: < {actual} >"
    )]
    NotMatching {
        /// Location of the value.
        path: JsonPath,
        /// Expected value, as used for the pattern.
        expected: String,
        /// Actual value, as matched against the pattern.
        actual: String,
    },
}

impl Mismatch {
    /// Location of the mismatch.
    #[must_use]
    pub fn path(&self) -> &JsonPath {
        match self {
            Self::Missing { path } | Self::NotMatching { path, .. } => path,
        }
    }
}

/// Aggregated comparison failure carrying every mismatch found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ComparisonError {
    mismatches: Vec<Mismatch>,
}

impl ComparisonError {
    /// Creates an error from a non-empty mismatch list.
    #[must_use]
    pub fn new(mismatches: Vec<Mismatch>) -> Self {
        debug_assert!(!mismatches.is_empty());
        Self { mismatches }
    }

    /// The mismatches, missing fields first, in document order.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Consumes the error and returns the mismatches.
    #[must_use]
    pub fn into_mismatches(self) -> Vec<Mismatch> {
        self.mismatches
    }
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "response body does not match the expected document ({} mismatch{}):",
            self.mismatches.len(),
            if self.mismatches.len() == 1 { "" } else { "es" }
        )?;
        for mismatch in &self.mismatches {
            write!(f, "\n  - {mismatch}")?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a valid [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid JSON path `{input}`: {reason}")]
pub struct PathParseError {
    /// The rejected input.
    pub input: String,
    /// What was wrong with it.
    pub reason: String,
}

impl PathParseError {
    pub(crate) fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
