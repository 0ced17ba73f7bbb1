//! # Assay Diff
//!
//! Structural comparison of an actual JSON document (usually a response body)
//! against an expected one.
//!
//! The comparison is deliberately lenient in one direction and strict in the
//! other:
//!
//! - fields that only exist in the actual document are tolerated
//! - fields the expected document declares with a non-null value must exist
//! - a `null` expectation accepts any value, and array elements only present
//!   in the expected document are not required
//! - a differing value passes when the expected value, used as a regex anchored
//!   at both ends, matches the actual value rendered as a string
//!
//! Every mismatch is collected before failing, so one assertion reports the
//! whole picture.
//!
//! ## Example
//!
//! ```
//! use assay_diff::{compare, CompareOptions};
//! use serde_json::json;
//!
//! let actual = json!({"id": "dev-0042", "status": "online", "extra": true});
//! let expected = json!({"id": "dev-\\d+", "status": "ONLINE"});
//!
//! let options = CompareOptions::new().ignore_string_case(true);
//! compare(&actual, &expected, &options).unwrap();
//! ```
//!
//! ## Paths
//!
//! Mismatches and exclusions use the `root['key'][0]` notation, see [`JsonPath`].

#![doc(html_root_url = "https://docs.rs/assay-diff/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod compare;
mod diff;
mod error;
mod json;
mod path;

pub use compare::{compare, mismatches, CompareOptions};
pub use diff::{diff, Change, Diff};
pub use error::{ComparisonError, Mismatch, PathParseError};
pub use json::{flatten, is_json};
pub use path::{JsonPath, Segment};
