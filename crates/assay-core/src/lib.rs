//! # Assay Core
//!
//! Leaf types shared by the Assay crates:
//!
//! - [`ContentType`] - the closed set of media types the framework sends and asserts
//! - [`random`] - generators for randomized test input (names, numbers, CJK text)

#![doc(html_root_url = "https://docs.rs/assay-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod content_type;
pub mod random;

pub use content_type::{ContentType, ContentTypeError};
