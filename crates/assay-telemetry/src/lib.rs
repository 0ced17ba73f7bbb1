//! # Assay Telemetry
//!
//! Logging setup for test runs, built on `tracing-subscriber`.
//!
//! Libraries in this workspace only emit `tracing` events; a suite calls
//! [`init_logging`] once to decide where they go.

#![doc(html_root_url = "https://docs.rs/assay-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, init_logging, LogConfig};
