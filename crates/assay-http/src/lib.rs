//! # Assay HTTP
//!
//! Blocking HTTP helpers for end-to-end API tests.
//!
//! ## Key Features
//!
//! - **Request Builder**: owned fluent builder, one chain per exchange
//! - **Response Assertions**: status, headers and bodies, returned as `Result`s
//! - **Structural JSON Checks**: subset matching with regex values via `assay-diff`
//! - **Polling**: repeat a request while the backend answers `code: 304`
//! - **Pluggable Transport**: `reqwest` by default, a scripted stub for tests
//!
//! ## Example
//!
//! ```no_run
//! use assay_http::{ApiRequest, BodyAssertion, ReqwestTransport};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new();
//!
//! let response = ApiRequest::post("https://api.example.com")
//!     .add_path("users")
//!     .set_json(&json!({"name": "Alice"}))
//!     .send(&transport)?;
//!
//! response
//!     .assert_status(201)?
//!     .assert_body(&BodyAssertion::json(json!({"id": "\\d+", "name": "Alice"})))?;
//! # Ok(())
//! # }
//! ```
//!
//! Every request carries a `test=automation` query parameter.

#![doc(html_root_url = "https://docs.rs/assay-http/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod param;
pub mod poll;
mod request;
mod response;
mod stub;
mod trace;
mod transport;

pub use error::{AssertionError, PollError, RequestError, TransportError};
pub use param::ParamValue;
pub use poll::{poll_until_ready, PollPolicy, ReadyState};
pub use request::{
    ApiRequest, Attachment, Body, Method, PreparedRequest, TlsVerify, AUTOMATION_MARKER,
    DEFAULT_TIMEOUT,
};
pub use response::{ApiResponse, BodyAssertion};
pub use stub::{RecordedRequest, StubTransport};
pub use transport::{RawResponse, ReqwestTransport, Transport};
