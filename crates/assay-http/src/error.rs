//! Request, transport, assertion and polling error types.

use std::path::PathBuf;

use assay_diff::ComparisonError;
use thiserror::Error;

/// Failure of the underlying HTTP exchange.
///
/// These are surfaced as-is; nothing in this crate retries them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Error raised by the HTTP client (timeout, connection refused, TLS...).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// A proxy scheme other than `http`, `https` or `all`.
    #[error("unsupported proxy scheme: {0}")]
    InvalidProxy(String),

    /// The CA bundle could not be read.
    #[error("failed to read CA bundle {path}: {source}")]
    CaBundle {
        /// Bundle location.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Errors returned by [`ApiRequest::send`](crate::ApiRequest::send).
#[derive(Debug, Error)]
pub enum RequestError {
    /// A body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An attachment could not be opened.
    #[error("failed to open attachment {path}: {source}")]
    Attachment {
        /// Path that was passed to `add_file`.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Contradictory builder settings.
    #[error("invalid request configuration: {0}")]
    Configuration(String),

    /// The exchange itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A failed response assertion.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// Unexpected status code.
    #[error("Expected the response status is {expected}, but actually is {actual}")]
    Status {
        /// Expected status.
        expected: u16,
        /// Received status.
        actual: u16,
    },

    /// Content-Type does not contain the expected media type.
    #[error("Expected the content type of the body is: {expected}, but actually is: {actual}")]
    ContentType {
        /// Expected media type.
        expected: String,
        /// Received header value.
        actual: String,
    },

    /// Header value differs (strict comparison).
    #[error("Expected the header: {key}, value: {expected}, but actually value is {actual}")]
    HeaderValue {
        /// Header name.
        key: String,
        /// Expected value.
        expected: String,
        /// Received value.
        actual: String,
    },

    /// Header value does not contain the expected text.
    #[error("For header {key}, expected {expected} in {actual}, but actually not")]
    HeaderContains {
        /// Header name.
        key: String,
        /// Expected substring.
        expected: String,
        /// Received value.
        actual: String,
    },

    /// Header absent from the response.
    #[error("Header {0} is not present in the response")]
    HeaderMissing(String),

    /// Expected substring not found in the body.
    #[error("Failed to find the expected string: \"{expected}\" in the response body >>>\n {body}")]
    BodyMissing {
        /// Substring that should be present.
        expected: String,
        /// Response text.
        body: String,
    },

    /// Substring found in the body although it should be absent.
    #[error("Checking the expected string: \"{unexpected}\" not in the response body, but it is existed. body >>>\n {body}")]
    BodyPresent {
        /// Substring that should be absent.
        unexpected: String,
        /// Response text.
        body: String,
    },

    /// Response body could not be parsed for a JSON comparison.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Structural mismatches between the JSON body and the expected document.
    #[error(transparent)]
    Body(#[from] ComparisonError),

    /// The assertion itself is ill-formed.
    #[error("invalid assertion: {0}")]
    Configuration(String),

    /// The requested kind of body comparison does not exist yet.
    #[error("{0} validation is not implemented")]
    NotImplemented(&'static str),
}

/// Errors returned by the poll-until-ready loop.
#[derive(Debug, Error)]
pub enum PollError {
    /// Building or sending an attempt failed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The body of an attempt is not JSON.
    #[error("poll response body is not JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// The body of an attempt has no `code` field.
    #[error("poll response body has no `code` field: {0}")]
    MissingCode(String),

    /// The attempt budget ran out while the resource was still not ready.
    #[error("resource still not ready after {attempts} attempts")]
    Exhausted {
        /// Number of requests sent.
        attempts: u32,
    },
}
