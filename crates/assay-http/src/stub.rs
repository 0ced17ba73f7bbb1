//! A scripted in-memory [`Transport`].

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::request::{Body, Method, PreparedRequest, TlsVerify};
use crate::transport::{RawResponse, Transport};

/// What a [`StubTransport`] saw of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Final URL without the query string.
    pub url: String,
    /// Query parameters.
    pub params: Vec<(String, String)>,
    /// Headers.
    pub headers: Vec<(String, String)>,
    /// Payload.
    pub body: Option<Body>,
    /// `(field, file name)` of each attachment.
    pub files: Vec<(String, String)>,
    /// Certificate verification mode.
    pub verify: TlsVerify,
    /// Whether redirects would be followed.
    pub follow_redirects: bool,
    /// Exchange timeout.
    pub timeout: Duration,
}

impl RecordedRequest {
    /// Value of query parameter `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        lookup(&self.params, key)
    }

    /// Value of header `key` (exact name).
    pub fn header(&self, key: &str) -> Option<&str> {
        lookup(&self.headers, key)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

impl From<&PreparedRequest> for RecordedRequest {
    fn from(request: &PreparedRequest) -> Self {
        Self {
            method: request.method,
            url: request.url.clone(),
            params: request.params.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
            files: request
                .files
                .iter()
                .map(|a| (a.field.clone(), a.file_name()))
                .collect(),
            verify: request.verify.clone(),
            follow_redirects: request.follow_redirects,
            timeout: request.timeout,
        }
    }
}

/// Replays queued responses in order and records every request.
///
/// Once the queue is empty every call fails with [`TransportError::Other`].
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    /// Creates an empty stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stub that answers with `responses` in order.
    pub fn with_responses(responses: impl IntoIterator<Item = RawResponse>) -> Self {
        let stub = Self::new();
        for response in responses {
            stub.push(response);
        }
        stub
    }

    /// Queues a response.
    pub fn push(&self, response: RawResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses.lock().push_back(Err(message.into()));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of responses still queued.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().push(RecordedRequest::from(&request));

        match self.responses.lock().pop_front() {
            Some(Ok(response)) if response.url.is_empty() => Ok(response.with_url(request.url)),
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other(
                "no scripted response left".to_string(),
            )),
        }
    }
}
