//! Repeating a request until the backend reports the resource is ready.
//!
//! The backends answer with a JSON envelope whose `code` field is `304`
//! while data is still being prepared. Any other code ends the loop, as
//! does a body containing the `999999` sentinel some endpoints return for
//! malformed requests.

use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::error::PollError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::transport::Transport;

/// Envelope code meaning "not ready yet".
pub const NOT_READY_CODE: i64 = 304;

/// Body marker that ends polling without inspecting the envelope.
pub const MALFORMED_SENTINEL: &str = "999999";

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between a not-ready response and the next attempt.
    pub interval: Duration,
    /// Attempt budget, `None` for unbounded.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    /// Unbounded polling every `interval`.
    pub const fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Caps the number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

/// Classification of one poll response.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadyState {
    /// `code` is 304: try again.
    NotReady,
    /// Any other `code`.
    Ready(Value),
    /// The body carries the malformed-request sentinel.
    Malformed,
}

impl ReadyState {
    /// Classifies a response body.
    pub fn from_body(body: &str) -> Result<Self, PollError> {
        if body.contains(MALFORMED_SENTINEL) {
            return Ok(Self::Malformed);
        }

        let envelope: Value = serde_json::from_str(body).map_err(PollError::InvalidBody)?;
        let code = envelope
            .get("code")
            .ok_or_else(|| PollError::MissingCode(body.to_string()))?;

        if code.as_i64() == Some(NOT_READY_CODE) {
            Ok(Self::NotReady)
        } else {
            Ok(Self::Ready(code.clone()))
        }
    }

    /// Whether polling stops on this state.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::NotReady)
    }
}

/// Sends `build()` until the response is not a 304 envelope.
///
/// The request is rebuilt for every attempt, so file attachments are
/// reopened each time. Returns the first response that ends polling.
///
/// # Errors
///
/// - [`PollError::Request`] when an attempt cannot be built or sent
/// - [`PollError::InvalidBody`] / [`PollError::MissingCode`] when a body
///   cannot be classified
/// - [`PollError::Exhausted`] when `policy.max_attempts` runs out
pub fn poll_until_ready<T, F>(
    transport: &T,
    policy: &PollPolicy,
    mut build: F,
) -> Result<ApiResponse, PollError>
where
    T: Transport + ?Sized,
    F: FnMut() -> ApiRequest,
{
    let mut attempts: u32 = 0;
    loop {
        let response = build().send(transport)?;
        attempts = next_attempt(attempts);

        let state = ReadyState::from_body(response.text())?;
        if state.is_done() {
            tracing::debug!(attempts, state = ?state, "poll finished");
            return Ok(response);
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(PollError::Exhausted { attempts });
        }

        tracing::info!(
            attempts,
            interval = ?policy.interval,
            code = NOT_READY_CODE,
            "resource not ready, retrying"
        );
        thread::sleep(policy.interval);
    }
}

// The default policy never gives up, so the counter must not overflow.
const fn next_attempt(attempts: u32) -> u32 {
    attempts.saturating_add(1)
}
