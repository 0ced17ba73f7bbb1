//! Device API errors.

use assay_http::{PollError, RequestError};
use thiserror::Error;

/// Errors returned by [`DeviceApi`](crate::DeviceApi).
#[derive(Debug, Error)]
pub enum DeviceError {
    /// A single request failed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Polling failed.
    #[error(transparent)]
    Poll(#[from] PollError),

    /// The token endpoint answered without `result.idToken`.
    #[error("token response has no result.idToken: {body}")]
    MissingToken {
        /// Response text.
        body: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_message() {
        let err = DeviceError::MissingToken {
            body: r#"{"code":401}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"token response has no result.idToken: {"code":401}"#
        );
    }
}
