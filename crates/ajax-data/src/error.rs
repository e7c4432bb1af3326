//! Request failures.

use std::time::Duration;

use ajax_errors::ErrorEnvelope;
use serde_json::Value;

/// Status text reported for aborted requests.
pub const ABORTED_STATUS_TEXT: &str = "Request aborted";

/// Status text reported for timed out requests.
pub const TIMEOUT_STATUS_TEXT: &str = "Request timed out";

/// Error type for network requests.
///
/// Transport failures are reported as [`RequestError::Network`] with a
/// status of `0`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("Network error: {status} {status_text}")]
    Network {
        error: String,
        status: u16,
        status_text: String,
        /// Response body, parsed as JSON when possible.
        response: Value,
    },

    #[error("Request aborted")]
    Aborted,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl RequestError {
    /// A failure before any response was received.
    pub fn transport(error: impl Into<String>) -> Self {
        let error = error.into();
        Self::Network {
            status_text: error.clone(),
            error,
            status: 0,
            response: Value::Null,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Network { status, .. } => *status,
            Self::Aborted | Self::Timeout(_) => 0,
        }
    }

    pub fn status_text(&self) -> &str {
        match self {
            Self::Network { status_text, .. } => status_text,
            Self::Aborted => ABORTED_STATUS_TEXT,
            Self::Timeout(_) => TIMEOUT_STATUS_TEXT,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Convert into the envelope shape consumed by the error formatter.
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Network {
                error,
                status,
                status_text,
                response,
            } => ErrorEnvelope {
                error: error.clone(),
                status: *status,
                status_text: status_text.clone(),
                response: response.clone(),
            },
            other => ErrorEnvelope::new(other.status(), other.status_text(), Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ajax_errors::{format_server_error_as_text, GLOBAL_ERROR_MESSAGE};
    use serde_json::json;

    #[test]
    fn test_transport_error_has_status_zero() {
        let err = RequestError::transport("connection refused");
        assert_eq!(err.status(), 0);
        assert_eq!(err.status_text(), "connection refused");
    }

    #[test]
    fn test_aborted_is_distinct() {
        let err = RequestError::Aborted;
        assert!(err.is_aborted());
        assert_eq!(err.status(), 0);
        assert_eq!(err.status_text(), ABORTED_STATUS_TEXT);
        assert!(!RequestError::transport("x").is_aborted());
    }

    #[test]
    fn test_envelope_keeps_response_body() {
        let err = RequestError::Network {
            error: "Bad Request".into(),
            status: 400,
            status_text: "Bad Request".into(),
            response: json!({"name": ["taken"]}),
        };
        let envelope = err.envelope();
        assert_eq!(envelope.status, 400);
        assert_eq!(format_server_error_as_text(&envelope).text(), Some("Field Name: taken"));
    }

    #[test]
    fn test_aborted_envelope_formats_generic_message() {
        let envelope = RequestError::Aborted.envelope();
        assert_eq!(envelope.status_text, ABORTED_STATUS_TEXT);
        assert_eq!(format_server_error_as_text(&envelope).text(), Some(GLOBAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_timeout_display() {
        let err = RequestError::Timeout(Duration::from_secs(2));
        assert_eq!(err.to_string(), "Request timed out after 2s");
    }
}
