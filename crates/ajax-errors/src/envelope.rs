//! Failed-request envelopes and their text rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::is_falsy;
use crate::normalize::ErrorNormalizer;

/// Shown when the server rejected the request outright.
pub const GLOBAL_ERROR_MESSAGE: &str = "An error occurred. Please try again later.";

/// Shown for `413 Payload Too Large`.
pub const FILE_TOO_LARGE_MESSAGE: &str = "The uploaded file is too large!";

/// Status returned when an upload exceeds the server's body limit.
const PAYLOAD_TOO_LARGE: u16 = 413;

/// First status for which the body is not shown to the user.
const HIDDEN_BODY_STATUS: u16 = 401;

/// A failed request as seen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorEnvelope {
    pub error: String,
    pub status: u16,
    pub status_text: String,
    /// Parsed response body, if any.
    pub response: Value,
}

impl ErrorEnvelope {
    pub fn new(status: u16, status_text: impl Into<String>, response: Value) -> Self {
        let status_text = status_text.into();
        Self {
            error: status_text.clone(),
            status,
            status_text,
            response,
        }
    }
}

/// Pick the payload to show for a failed request.
///
/// `413` maps to [`FILE_TOO_LARGE_MESSAGE`]; any other status of `401` or
/// above, or an empty body, maps to [`GLOBAL_ERROR_MESSAGE`]. Otherwise the
/// body itself is returned for normalization.
pub fn try_get_response_error(envelope: &ErrorEnvelope) -> Value {
    if envelope.status == PAYLOAD_TOO_LARGE {
        return Value::from(FILE_TOO_LARGE_MESSAGE);
    }

    if envelope.status >= HIDDEN_BODY_STATUS || is_falsy(&envelope.response) {
        return Value::from(GLOBAL_ERROR_MESSAGE);
    }

    envelope.response.clone()
}

/// Result of rendering an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedError<'a> {
    /// Normalized lines joined by newlines.
    Text(String),
    /// Nothing could be extracted; the envelope is handed back unchanged.
    Raw(&'a ErrorEnvelope),
}

impl FormattedError<'_> {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Raw(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Raw(_) => None,
        }
    }
}

/// Render a failed request as newline-separated text.
pub fn format_server_error_as_text(envelope: &ErrorEnvelope) -> FormattedError<'_> {
    render(&ErrorNormalizer::new(), envelope)
}

/// Like [`format_server_error_as_text`], with a custom field-name translator.
pub fn format_server_error_as_text_with<T>(envelope: &ErrorEnvelope, translate: T) -> FormattedError<'_>
where
    T: Fn(&str) -> String,
{
    render(&ErrorNormalizer::with_translator(translate), envelope)
}

fn render<'a, T>(normalizer: &ErrorNormalizer<T>, envelope: &'a ErrorEnvelope) -> FormattedError<'a>
where
    T: Fn(&str) -> String,
{
    let lines = normalizer.normalize(&try_get_response_error(envelope));

    if lines.is_empty() {
        FormattedError::Raw(envelope)
    } else {
        FormattedError::Text(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(status: u16, response: Value) -> ErrorEnvelope {
        ErrorEnvelope::new(status, "Status", response)
    }

    // === Payload selection ===

    #[test]
    fn test_payload_too_large() {
        assert_eq!(try_get_response_error(&envelope(413, json!({"a": "b"}))), json!(FILE_TOO_LARGE_MESSAGE));
    }

    #[test]
    fn test_hidden_statuses() {
        for status in [401, 403, 404, 500, 503] {
            assert_eq!(try_get_response_error(&envelope(status, json!({"a": "b"}))), json!(GLOBAL_ERROR_MESSAGE));
        }
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(try_get_response_error(&envelope(400, Value::Null)), json!(GLOBAL_ERROR_MESSAGE));
        assert_eq!(try_get_response_error(&envelope(400, json!(""))), json!(GLOBAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_body_passes_through_below_401() {
        let body = json!({"name": ["taken"]});
        assert_eq!(try_get_response_error(&envelope(400, body.clone())), body);
        assert_eq!(try_get_response_error(&envelope(0, body.clone())), body);
    }

    // === Rendering ===

    #[test]
    fn test_format_validation_errors() {
        let env = envelope(400, json!({"name": ["taken"], "age": ["too young", "must be adult"]}));
        assert_eq!(
            format_server_error_as_text(&env).into_text().as_deref(),
            Some("Field Name: taken\nField Age: \n too young\n must be adult")
        );
    }

    #[test]
    fn test_format_payload_too_large_without_body() {
        let env = ErrorEnvelope::new(413, "Payload Too Large", Value::Null);
        assert_eq!(format_server_error_as_text(&env).text(), Some(FILE_TOO_LARGE_MESSAGE));
    }

    #[test]
    fn test_format_server_failure() {
        let env = envelope(500, json!("stack trace"));
        assert_eq!(format_server_error_as_text(&env).text(), Some(GLOBAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_format_unrecognized_body_returns_envelope() {
        let env = envelope(400, json!({"errors": []}));
        assert_eq!(format_server_error_as_text(&env), FormattedError::Raw(&env));
    }

    #[test]
    fn test_format_with_translator() {
        let env = envelope(400, json!({"first_name": "required"}));
        let formatted = format_server_error_as_text_with(&env, |key: &str| key.replace('_', "-"));
        assert_eq!(formatted.text(), Some("Field first-name - required"));
    }

    #[test]
    fn test_envelope_deserializes_camel_case() {
        let env: ErrorEnvelope =
            serde_json::from_value(json!({"status": 400, "statusText": "Bad Request", "response": {"error": "x"}}))
                .unwrap();
        assert_eq!(env.status_text, "Bad Request");
        assert_eq!(env.error, "");
        assert_eq!(format_server_error_as_text(&env).text(), Some("x"));
    }
}
