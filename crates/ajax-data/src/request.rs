//! Request configuration and preparation.

use std::time::Duration;

use ajax_core::{Endpoint, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CONTENT_TYPE: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// How a successful response body is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleAs {
    /// Parse as JSON, falling back to the raw text.
    #[default]
    Json,
    /// Keep the raw text.
    Text,
}

impl HandleAs {
    pub fn read(self, body: String) -> Value {
        match self {
            Self::Json => prepare_response(body),
            Self::Text => Value::String(body),
        }
    }
}

/// Parse `body` as JSON, or keep it as a string when it is not valid JSON.
pub fn prepare_response(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

/// A request as described by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestConfig {
    pub method: Method,
    pub endpoint: Endpoint,
    /// Query parameters, appended in order.
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub handle_as: HandleAs,
    /// Network timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// A `GET` request for `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_handle_as(mut self, handle_as: HandleAs) -> Self {
        self.handle_as = handle_as;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve the final URL and headers.
    pub fn prepare(&self) -> PreparedRequest {
        let mut headers = self.headers.clone();
        let has_content_type = headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(CONTENT_TYPE));
        if self.body.is_some() && !has_content_type {
            headers.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        PreparedRequest {
            method: self.method,
            url: request_url(&self.endpoint.url, &self.params),
            headers,
            body: self.body.clone(),
            handle_as: self.handle_as,
            timeout: self.timeout.filter(|timeout| !timeout.is_zero()),
        }
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub handle_as: HandleAs,
    pub timeout: Option<Duration>,
}

/// Append `params` to `url` as a query string.
///
/// Values are appended as given, without percent-encoding.
pub fn request_url(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{url}{separator}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    // === Query strings ===

    #[test]
    fn test_url_without_params() {
        assert_eq!(request_url("/api/items", &[]), "/api/items");
    }

    #[test]
    fn test_url_gets_question_mark() {
        assert_eq!(request_url("/api/items", &params(&[("page", "2"), ("size", "10")])), "/api/items?page=2&size=10");
    }

    #[test]
    fn test_url_with_existing_query_gets_ampersand() {
        assert_eq!(request_url("/api/items?sort=asc", &params(&[("page", "2")])), "/api/items?sort=asc&page=2");
    }

    // === Preparation ===

    #[test]
    fn test_prepare_defaults() {
        let prepared = RequestConfig::new(Endpoint::new("/api/items")).prepare();
        assert_eq!(prepared.method, Method::Get);
        assert_eq!(prepared.url, "/api/items");
        assert_eq!(prepared.handle_as, HandleAs::Json);
        assert!(prepared.headers.is_empty());
        assert_eq!(prepared.timeout, None);
    }

    #[test]
    fn test_prepare_json_body_sets_content_type() {
        let prepared = RequestConfig::new(Endpoint::new("/api/items"))
            .with_method(Method::Post)
            .with_body(json!({"name": "x"}))
            .prepare();
        assert_eq!(prepared.headers, params(&[("content-type", "application/json")]));
    }

    #[test]
    fn test_prepare_keeps_caller_content_type() {
        let prepared = RequestConfig::new(Endpoint::new("/api/items"))
            .with_header("Content-Type", "text/plain")
            .with_body(json!("x"))
            .prepare();
        assert_eq!(prepared.headers, params(&[("Content-Type", "text/plain")]));
    }

    #[test]
    fn test_prepare_zero_timeout_means_none() {
        let prepared = RequestConfig::new(Endpoint::new("/a")).with_timeout(Duration::ZERO).prepare();
        assert_eq!(prepared.timeout, None);
    }

    #[test]
    fn test_prepare_with_params() {
        let prepared = RequestConfig::new(Endpoint::new("/a")).with_param("id", 7).prepare();
        assert_eq!(prepared.url, "/a?id=7");
    }

    // === Responses ===

    #[test]
    fn test_prepare_response_parses_json() {
        assert_eq!(prepare_response(r#"{"a": 1}"#.to_string()), json!({"a": 1}));
    }

    #[test]
    fn test_prepare_response_falls_back_to_text() {
        assert_eq!(prepare_response("<html>".to_string()), json!("<html>"));
    }

    #[test]
    fn test_handle_as_text_keeps_raw_body() {
        assert_eq!(HandleAs::Text.read("[1]".to_string()), json!("[1]"));
        assert_eq!(HandleAs::Json.read("[1]".to_string()), json!([1]));
    }
}
