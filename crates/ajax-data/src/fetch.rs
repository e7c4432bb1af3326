//! Network fetch capability and its HTTP implementation.

use ajax_core::Method;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::RequestError;
use crate::request::{prepare_response, PreparedRequest};

/// Performs a prepared request and yields the response payload.
#[async_trait]
pub trait NetworkFetch: Send + Sync {
    async fn fetch(&self, request: &PreparedRequest) -> Result<Value, RequestError>;
}

/// [`NetworkFetch`] backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client, sharing its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkFetch for HttpFetcher {
    async fn fetch(&self, request: &PreparedRequest) -> Result<Value, RequestError> {
        let mut builder = self.client.request(http_method(request.method), &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|err| transport_error(err, request))?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await.map_err(|err| transport_error(err, request))?;

        if status.is_success() {
            return Ok(request.handle_as.read(body));
        }

        Err(into_network_error(status.as_u16(), status_text, body))
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

fn transport_error(err: reqwest::Error, request: &PreparedRequest) -> RequestError {
    match request.timeout {
        Some(timeout) if err.is_timeout() => RequestError::Timeout(timeout),
        _ => RequestError::transport(err.to_string()),
    }
}

/// Build the error for a non-success response.
pub fn into_network_error(status: u16, status_text: String, body: String) -> RequestError {
    RequestError::Network {
        error: status_text.clone(),
        status,
        status_text,
        response: prepare_response(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_error_parses_json_body() {
        let err = into_network_error(400, "Bad Request".into(), r#"{"error": "bad"}"#.into());
        assert_eq!(
            err,
            RequestError::Network {
                error: "Bad Request".into(),
                status: 400,
                status_text: "Bad Request".into(),
                response: json!({"error": "bad"}),
            }
        );
    }

    #[test]
    fn test_network_error_keeps_text_body() {
        let err = into_network_error(502, "Bad Gateway".into(), "upstream down".into());
        assert_eq!(err.envelope().response, json!("upstream down"));
        assert_eq!(err.status(), 502);
    }

    #[test]
    fn test_http_method_mapping() {
        assert_eq!(http_method(Method::Get), reqwest::Method::GET);
        assert_eq!(http_method(Method::Delete), reqwest::Method::DELETE);
        assert_eq!(http_method(Method::Options), reqwest::Method::OPTIONS);
    }
}
