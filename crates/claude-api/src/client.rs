use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::error::ClaudeApiError;
use crate::types::{MessagesRequest, MessagesResponse};
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

/// Upper bound on a single completion round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Blocking Messages API client. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    base_url: String,
}

impl Client {
    pub fn new(api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key.trim())
            .map_err(|_| ClaudeApiError::InvalidApiKey("contains non-visible characters".into()))?;
        headers.insert("x-api-key", key);
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API host (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /v1/messages` and decode the response body.
    pub fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.base_url);
        tracing::debug!(model = %request.model, max_tokens = request.max_tokens, "sending messages request");

        let resp = self.http.post(&url).json(request).send()?;
        let status = resp.status();
        let body = resp.text()?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "messages request failed");
            return Err(ClaudeApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ClaudeApiError::Decode { body, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentBlock;
    use mockito::Matcher;

    const OK_BODY: &str = r#"{
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-5",
        "content": [{"type": "text", "text": "{\"conflicts\": []}"}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 100, "output_tokens": 20}
    }"#;

    #[test]
    fn sends_auth_headers_and_decodes_response() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-test")
            .match_header("anthropic-version", API_VERSION)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "claude-sonnet-4-5",
                "max_tokens": 256
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(OK_BODY)
            .create();

        let client = Client::new("sk-test").unwrap().with_base_url(server.url());
        let req = MessagesRequest::user("claude-sonnet-4-5", 256, "audit this");
        let resp = client.create_message(&req).unwrap();

        mock.assert();
        assert!(matches!(resp.content[0], ContentBlock::Text { .. }));
        assert_eq!(resp.usage.output_tokens, 20);
    }

    #[test]
    fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error"}}"#)
            .create();

        let client = Client::new("sk-test").unwrap().with_base_url(server.url());
        let err = client
            .create_message(&MessagesRequest::user("m", 10, "x"))
            .unwrap_err();
        match err {
            ClaudeApiError::Status { status, body } => {
                assert_eq!(status, 529);
                assert!(body.contains("overloaded_error"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body("not json")
            .create();

        let client = Client::new("sk-test").unwrap().with_base_url(server.url());
        let err = client
            .create_message(&MessagesRequest::user("m", 10, "x"))
            .unwrap_err();
        assert!(matches!(err, ClaudeApiError::Decode { .. }));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = Client::new("k")
            .unwrap()
            .with_base_url("http://localhost:1234/");
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[test]
    fn control_characters_in_key_are_rejected() {
        let err = Client::new("bad\nkey").unwrap_err();
        assert!(matches!(err, ClaudeApiError::InvalidApiKey(_)));
    }
}
