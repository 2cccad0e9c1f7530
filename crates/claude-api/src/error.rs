use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode Messages API response: {source}\n  body: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}
