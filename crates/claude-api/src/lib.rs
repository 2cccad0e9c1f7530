//! Minimal blocking client for the Anthropic Messages API.
//!
//! ```rust,ignore
//! use claude_api::{Client, MessagesRequest};
//!
//! let client = Client::new(&api_key)?;
//! let resp = client.create_message(&MessagesRequest::user("claude-sonnet-4-5", 1024, "hi"))?;
//! println!("{}", resp.first_text().unwrap_or(""));
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{Client, API_VERSION, DEFAULT_BASE_URL};
pub use error::ClaudeApiError;
pub use types::{ContentBlock, MessagesRequest, MessagesResponse, RequestMessage, Role, Usage};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeApiError>;
