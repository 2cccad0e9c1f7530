use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("{0} environment variable is not set; export it or pass --dry-run to skip analysis")]
    MissingApiKey(&'static str),

    #[error("API key must not be empty")]
    EmptyApiKey,

    #[error("analysis failed: {message}")]
    Analysis {
        message: String,
        #[source]
        source: Option<claude_api::ClaudeApiError>,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl AuditError {
    pub(crate) fn analysis(message: impl Into<String>) -> Self {
        AuditError::Analysis {
            message: message.into(),
            source: None,
        }
    }
}

impl From<claude_api::ClaudeApiError> for AuditError {
    fn from(err: claude_api::ClaudeApiError) -> Self {
        AuditError::Analysis {
            message: "completion request failed".to_string(),
            source: Some(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
