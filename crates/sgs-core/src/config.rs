use crate::analyzer::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output ceilings above this are accepted but almost certainly a typo.
const MAX_TOKENS_SOFT_LIMIT: u32 = 64_000;

// ---------------------------------------------------------------------------
// SettingsWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AuditSettings
// ---------------------------------------------------------------------------

/// Project-level defaults read from `.sgs/audit.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_output() -> PathBuf {
    PathBuf::from(paths::DEFAULT_REPORT_FILE)
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            output: default_output(),
        }
    }
}

impl AuditSettings {
    /// Load settings for `root`. A missing or blank file yields defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::settings_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn validate(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        if self.model.trim().is_empty() {
            warnings.push(SettingsWarning {
                level: WarnLevel::Error,
                message: "model must not be empty".to_string(),
            });
        }

        if self.max_tokens == 0 {
            warnings.push(SettingsWarning {
                level: WarnLevel::Error,
                message: "max_tokens must be greater than zero".to_string(),
            });
        } else if self.max_tokens > MAX_TOKENS_SOFT_LIMIT {
            warnings.push(SettingsWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "max_tokens = {} is unusually high (limit hint: {MAX_TOKENS_SOFT_LIMIT})",
                    self.max_tokens
                ),
            });
        }

        if self.output.as_os_str().is_empty() {
            warnings.push(SettingsWarning {
                level: WarnLevel::Error,
                message: "output must not be empty".to_string(),
            });
        }

        warnings
    }
}
