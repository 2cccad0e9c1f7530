use crate::value::ConfigMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ToolConfig
// ---------------------------------------------------------------------------

/// One tool's configuration section, as found in one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolConfig {
    pub tool_name: String,
    pub config_file: PathBuf,
    /// Dotted path within the file (`tool.ruff`), or `root` for single-tool files.
    pub config_section: String,
    pub config_data: ConfigMap,
}

impl ToolConfig {
    pub fn new(
        tool_name: impl Into<String>,
        config_file: impl Into<PathBuf>,
        config_section: impl Into<String>,
        config_data: ConfigMap,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            config_file: config_file.into(),
            config_section: config_section.into(),
            config_data,
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

pub const SEVERITY_HIGH: &str = "HIGH";
pub const SEVERITY_MEDIUM: &str = "MEDIUM";
pub const SEVERITY_LOW: &str = "LOW";

/// Sort rank for a severity label. Matching is exact; anything other than
/// the three uppercase labels sorts after LOW.
pub fn severity_rank(severity: &str) -> u8 {
    match severity {
        SEVERITY_HIGH => 0,
        SEVERITY_MEDIUM => 1,
        SEVERITY_LOW => 2,
        _ => 3,
    }
}

// ---------------------------------------------------------------------------
// ConflictReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    pub severity: String,
    pub tools: Vec<String>,
    pub description: String,
    pub explanation: String,
    pub suggestion: String,
    pub affected_configs: Vec<ToolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

/// Configs whose `tool_name` exactly matches one of `tools`, in discovery order.
pub fn match_affected(tools: &[String], configs: &[ToolConfig]) -> Vec<ToolConfig> {
    configs
        .iter()
        .filter(|c| tools.iter().any(|t| *t == c.tool_name))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// AuditResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub other: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditResult {
    pub discovered_configs: Vec<ToolConfig>,
    pub conflicts: Vec<ConflictReport>,
    /// Reserved for per-tool rule bypasses; never populated yet.
    pub bypass_rules: BTreeMap<String, Vec<String>>,
    pub token_usage: TokenUsage,
    pub model_used: String,
    /// Non-fatal problems met while interpreting the analysis response.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AuditResult {
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for c in &self.conflicts {
            match severity_rank(&c.severity) {
                0 => counts.high += 1,
                1 => counts.medium += 1,
                2 => counts.low += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }
}
