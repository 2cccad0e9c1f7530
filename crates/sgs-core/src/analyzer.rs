//! Conflict analysis over discovered tool configurations.
//!
//! Live mode renders every [`ToolConfig`] into a prompt, asks the Messages
//! API for a JSON conflict list and parses it back. Dry-run mode skips the
//! network entirely and returns a fixed mock result.
//!
//! Failure semantics differ by stage: a failed request or a response whose
//! first block is not text is an [`AuditError::Analysis`], while an
//! unparseable JSON payload only yields zero conflicts plus a warning.

use crate::error::{AuditError, Result};
use crate::types::{match_affected, AuditResult, ConflictReport, TokenUsage, ToolConfig};
use crate::value::{ConfigMap, ConfigValue};
use claude_api::{Client, ContentBlock, MessagesRequest};
use serde::Deserialize;
use std::fmt::Write as _;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Model name reported for mocked results.
pub const DRY_RUN_MODEL: &str = "dry-run-mock";

const SYSTEM_PROMPT: &str = "You are a meticulous build and quality-tooling engineer. \
You review developer tool configurations and report only real, actionable conflicts. \
You always answer with a single JSON object and nothing else.";

/// Conflict categories the model is asked to look for.
const CONFLICT_TAXONOMY: &[(&str, &str)] = &[
    (
        "Line length",
        "formatters and linters enforcing different maximum line lengths",
    ),
    (
        "Import sorting",
        "isort, ruff (I rules) and other import sorters disagreeing on profile or sections",
    ),
    (
        "Quote and string style",
        "formatter quote style contradicting linter quote rules",
    ),
    (
        "Target Python version",
        "target-version / python_version mismatches between tools",
    ),
    (
        "Rule selection overlap",
        "the same check enabled in one tool and explicitly ignored in another",
    ),
    (
        "Exclude and include paths",
        "tools scanning different file sets, leaving code unchecked or double-checked",
    ),
    (
        "Formatter vs linter",
        "lint rules that fight auto-formatter output (e.g. E203, W503 with black)",
    ),
    (
        "Type-checking strictness",
        "strict settings in one checker undermined by permissive settings elsewhere",
    ),
    (
        "Hook vs config drift",
        "pre-commit hooks passing arguments that override or contradict the tool's own config",
    ),
];

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub struct ClaudeAnalyzer {
    /// `None` in dry-run mode.
    client: Option<Client>,
    model: String,
    max_tokens: u32,
}

impl ClaudeAnalyzer {
    /// Build an analyzer. The key is required even for dry runs but no HTTP
    /// client is created when `dry_run` is set.
    pub fn new(api_key: &str, dry_run: bool) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AuditError::EmptyApiKey);
        }
        let client = if dry_run {
            None
        } else {
            Some(Client::new(api_key)?)
        };
        Ok(Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Live analyzer over an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.client.is_none()
    }

    pub fn analyze_conflicts(&self, configs: &[ToolConfig]) -> Result<AuditResult> {
        let Some(client) = &self.client else {
            tracing::info!("dry run: returning mocked analysis");
            return Ok(mock_result(configs));
        };

        let prompt = build_prompt(&format_configs(configs));
        let request =
            MessagesRequest::user(&self.model, self.max_tokens, prompt).with_system(SYSTEM_PROMPT);

        tracing::info!(model = %self.model, configs = configs.len(), "requesting conflict analysis");
        let response = client.create_message(&request)?;

        let text = match response.content.first() {
            Some(ContentBlock::Text { text }) => text,
            Some(other) => {
                return Err(AuditError::analysis(format!(
                    "unexpected response block: expected text, got {}",
                    other.kind()
                )))
            }
            None => return Err(AuditError::analysis("unexpected response block: empty content")),
        };

        let parsed = parse_conflicts(text, configs);
        let model_used = if response.model.is_empty() {
            self.model.clone()
        } else {
            response.model.clone()
        };

        Ok(AuditResult {
            discovered_configs: configs.to_vec(),
            conflicts: parsed.conflicts,
            bypass_rules: Default::default(),
            token_usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
            model_used,
            warnings: parsed.warnings,
        })
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Render one config as a fenced block with an indented key listing.
pub fn format_config(config: &ToolConfig) -> String {
    let mut out = String::from("```\n");
    let _ = writeln!(out, "Tool: {}", config.tool_name);
    let _ = writeln!(out, "File: {}", config.config_file.display());
    let _ = writeln!(out, "Section: {}", config.config_section);
    out.push_str("Configuration:\n");
    write_map(&mut out, &config.config_data, 1);
    out.push_str("```\n");
    out
}

fn write_map(out: &mut String, map: &ConfigMap, depth: usize) {
    let indent = "  ".repeat(depth);
    for (key, value) in map {
        match value {
            ConfigValue::Map(inner) => {
                let _ = writeln!(out, "{indent}{key}:");
                write_map(out, inner, depth + 1);
            }
            other => {
                let _ = writeln!(out, "{indent}{key} = {other}");
            }
        }
    }
}

pub fn format_configs(configs: &[ToolConfig]) -> String {
    configs
        .iter()
        .map(format_config)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(summary: &str) -> String {
    let mut taxonomy = String::new();
    for (i, (name, detail)) in CONFLICT_TAXONOMY.iter().enumerate() {
        let _ = writeln!(taxonomy, "{}. **{name}**: {detail}", i + 1);
    }

    format!(
        r#"Analyze the following development tool configurations for conflicts.

A conflict is a setting in one tool that contradicts a setting in another,
so that running both tools produces inconsistent or contradictory results.

## Discovered configurations

{summary}
## Known conflict categories

{taxonomy}
Report only conflicts supported by the configurations above. If there are
none, return an empty list.

## Response format

Respond with a single JSON object:

{{
  "conflicts": [
    {{
      "severity": "HIGH" | "MEDIUM" | "LOW",
      "tools": ["tool_name", "other_tool_name"],
      "description": "One-line summary",
      "explanation": "Why these settings conflict and what breaks",
      "suggestion": "How to resolve it",
      "code_example": "Optional corrected configuration snippet"
    }}
  ]
}}

Use the exact tool names shown after "Tool:" above."#
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ParsedConflicts {
    pub conflicts: Vec<ConflictReport>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    conflicts: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawConflict {
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default)]
    tools: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    suggestion: String,
    #[serde(default)]
    code_example: Option<String>,
}

fn default_severity() -> String {
    "MEDIUM".to_string()
}

/// Extract the JSON object between the first `{` and the last `}` of `text`
/// and turn its `conflicts` entries into reports. Never fails.
pub fn parse_conflicts(text: &str, configs: &[ToolConfig]) -> ParsedConflicts {
    let mut out = ParsedConflicts::default();

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        tracing::debug!("no JSON object in analysis response");
        out.warnings
            .push("analysis response contained no JSON object; assuming no conflicts".into());
        return out;
    };
    if end < start {
        out.warnings
            .push("analysis response contained no JSON object; assuming no conflicts".into());
        return out;
    }

    let raw: RawAnalysis = match serde_json::from_str(&text[start..=end]) {
        Ok(raw) => raw,
        Err(e) => {
            out.warnings.push(format!(
                "failed to parse analysis response as JSON ({e}); assuming no conflicts"
            ));
            return out;
        }
    };

    for (i, entry) in raw.conflicts.into_iter().enumerate() {
        match serde_json::from_value::<RawConflict>(entry) {
            Ok(c) => {
                let affected_configs = match_affected(&c.tools, configs);
                out.conflicts.push(ConflictReport {
                    severity: c.severity,
                    tools: c.tools,
                    description: c.description,
                    explanation: c.explanation,
                    suggestion: c.suggestion,
                    affected_configs,
                    code_example: c.code_example.filter(|s| !s.trim().is_empty()),
                });
            }
            Err(e) => out
                .warnings
                .push(format!("skipped malformed conflict entry #{}: {e}", i + 1)),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Dry run
// ---------------------------------------------------------------------------

/// Fixed, input-independent analysis used when no network access is wanted.
/// Only `discovered_configs` and `affected_configs` reflect the input.
pub fn mock_result(configs: &[ToolConfig]) -> AuditResult {
    let tools = vec!["ruff".to_string(), "black".to_string()];
    let conflict = ConflictReport {
        severity: "MEDIUM".to_string(),
        affected_configs: match_affected(&tools, configs),
        tools,
        description: "Line length mismatch between ruff and black".to_string(),
        explanation: "ruff is configured with line-length = 100 while black uses \
line-length = 88. black reformats lines to 88 characters, but ruff accepts and may \
produce lines up to 100, so the two tools disagree on what a correctly formatted \
line looks like."
            .to_string(),
        suggestion: "Use the same line length for both tools, ideally set once in \
pyproject.toml and referenced by every formatter and linter."
            .to_string(),
        code_example: Some(
            "[tool.ruff]\nline-length = 88\n\n[tool.black]\nline-length = 88\n".to_string(),
        ),
    };

    AuditResult {
        discovered_configs: configs.to_vec(),
        conflicts: vec![conflict],
        bypass_rules: Default::default(),
        token_usage: TokenUsage::default(),
        model_used: DRY_RUN_MODEL.to_string(),
        warnings: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
