//! Markdown rendering of an [`AuditResult`].
//!
//! Layout (fixed order): header, summary, discovered configurations grouped
//! by file, conflicts ordered by severity then description, static footer.

use crate::error::Result;
use crate::io;
use crate::types::{severity_rank, AuditResult, ConflictReport, ToolConfig};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

pub const REPORT_TITLE: &str = "Tool Configuration Audit Report";
pub const NO_CONFLICTS: &str = "No conflicts detected";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FOOTER: &str = "## Next Steps

1. Review each conflict above, starting with HIGH severity.
2. Apply the suggested changes so every tool reads the same settings.
3. Prefer a single source of truth (`pyproject.toml`) over per-tool files.
4. Re-run the audit to confirm the conflicts are resolved.
5. Commit the report alongside the configuration changes for reviewers.

---

_Generated by sgs-audit. Analysis results are advisory; verify suggestions before applying them._
";

pub struct ReportGenerator {
    output_path: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Render with the current time and write the report, replacing any
    /// existing file. The parent directory must exist.
    pub fn generate(&self, result: &AuditResult) -> Result<()> {
        let content = render(result, Utc::now());
        io::atomic_write(&self.output_path, content.as_bytes())?;
        tracing::info!(path = %self.output_path.display(), "wrote audit report");
        Ok(())
    }
}

/// Render the full report. Pure; `generated_at` is the only time input.
pub fn render(result: &AuditResult, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    render_header(&mut out, result, generated_at);
    render_summary(&mut out, result);
    render_discovered(&mut out, &result.discovered_configs);
    render_conflicts(&mut out, &result.conflicts);
    out.push_str(FOOTER);
    out
}

fn render_header(out: &mut String, result: &AuditResult, generated_at: DateTime<Utc>) {
    let model = if result.model_used.trim().is_empty() {
        "N/A"
    } else {
        result.model_used.as_str()
    };
    let _ = writeln!(out, "# {REPORT_TITLE}\n");
    let _ = writeln!(
        out,
        "**Generated:** {} UTC  ",
        generated_at.format(TIMESTAMP_FORMAT)
    );
    let _ = writeln!(out, "**Model:** {model}\n");
}

fn render_summary(out: &mut String, result: &AuditResult) {
    let counts = result.severity_counts();
    let usage = &result.token_usage;

    out.push_str("## Summary\n\n");
    let _ = writeln!(
        out,
        "- **Configurations discovered:** {}",
        result.discovered_configs.len()
    );
    let _ = writeln!(out, "- **Conflicts detected:** {}", result.conflicts.len());
    let _ = writeln!(out, "  - HIGH: {}", counts.high);
    let _ = writeln!(out, "  - MEDIUM: {}", counts.medium);
    let _ = writeln!(out, "  - LOW: {}", counts.low);
    if counts.other > 0 {
        let _ = writeln!(out, "  - Other: {}", counts.other);
    }
    let _ = writeln!(
        out,
        "- **Tokens used:** {} ({} input, {} output)\n",
        usage.total(),
        usage.input_tokens,
        usage.output_tokens
    );
}

fn render_discovered(out: &mut String, configs: &[ToolConfig]) {
    out.push_str("## Discovered Configurations\n\n");
    if configs.is_empty() {
        out.push_str("_No configurations discovered._\n\n");
        return;
    }

    let mut by_file: BTreeMap<String, Vec<&ToolConfig>> = BTreeMap::new();
    for c in configs {
        by_file
            .entry(c.config_file.display().to_string())
            .or_default()
            .push(c);
    }

    for (file, entries) in &by_file {
        let _ = writeln!(out, "### `{file}`\n");
        for c in entries {
            let _ = writeln!(out, "- {} ({})", c.tool_name, c.config_section);
        }
        out.push('\n');
    }
}

fn render_conflicts(out: &mut String, conflicts: &[ConflictReport]) {
    out.push_str("## Conflicts\n\n");
    if conflicts.is_empty() {
        let _ = writeln!(out, "{NO_CONFLICTS}\n");
        return;
    }

    let mut sorted: Vec<&ConflictReport> = conflicts.iter().collect();
    sorted.sort_by(|a, b| {
        severity_rank(&a.severity)
            .cmp(&severity_rank(&b.severity))
            .then_with(|| a.description.cmp(&b.description))
    });

    for (i, c) in sorted.iter().enumerate() {
        let _ = writeln!(out, "### {}. [{}] {}\n", i + 1, c.severity, c.description);
        let _ = writeln!(out, "**Tools:** {}\n", c.tools.join(", "));
        if !c.explanation.is_empty() {
            let _ = writeln!(out, "**Explanation:** {}\n", c.explanation);
        }
        if !c.suggestion.is_empty() {
            let _ = writeln!(out, "**Suggestion:** {}\n", c.suggestion);
        }
        if !c.affected_configs.is_empty() {
            out.push_str("**Affected configurations:**\n\n");
            for a in &c.affected_configs {
                let _ = writeln!(
                    out,
                    "- {} (`{}`: {})",
                    a.tool_name,
                    a.config_file.display(),
                    a.config_section
                );
            }
            out.push('\n');
        }
        if let Some(example) = &c.code_example {
            out.push_str("**Example:**\n\n```\n");
            out.push_str(example.trim_end());
            out.push_str("\n```\n\n");
        }
    }
}
