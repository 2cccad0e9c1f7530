use crate::output::{print_json, warn};
use anyhow::Context;
use clap::Args;
use sgs_core::config::{AuditSettings, WarnLevel};
use sgs_core::{AuditError, ClaudeAnalyzer, ConfigDiscovery, ReportGenerator, ToolConfig};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

/// Placeholder credential for dry runs without a configured key.
const DRY_RUN_KEY: &str = "dry-run";

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Project root to scan for tool configuration files
    #[arg(long, env = "SGS_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Where to write the Markdown report (default: tool-config-audit.md)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Skip API calls and use a mocked analysis
    #[arg(long)]
    pub dry_run: bool,

    /// Apply suggested fixes (not implemented yet)
    #[arg(long)]
    pub apply_fixes: bool,

    /// Print discovered configurations and debug logs
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Model used for analysis
    #[arg(long, env = "SGS_AUDIT_MODEL")]
    pub model: Option<String>,

    /// Also print the audit result as JSON on stdout
    #[arg(long, short = 'j')]
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(args: AuditArgs) -> anyhow::Result<()> {
    // Checked before any discovery work.
    let api_key = resolve_api_key(args.dry_run)?;

    let root = args.project_root.as_path();
    if !root.is_dir() {
        anyhow::bail!("project root '{}' is not a directory", root.display());
    }

    let settings = load_settings(root)?;
    let model = args.model.clone().unwrap_or_else(|| settings.model.clone());
    let output_path = args.output.clone().unwrap_or_else(|| settings.output.clone());

    let say = |msg: String| {
        if !args.json {
            println!("{msg}");
        }
    };

    say(format!("Discovering tool configurations in {}", root.display()));
    let discovery = ConfigDiscovery::new(root).discover_all();
    for w in &discovery.warnings {
        warn(w);
    }
    say(format!("Found {} tool configurations", discovery.configs.len()));
    if args.verbose && !args.json {
        print_configs(&discovery.configs);
    }

    let analyzer = build_analyzer(&api_key, args.dry_run)?
        .model(model)
        .max_tokens(settings.max_tokens);
    if analyzer.is_dry_run() {
        say("Dry run: using mocked analysis, no API calls will be made".to_string());
    } else {
        say("Analyzing configurations for conflicts...".to_string());
    }

    let result = analyzer
        .analyze_conflicts(&discovery.configs)
        .context("conflict analysis failed")?;
    for w in &result.warnings {
        warn(w);
    }

    ReportGenerator::new(&output_path)
        .generate(&result)
        .with_context(|| format!("failed to write report to {}", output_path.display()))?;

    if args.json {
        print_json(&result)?;
    } else {
        let counts = result.severity_counts();
        println!("Report written to {}", output_path.display());
        println!(
            "{} conflicts (HIGH {}, MEDIUM {}, LOW {}) across {} configurations",
            result.conflicts.len(),
            counts.high,
            counts.medium,
            counts.low,
            result.discovered_configs.len()
        );
    }

    if args.apply_fixes {
        eprintln!("Note: --apply-fixes is not implemented yet; no files were changed.");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_api_key(dry_run: bool) -> Result<String, AuditError> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ if dry_run => Ok(DRY_RUN_KEY.to_string()),
        _ => Err(AuditError::MissingApiKey(API_KEY_ENV)),
    }
}

fn load_settings(root: &Path) -> anyhow::Result<AuditSettings> {
    let settings = AuditSettings::load(root).context("failed to load .sgs/audit.yaml")?;

    let mut errors = Vec::new();
    for w in settings.validate() {
        match w.level {
            WarnLevel::Warning => warn(&w.message),
            WarnLevel::Error => errors.push(w.message),
        }
    }
    if !errors.is_empty() {
        return Err(AuditError::InvalidSettings(errors.join("; ")).into());
    }
    Ok(settings)
}

fn build_analyzer(api_key: &str, dry_run: bool) -> anyhow::Result<ClaudeAnalyzer> {
    if !dry_run {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                let client = claude_api::Client::new(api_key)
                    .context("failed to create API client")?
                    .with_base_url(base_url);
                return Ok(ClaudeAnalyzer::with_client(client));
            }
        }
    }
    Ok(ClaudeAnalyzer::new(api_key, dry_run)?)
}

fn print_configs(configs: &[ToolConfig]) {
    if configs.is_empty() {
        println!("  (none)");
        return;
    }
    for c in configs {
        println!(
            "  - {} ({}) from {}",
            c.tool_name,
            c.config_section,
            c.config_file.display()
        );
    }
}
