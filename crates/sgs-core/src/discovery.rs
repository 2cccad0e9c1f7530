//! Locate and parse recognized tool-configuration files under a project root.
//!
//! Sources are read in a fixed order:
//!   1. `pyproject.toml`: one config per `[tool.<name>]` table
//!   2. `.pre-commit-config.yaml`: one config per hook entry
//!   3. standalone files: see [`paths::STANDALONE_FILES`]
//!
//! Discovery never fails. Absent files are skipped silently, blank files
//! contribute nothing, and unreadable or malformed files are reported as
//! [`DiscoveryWarning`]s while the remaining sources are still read.

use crate::paths::{self, StandaloneFile, StandaloneFormat, PRE_COMMIT_TOOL_PREFIX};
use crate::types::ToolConfig;
use crate::value::{from_yaml, map_from_ini, map_from_toml, map_from_yaml, parse_ini};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryWarning {
    pub file: PathBuf,
    pub message: String,
}

impl fmt::Display for DiscoveryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Everything one discovery pass produced.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub configs: Vec<ToolConfig>,
    pub warnings: Vec<DiscoveryWarning>,
}

impl Discovery {
    fn push(&mut self, config: ToolConfig) {
        tracing::debug!(
            tool = %config.tool_name,
            section = %config.config_section,
            "discovered tool config"
        );
        self.configs.push(config);
    }

    fn warn(&mut self, file: &Path, message: impl Into<String>) {
        self.warnings.push(DiscoveryWarning {
            file: file.to_path_buf(),
            message: message.into(),
        });
    }
}

pub struct ConfigDiscovery {
    root: PathBuf,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl ConfigDiscovery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn discover_all(&self) -> Discovery {
        let mut out = Discovery::default();
        self.discover_pyproject(&mut out);
        self.discover_pre_commit(&mut out);
        for file in paths::STANDALONE_FILES {
            self.discover_standalone(file, &mut out);
        }
        tracing::debug!(
            root = %self.root.display(),
            configs = out.configs.len(),
            warnings = out.warnings.len(),
            "discovery finished"
        );
        out
    }

    fn discover_pyproject(&self, out: &mut Discovery) {
        let path = paths::pyproject_path(&self.root);
        let Some(content) = read_source(&path, out) else {
            return;
        };

        let mut doc: toml::Table = match toml::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                out.warn(&path, format!("invalid TOML: {}", e.message()));
                return;
            }
        };

        let tools = match doc.remove("tool") {
            None => return,
            Some(toml::Value::Table(tools)) => tools,
            Some(_) => {
                out.warn(&path, "`tool` is not a table");
                return;
            }
        };

        for (name, section) in tools {
            match section {
                toml::Value::Table(table) if !name.is_empty() => {
                    let section = format!("tool.{name}");
                    out.push(ToolConfig::new(name, &path, section, map_from_toml(table)));
                }
                toml::Value::Table(_) => out.warn(&path, "empty tool name under `tool`; skipped"),
                _ => out.warn(&path, format!("`tool.{name}` is not a table; skipped")),
            }
        }
    }

    fn discover_pre_commit(&self, out: &mut Discovery) {
        use serde_yaml::Value;

        let path = paths::pre_commit_path(&self.root);
        let Some(content) = read_source(&path, out) else {
            return;
        };

        let doc: Value = match serde_yaml::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                out.warn(&path, format!("invalid YAML: {e}"));
                return;
            }
        };

        match doc {
            Value::Mapping(_) => {}
            // Comment-only document.
            Value::Null => return,
            _ => {
                out.warn(&path, "top level is not a mapping");
                return;
            }
        }

        let repos = match doc.get("repos") {
            None | Some(Value::Null) => return,
            Some(Value::Sequence(repos)) => repos,
            Some(_) => {
                out.warn(&path, "`repos` is not a list");
                return;
            }
        };

        for (i, repo) in repos.iter().enumerate() {
            if !repo.is_mapping() {
                out.warn(&path, format!("repos[{i}] is not a mapping; skipped"));
                continue;
            }
            let label = repo.get("repo").and_then(Value::as_str).unwrap_or("unknown");
            let rev = repo.get("rev").cloned().and_then(from_yaml);

            let hooks = match repo.get("hooks") {
                None | Some(Value::Null) => continue,
                Some(Value::Sequence(hooks)) => hooks,
                Some(_) => {
                    out.warn(&path, format!("repos[{i}].hooks is not a list; skipped"));
                    continue;
                }
            };

            for (j, hook) in hooks.iter().enumerate() {
                let id = match hook.get("id").and_then(Value::as_str) {
                    Some(id) if !id.is_empty() => id,
                    _ => {
                        out.warn(&path, format!("repos[{i}].hooks[{j}] has no id; skipped"));
                        continue;
                    }
                };
                let Some(mapping) = hook.as_mapping() else {
                    continue;
                };

                let mut data = map_from_yaml(mapping.clone());
                if let Some(rev) = &rev {
                    data.entry("rev".to_string()).or_insert_with(|| rev.clone());
                }
                out.push(ToolConfig::new(
                    format!("{PRE_COMMIT_TOOL_PREFIX}{id}"),
                    &path,
                    format!("repos.{label}"),
                    data,
                ));
            }
        }
    }

    fn discover_standalone(&self, file: &StandaloneFile, out: &mut Discovery) {
        let path = self.root.join(file.file_name);
        let Some(content) = read_source(&path, out) else {
            return;
        };

        let parsed = match file.format {
            StandaloneFormat::Toml => toml::from_str::<toml::Table>(&content)
                .map(map_from_toml)
                .map_err(|e| format!("invalid TOML: {}", e.message())),
            StandaloneFormat::Ini => parse_ini(&content)
                .map(|ini| map_from_ini(&ini))
                .map_err(|e| format!("invalid INI: {e}")),
        };

        match parsed {
            Ok(data) => out.push(ToolConfig::new(file.tool_name, &path, "root", data)),
            Err(message) => out.warn(&path, message),
        }
    }
}

/// Read a recognized file. `None` when it is absent, blank, or unreadable;
/// read failures are recorded as warnings.
fn read_source(path: &Path, out: &mut Discovery) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => {
            tracing::debug!(file = %path.display(), "empty config file");
            None
        }
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            out.warn(path, format!("failed to read: {e}"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
