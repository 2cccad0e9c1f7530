use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Recognized config files
// ---------------------------------------------------------------------------

pub const PYPROJECT_FILE: &str = "pyproject.toml";
pub const PRE_COMMIT_FILE: &str = ".pre-commit-config.yaml";

/// Prefix for tool names derived from pre-commit hook ids.
pub const PRE_COMMIT_TOOL_PREFIX: &str = "pre-commit-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandaloneFormat {
    Toml,
    Ini,
}

/// A single-tool config file checked by fixed name.
#[derive(Debug, Clone, Copy)]
pub struct StandaloneFile {
    pub file_name: &'static str,
    pub tool_name: &'static str,
    pub format: StandaloneFormat,
}

/// Checked in this order.
pub const STANDALONE_FILES: &[StandaloneFile] = &[
    StandaloneFile {
        file_name: "ruff.toml",
        tool_name: "ruff",
        format: StandaloneFormat::Toml,
    },
    StandaloneFile {
        file_name: ".ruff.toml",
        tool_name: "ruff",
        format: StandaloneFormat::Toml,
    },
    StandaloneFile {
        file_name: "mypy.ini",
        tool_name: "mypy",
        format: StandaloneFormat::Ini,
    },
    StandaloneFile {
        file_name: ".flake8",
        tool_name: "flake8",
        format: StandaloneFormat::Ini,
    },
    StandaloneFile {
        file_name: ".pylintrc",
        tool_name: "pylint",
        format: StandaloneFormat::Ini,
    },
];

// ---------------------------------------------------------------------------
// Audit settings and output
// ---------------------------------------------------------------------------

pub const SETTINGS_FILE: &str = ".sgs/audit.yaml";
pub const DEFAULT_REPORT_FILE: &str = "tool-config-audit.md";

pub fn pyproject_path(root: &Path) -> PathBuf {
    root.join(PYPROJECT_FILE)
}

pub fn pre_commit_path(root: &Path) -> PathBuf {
    root.join(PRE_COMMIT_FILE)
}

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}
