pub mod analyzer;
pub mod config;
pub mod discovery;
pub mod error;
pub mod io;
pub mod paths;
pub mod report;
pub mod types;
pub mod value;

pub use analyzer::ClaudeAnalyzer;
pub use discovery::{ConfigDiscovery, Discovery, DiscoveryWarning};
pub use error::{AuditError, Result};
pub use report::ReportGenerator;
pub use types::{AuditResult, ConflictReport, TokenUsage, ToolConfig};
pub use value::ConfigValue;
