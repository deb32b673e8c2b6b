//! Violation types for linting results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for violations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - style deviation worth fixing
    #[default]
    Warning,
    /// Error - definite violation of the convention
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Where a violation came from.
///
/// Only `Rule` entries count toward the style exit code; the rest are
/// tool diagnostics surfaced alongside the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// A style rule matched
    #[default]
    Rule,
    /// The source could not be parsed
    Parse,
    /// The file could not be read
    Io,
    /// A rule's check logic faulted mid-evaluation
    RuleFault,
    /// The per-file evaluation budget was exceeded
    Timeout,
}

impl Origin {
    /// True for parse/io failures that make a file's input unusable
    pub fn is_input_error(&self) -> bool {
        matches!(self, Origin::Parse | Origin::Io)
    }

    /// True for internal tool faults (rule fault, timeout)
    pub fn is_fault(&self) -> bool {
        matches!(self, Origin::RuleFault | Origin::Timeout)
    }
}

/// Source code location
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

/// A single detected instance of a rule being broken at a source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule ID that triggered this violation (or a reserved engine id)
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Location,
    /// Origin of the violation
    #[serde(default)]
    pub origin: Origin,
    /// The source line (for display)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
    /// Help text (usually rule description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Violation {
    /// Create a new rule violation
    pub fn new(rule_id: &str, severity: Severity, message: &str, location: Location) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            message: message.to_string(),
            location,
            origin: Origin::Rule,
            source_line: None,
            help: None,
        }
    }

    /// Create a tool diagnostic with an explicit origin
    pub fn diagnostic(rule_id: &str, origin: Origin, message: &str, location: Location) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Error,
            message: message.to_string(),
            location,
            origin,
            source_line: None,
            help: None,
        }
    }

    /// Add source line for display
    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    /// Add help text
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Check if this is an error-severity style violation
    pub fn is_style_error(&self) -> bool {
        self.origin == Origin::Rule && self.severity == Severity::Error
    }

    /// Sort key used by the report aggregator
    pub fn sort_key(&self) -> (&PathBuf, usize, usize, &str) {
        (
            &self.location.file,
            self.location.line,
            self.location.column,
            self.rule_id.as_str(),
        )
    }
}
