//! Rule definition

use crate::context::Context;
use crate::tree::{NodeKind, SyntaxNode};
use crate::violation::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Code that is definitely wrong or useless
    Correctness,
    /// Idiomatic and consistent style rules
    #[default]
    Style,
    /// Extra strict rules that may have false positives
    Pedantic,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Correctness => write!(f, "correctness"),
            RuleCategory::Style => write!(f, "style"),
            RuleCategory::Pedantic => write!(f, "pedantic"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "correctness" => Ok(RuleCategory::Correctness),
            "style" => Ok(RuleCategory::Style),
            "pedantic" => Ok(RuleCategory::Pedantic),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A single finding produced by a check function; the engine turns it into
/// a full violation with the rule's id and effective severity
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl RuleMatch {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Check function: inspects one node with the per-file context
pub type CheckFn = fn(&SyntaxNode, &mut Context) -> Vec<RuleMatch>;

/// A lint rule definition
#[derive(Clone)]
pub struct Rule {
    /// Unique rule identifier (e.g., "brace-style")
    pub id: String,

    /// Detailed description
    pub description: Option<String>,

    /// Default severity level
    pub severity: Severity,

    /// Rule category
    pub category: RuleCategory,

    /// Node kinds this rule subscribes to
    pub kinds: &'static [NodeKind],

    /// The check itself
    pub check: CheckFn,

    /// Whether this rule is enabled by default
    pub enabled: bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("category", &self.category)
            .field("kinds", &self.kinds)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Rule {
    /// Create a new rule with minimal required fields
    pub fn new(id: &str, kinds: &'static [NodeKind], check: CheckFn) -> Self {
        Self {
            id: id.to_string(),
            description: None,
            severity: Severity::Warning,
            category: RuleCategory::default(),
            kinds,
            check,
            enabled: true,
        }
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the rule category
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the description
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Check if this rule applies to a node kind
    pub fn applies_to(&self, kind: NodeKind) -> bool {
        self.kinds.contains(&kind)
    }
}
