//! jstyle - JavaScript Style Linter
//!
//! A fast, modular linter enforcing JavaScript layout and naming
//! conventions: brace placement, quote style, identifier casing,
//! alphabetical require/key ordering and indentation.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> ScriptDocument -> RuleRegistry -> Report
//! ```
//!
//! The engine loads configuration, parses each file into a syntax tree,
//! dispatches nodes to the rules subscribed to their kind, and aggregates
//! the violations into an ordered, deduplicated report. Files are
//! independent and evaluated in parallel; each gets its own context.

pub mod config;
pub mod context;
pub mod document;
pub mod engine;
pub mod output;
pub mod registry;
pub mod report;
pub mod rule;
pub mod rules;
pub mod scanner;
pub mod tree;
pub mod violation;

// Re-export main types
pub use config::{Config, ConfigError, IndentUnit, OutputFormat};
pub use context::Context;
pub use document::ScriptDocument;
pub use engine::{Engine, LintResult};
pub use output::{GroupedFormatter, JsonFormatter, OutputFormatter, TextFormatter};
pub use registry::{RegistryError, RuleRegistry};
pub use report::Report;
pub use rule::{Rule, RuleCategory, RuleMatch};
pub use scanner::ParseError;
pub use tree::{NodeKind, SyntaxNode, Tree};
pub use violation::{Location, Origin, Severity, Violation};
