//! Output formatters for lint results

mod grouped;
mod json;
mod text;

pub use grouped::GroupedFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::engine::LintResult;
use crate::violation::Violation;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire lint result
    fn format(&self, result: &LintResult) -> String;

    /// Format a single violation
    fn format_violation(&self, violation: &Violation) -> String;
}
