//! Line-oriented text output
//!
//! One line per violation: `file:line:col: severity: message (ruleId)`.
//! The body carries no wall-clock values, so identical input always
//! serializes identically.

use super::OutputFormatter;
use crate::engine::LintResult;
use crate::violation::{Severity, Violation};
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Append the summary block
    pub show_summary: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_summary: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> String {
        let s = format!("{}", severity);
        if !self.colored {
            return s;
        }
        match severity {
            Severity::Error => s.red().bold().to_string(),
            Severity::Warning => s.yellow().bold().to_string(),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for violation in &result.violations {
            output.push_str(&self.format_violation(violation));
            output.push('\n');
        }

        if self.show_summary {
            if !result.violations.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!(
                "{} {} processed",
                result.files_processed,
                if result.files_processed == 1 {
                    "file"
                } else {
                    "files"
                }
            ));

            let mut counts = Vec::new();
            if result.error_count > 0 {
                let s = format!(
                    "{} {}",
                    result.error_count,
                    if result.error_count == 1 {
                        "error"
                    } else {
                        "errors"
                    }
                );
                counts.push(if self.colored { s.red().to_string() } else { s });
            }
            if result.warning_count > 0 {
                let s = format!(
                    "{} {}",
                    result.warning_count,
                    if result.warning_count == 1 {
                        "warning"
                    } else {
                        "warnings"
                    }
                );
                counts.push(if self.colored {
                    s.yellow().to_string()
                } else {
                    s
                });
            }
            if result.fault_count > 0 {
                counts.push(format!("{} tool diagnostic(s)", result.fault_count));
            }
            if result.input_error_count > 0 {
                counts.push(format!("{} unreadable input(s)", result.input_error_count));
            }

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');
        }

        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        format!(
            "{}:{}:{}: {}: {} ({})",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            self.severity_str(violation.severity),
            violation.message,
            if self.colored {
                violation.rule_id.cyan().to_string()
            } else {
                violation.rule_id.clone()
            }
        )
    }
}
