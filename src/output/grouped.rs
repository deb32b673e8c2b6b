//! Grouped output formatter
//!
//! Groups violations by file for terminal readability.

use super::OutputFormatter;
use crate::engine::LintResult;
use crate::report::by_file;
use crate::violation::{Severity, Violation};

/// Formatter that groups violations by file
pub struct GroupedFormatter {
    /// Show colors (when supported)
    pub use_colors: bool,
    /// Show source line context
    pub show_source: bool,
}

impl GroupedFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            show_source: true,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn severity_symbol(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "E",
            Severity::Warning => "W",
        }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.use_colors {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
        }
    }

    fn reset_color(&self) -> &'static str {
        if self.use_colors {
            "\x1b[0m"
        } else {
            ""
        }
    }
}

impl Default for GroupedFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for GroupedFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        for (file, violations) in by_file(&result.violations) {
            let header = file.display().to_string();
            output.push_str(&format!("\n{}\n", header));
            output.push_str(&format!("{}\n", "─".repeat(header.len().min(80))));

            for violation in violations {
                output.push_str(&self.format_violation(violation));
            }
        }

        if !result.violations.is_empty() {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s) in {} file(s)\n",
                result.error_count, result.warning_count, result.files_processed
            ));
        }

        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let mut output = String::new();

        let color = self.severity_color(violation.severity);
        let reset = self.reset_color();
        let symbol = self.severity_symbol(violation.severity);

        output.push_str(&format!(
            "  {}[{}]{} {}:{}: {} ({})\n",
            color,
            symbol,
            reset,
            violation.location.line,
            violation.location.column,
            violation.message,
            violation.rule_id
        ));

        if self.show_source {
            if let Some(source) = &violation.source_line {
                output.push_str(&format!("      │ {}\n", source.trim_start()));
            }
        }

        output
    }
}
