//! JSON output formatter
//!
//! Ordered per-file violation lists plus a summary. Durations are not
//! serialized; two runs over identical input produce identical bytes.

use super::OutputFormatter;
use crate::engine::LintResult;
use crate::report::by_file;
use crate::violation::{Origin, Severity, Violation};
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: Vec<JsonFile<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    file: String,
    violations: Vec<JsonViolation<'a>>,
}

#[derive(Serialize)]
struct JsonViolation<'a> {
    rule_id: &'a str,
    severity: &'a str,
    origin: Origin,
    message: &'a str,
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_line: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    files_processed: usize,
    error_count: usize,
    warning_count: usize,
    fault_count: usize,
    input_error_count: usize,
}

fn severity_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn to_json_violation(v: &Violation) -> JsonViolation<'_> {
    JsonViolation {
        rule_id: &v.rule_id,
        severity: severity_str(v.severity),
        origin: v.origin,
        message: &v.message,
        line: v.location.line,
        column: v.location.column,
        source_line: v.source_line.as_deref(),
        help: v.help.as_deref(),
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &LintResult) -> String {
        let files: Vec<JsonFile> = by_file(&result.violations)
            .into_iter()
            .map(|(file, violations)| JsonFile {
                file: file.display().to_string(),
                violations: violations.into_iter().map(to_json_violation).collect(),
            })
            .collect();

        let output = JsonOutput {
            files,
            summary: JsonSummary {
                files_processed: result.files_processed,
                error_count: result.error_count,
                warning_count: result.warning_count,
                fault_count: result.fault_count,
                input_error_count: result.input_error_count,
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let json = to_json_violation(violation);
        if self.pretty {
            serde_json::to_string_pretty(&json).unwrap_or_default()
        } else {
            serde_json::to_string(&json).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::Location;
    use std::path::PathBuf;

    #[test]
    fn test_json_format_violation() {
        let formatter = JsonFormatter::new();
        let violation = Violation::new(
            "quote-style",
            Severity::Warning,
            "msg",
            Location::new(PathBuf::from("app.js"), 10, 5),
        );

        let output = formatter.format_violation(&violation);
        assert!(output.contains("\"rule_id\":\"quote-style\""));
        assert!(output.contains("\"severity\":\"warning\""));
        assert!(output.contains("\"line\":10"));
    }

    #[test]
    fn test_json_groups_by_file() {
        let formatter = JsonFormatter::new();
        let result = LintResult {
            violations: vec![
                Violation::new(
                    "a",
                    Severity::Warning,
                    "m",
                    Location::new(PathBuf::from("one.js"), 1, 1),
                ),
                Violation::new(
                    "b",
                    Severity::Error,
                    "m",
                    Location::new(PathBuf::from("one.js"), 2, 1),
                ),
                Violation::new(
                    "c",
                    Severity::Warning,
                    "m",
                    Location::new(PathBuf::from("two.js"), 1, 1),
                ),
            ],
            files_processed: 2,
            error_count: 1,
            warning_count: 2,
            ..Default::default()
        };

        let output = formatter.format(&result);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["files"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["files"][0]["violations"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["summary"]["error_count"], 1);
        assert_eq!(parsed["summary"]["files_processed"], 2);
    }

    #[test]
    fn test_json_has_no_duration() {
        let formatter = JsonFormatter::new();
        let result = LintResult {
            duration: std::time::Duration::from_millis(123),
            ..Default::default()
        };
        let output = formatter.format(&result);
        assert!(!output.contains("duration"));
    }
}
