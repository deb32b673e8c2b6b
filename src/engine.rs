//! Core linter engine
//!
//! One deterministic pre-order walk per file; node kinds dispatch through
//! the index the registry builds once. A faulting rule is converted into a
//! diagnostic and never aborts the walk; a per-file time budget abandons
//! the remainder of that file only.

use crate::config::Config;
use crate::context::Context;
use crate::document::ScriptDocument;
use crate::registry::RuleRegistry;
use crate::report::Report;
use crate::tree::NodeKind;
use crate::violation::{Location, Origin, Severity, Violation};
use rayon::prelude::*;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of a lint run
#[derive(Debug, Default)]
pub struct LintResult {
    /// All violations, in canonical order after `lint` returns
    pub violations: Vec<Violation>,

    /// Files processed
    pub files_processed: usize,

    /// Error-severity style violations
    pub error_count: usize,

    /// Warning-severity style violations
    pub warning_count: usize,

    /// Internal tool faults (rule faults, timeouts)
    pub fault_count: usize,

    /// Unreadable or unparseable inputs
    pub input_error_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl LintResult {
    /// Check if there are any error-severity style violations
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if result is clean (no style violations at all)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Exit code: 0 = no style errors, 1 = style errors,
    /// 2 = unrecoverable input error. Tool faults never change it.
    pub fn exit_code(&self) -> i32 {
        if self.input_error_count > 0 {
            2
        } else if self.error_count > 0 {
            1
        } else {
            0
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.violations.extend(other.violations);
        self.files_processed += other.files_processed;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.fault_count += other.fault_count;
        self.input_error_count += other.input_error_count;
    }

    /// Recompute counts from the violation list
    pub fn recount(&mut self) {
        self.error_count = 0;
        self.warning_count = 0;
        self.fault_count = 0;
        self.input_error_count = 0;
        for v in &self.violations {
            match v.origin {
                Origin::Rule => match v.severity {
                    Severity::Error => self.error_count += 1,
                    Severity::Warning => self.warning_count += 1,
                },
                Origin::RuleFault | Origin::Timeout => self.fault_count += 1,
                Origin::Parse | Origin::Io => self.input_error_count += 1,
            }
        }
    }
}

/// The main linter engine
pub struct Engine {
    config: Config,
    registry: RuleRegistry,
    /// kind -> indices into registry rules, built once
    kind_index: HashMap<NodeKind, Vec<usize>>,
}

impl Engine {
    /// Create a new engine from a configuration and a registry
    pub fn new(config: Config, registry: RuleRegistry) -> Self {
        let kind_index = registry.kind_index();
        Self {
            config,
            registry,
            kind_index,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Lint multiple files
    pub fn lint(&self, files: &[PathBuf]) -> LintResult {
        let start = Instant::now();
        log::debug!("linting {} files", files.len());

        let results: Vec<LintResult> = if self.config.engine.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(if self.config.engine.jobs > 0 {
                    self.config.engine.jobs
                } else {
                    num_cpus::get()
                })
                .build()
                .unwrap_or_else(|_| rayon::ThreadPoolBuilder::new().build().unwrap());

            pool.install(|| files.par_iter().map(|f| self.lint_file(f)).collect())
        } else {
            files.iter().map(|f| self.lint_file(f)).collect()
        };

        let mut combined = LintResult::default();
        for result in results {
            combined.merge(result);
        }

        let mut report = Report::new();
        for violation in combined.violations.drain(..) {
            report.add(violation);
        }
        combined.violations = report.finalize();
        combined.recount();

        combined.duration = start.elapsed();
        combined
    }

    /// Lint a single file
    pub fn lint_file(&self, path: &Path) -> LintResult {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                let mut result = LintResult {
                    files_processed: 1,
                    ..LintResult::default()
                };
                result.violations.push(Violation::diagnostic(
                    "file-read-error",
                    Origin::Io,
                    &format!("Failed to read file: {}", e),
                    Location::new(path.to_path_buf(), 0, 0),
                ));
                result.recount();
                return result;
            }
        };

        self.lint_source(path, &content)
    }

    /// Lint a source buffer under a file id
    pub fn lint_source(&self, path: &Path, content: &str) -> LintResult {
        let mut result = LintResult {
            files_processed: 1,
            ..LintResult::default()
        };

        let document = match ScriptDocument::parse(content) {
            Ok(d) => d,
            Err(e) => {
                result.violations.push(Violation::diagnostic(
                    "parse-error",
                    Origin::Parse,
                    &format!("Parse error: {}", e),
                    Location::new(path.to_path_buf(), e.line(), 0),
                ));
                result.recount();
                return result;
            }
        };

        result.violations = self.evaluate(&document, path);
        result.recount();
        result
    }

    /// Evaluate all subscribed rules against a parsed document.
    /// Violations come back in traversal order.
    fn evaluate(&self, document: &ScriptDocument, path: &Path) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut ctx = Context::new(document.source_lines(), self.config.indent_unit);

        let deadline = self
            .config
            .engine
            .timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        for (_, node) in document.tree().iter() {
            if let Some(deadline) = deadline {
                if Instant::now() > deadline {
                    violations.push(Violation::diagnostic(
                        "timeout",
                        Origin::Timeout,
                        "evaluation budget exceeded; remaining nodes skipped",
                        Location::new(path.to_path_buf(), node.line, node.column),
                    ));
                    break;
                }
            }

            let Some(rule_indices) = self.kind_index.get(&node.kind()) else {
                continue;
            };

            for &ri in rule_indices {
                let rule = &self.registry.all()[ri];

                if !rule.enabled || !self.config.is_rule_enabled(&rule.id) {
                    continue;
                }
                if self.config.should_ignore_rule_for_file(&rule.id, path) {
                    continue;
                }
                if document.is_rule_disabled_for_file(&rule.id) {
                    continue;
                }

                let outcome = catch_unwind(AssertUnwindSafe(|| (rule.check)(node, &mut ctx)));

                match outcome {
                    Ok(matches) => {
                        for m in matches {
                            if document.is_rule_disabled(&rule.id, m.line) {
                                continue;
                            }
                            let severity = self
                                .config
                                .get_severity_override(&rule.id)
                                .unwrap_or(rule.severity);
                            let mut violation = Violation::new(
                                &rule.id,
                                severity,
                                &m.message,
                                Location::new(path.to_path_buf(), m.line, m.column),
                            );
                            if let Some(source) = document.get_source_line(m.line) {
                                violation = violation.with_source_line(source);
                            }
                            if let Some(desc) = &rule.description {
                                violation = violation.with_help(desc);
                            }
                            violations.push(violation);
                        }
                    }
                    Err(_) => {
                        log::warn!("rule '{}' faulted at {}:{}", rule.id, node.line, node.column);
                        violations.push(Violation::diagnostic(
                            "rule-internal-error",
                            Origin::RuleFault,
                            &format!("rule '{}' faulted and was skipped for this node", rule.id),
                            Location::new(path.to_path_buf(), node.line, node.column),
                        ));
                    }
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Rule, RuleMatch};
    use crate::rules::builtin_rules;
    use crate::tree::SyntaxNode;

    fn engine() -> Engine {
        engine_with(Config::default())
    }

    fn engine_with(config: Config) -> Engine {
        Engine::new(
            config,
            RuleRegistry::from_rules(builtin_rules()).unwrap(),
        )
    }

    fn lint_str(content: &str) -> LintResult {
        engine().lint_source(Path::new("test.js"), content)
    }

    #[test]
    fn test_exit_codes() {
        let mut result = LintResult::default();
        assert_eq!(result.exit_code(), 0);

        result.error_count = 1;
        assert_eq!(result.exit_code(), 1);

        result.input_error_count = 1;
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn test_faults_do_not_affect_exit_code() {
        let mut result = LintResult::default();
        result.fault_count = 3;
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn test_clean_file_has_empty_report() {
        let content = "var widget = new Widget();\nif (widget)\n{\n\twidget.run();\n}\n";
        let result = lint_str(content);
        assert!(result.violations.is_empty(), "{:?}", result.violations);
        assert!(result.is_clean());
    }

    #[test]
    fn test_brace_scenario() {
        let result = lint_str("if (x) {\n\tdoSomething();\n}\n");
        let braces: Vec<_> = result
            .violations
            .iter()
            .filter(|v| v.rule_id == "brace-style")
            .collect();
        assert_eq!(braces.len(), 1);
        assert_eq!(braces[0].location.line, 1);
        assert_eq!(braces[0].location.column, 8);
        assert!(braces[0]
            .message
            .contains("opening brace on same line as control keyword"));
    }

    #[test]
    fn test_quote_scenarios() {
        let justified = lint_str("var a = \"it's fine\";\n");
        assert!(justified
            .violations
            .iter()
            .all(|v| v.rule_id != "quote-style"));

        let unjustified = lint_str("var a = \"fine\";\n");
        let quotes: Vec<_> = unjustified
            .violations
            .iter()
            .filter(|v| v.rule_id == "quote-style")
            .collect();
        assert_eq!(quotes.len(), 1);
    }

    #[test]
    fn test_alpha_scenario() {
        let result = lint_str("require('Beta'); require('Alpha');\n");
        let alpha: Vec<_> = result
            .violations
            .iter()
            .filter(|v| v.rule_id == "alpha-order")
            .collect();
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].location.line, 1);
    }

    #[test]
    fn test_parse_error_is_file_level_violation() {
        let result = lint_str("var a = 'unclosed\n");
        assert_eq!(result.input_error_count, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].rule_id, "parse-error");
        assert_eq!(result.violations[0].origin, Origin::Parse);
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn test_determinism() {
        let content = "require('Beta'); require('Alpha');\nvar a = \"fine\";\nif (x) {\n\ty();\n}\n";
        let first = lint_str(content);
        let second = lint_str(content);

        let serialize = |r: &LintResult| serde_json::to_string(&r.violations).unwrap();
        assert_eq!(serialize(&first), serialize(&second));
    }

    #[test]
    fn test_monotonicity_of_rule_subsets() {
        let content = "require('Beta'); require('Alpha');\nvar a = \"fine\";\nif (x) {\n\ty();\n}\n";

        let full = lint_str(content);

        let mut config = Config::default();
        config.rules.enabled = vec!["quote-style".to_string(), "alpha-order".to_string()];
        let subset = engine_with(config).lint_source(Path::new("test.js"), content);

        for v in &subset.violations {
            assert!(
                full.violations.iter().any(|f| f.sort_key() == v.sort_key()),
                "subset produced a violation the full set lacks: {:?}",
                v
            );
        }
        assert!(subset.violations.len() <= full.violations.len());
    }

    #[test]
    fn test_faulting_rule_is_isolated() {
        fn panicky(_node: &SyntaxNode, _ctx: &mut Context) -> Vec<RuleMatch> {
            panic!("boom");
        }

        let mut rules = builtin_rules();
        rules.push(Rule::new(
            "always-panics",
            &[NodeKind::StringLiteral],
            panicky,
        ));
        let engine = Engine::new(Config::default(), RuleRegistry::from_rules(rules).unwrap());

        let result = engine.lint_source(Path::new("test.js"), "var a = \"fine\";\n");

        // The panicking rule is reported as a fault...
        assert!(result.fault_count > 0);
        assert!(result
            .violations
            .iter()
            .any(|v| v.rule_id == "rule-internal-error"));
        // ...and does not suppress the quote-style finding on the same node
        assert!(result.violations.iter().any(|v| v.rule_id == "quote-style"));
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn test_severity_override_applies() {
        let mut config = Config::default();
        config
            .rules
            .severity
            .insert("quote-style".to_string(), Severity::Error);
        let result = engine_with(config).lint_source(Path::new("test.js"), "var a = \"fine\";\n");

        let quote = result
            .violations
            .iter()
            .find(|v| v.rule_id == "quote-style")
            .unwrap();
        assert_eq!(quote.severity, Severity::Error);
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let mut config = Config::default();
        config.rules.disabled.push("quote-style".to_string());
        let result = engine_with(config).lint_source(Path::new("test.js"), "var a = \"fine\";\n");
        assert!(result.violations.iter().all(|v| v.rule_id != "quote-style"));
    }

    #[test]
    fn test_inline_disable_suppresses_finding() {
        let content = "var a = \"fine\"; // jstyle-disable quote-style\n";
        let result = lint_str(content);
        assert!(result.violations.iter().all(|v| v.rule_id != "quote-style"));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let result = engine().lint_file(Path::new("definitely/not/here.js"));
        assert_eq!(result.input_error_count, 1);
        assert_eq!(result.violations[0].rule_id, "file-read-error");
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn test_lint_many_files_merges_and_orders() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.js");
        let bad = dir.path().join("b.js");
        std::fs::write(&good, "var a = 'fine';\n").unwrap();
        std::fs::write(&bad, "var b = \"fine\";\n").unwrap();

        let result = engine().lint(&[bad.clone(), good.clone()]);
        assert_eq!(result.files_processed, 2);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.file, bad);
    }

    #[test]
    fn test_parse_failure_does_not_stop_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.js");
        let plain = dir.path().join("plain.js");
        std::fs::write(&broken, "var a = 'unclosed\n").unwrap();
        std::fs::write(&plain, "var b = \"fine\";\n").unwrap();

        let result = engine().lint(&[broken, plain]);
        assert_eq!(result.input_error_count, 1);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.exit_code(), 2);
    }
}
