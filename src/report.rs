//! Report aggregation
//!
//! Violations arrive in traversal order; `finalize` produces the canonical
//! ordering: (file, line, column) with a stable tie-break on rule id, with
//! exact (file, line, column, rule) repeats removed. The same input always
//! serializes to the same report.

use crate::violation::Violation;
use std::path::Path;

/// Collects violations during evaluation
#[derive(Debug, Default)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation in arrival order
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Sort and deduplicate, consuming the report
    pub fn finalize(mut self) -> Vec<Violation> {
        self.violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.violations.dedup_by(|a, b| a.sort_key() == b.sort_key());
        self.violations
    }
}

/// Group ordered violations by file, preserving their order
pub fn by_file(violations: &[Violation]) -> Vec<(&Path, Vec<&Violation>)> {
    let mut groups: Vec<(&Path, Vec<&Violation>)> = Vec::new();
    for v in violations {
        let file = v.location.file.as_path();
        let same_file = matches!(groups.last(), Some((current, _)) if *current == file);
        if !same_file {
            groups.push((file, Vec::new()));
        }
        if let Some((_, list)) = groups.last_mut() {
            list.push(v);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Location, Severity};
    use std::path::PathBuf;

    fn v(file: &str, line: usize, column: usize, rule: &str) -> Violation {
        Violation::new(
            rule,
            Severity::Warning,
            "msg",
            Location::new(PathBuf::from(file), line, column),
        )
    }

    #[test]
    fn test_finalize_sorts_by_position() {
        let mut report = Report::new();
        report.add(v("b.js", 2, 1, "r"));
        report.add(v("a.js", 9, 9, "r"));
        report.add(v("b.js", 1, 5, "r"));

        let out = report.finalize();
        let files: Vec<String> = out
            .iter()
            .map(|x| {
                format!(
                    "{}:{}:{}",
                    x.location.file.display(),
                    x.location.line,
                    x.location.column
                )
            })
            .collect();
        assert_eq!(files, vec!["a.js:9:9", "b.js:1:5", "b.js:2:1"]);
    }

    #[test]
    fn test_finalize_tie_breaks_on_rule_id() {
        let mut report = Report::new();
        report.add(v("a.js", 1, 1, "zeta"));
        report.add(v("a.js", 1, 1, "alpha"));

        let out = report.finalize();
        assert_eq!(out[0].rule_id, "alpha");
        assert_eq!(out[1].rule_id, "zeta");
    }

    #[test]
    fn test_finalize_dedups_exact_repeats() {
        let mut report = Report::new();
        report.add(v("a.js", 3, 2, "r"));
        report.add(v("a.js", 3, 2, "r"));
        report.add(v("a.js", 3, 2, "other"));

        let out = report.finalize();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_by_file_groups_in_order() {
        let mut report = Report::new();
        report.add(v("b.js", 1, 1, "r"));
        report.add(v("a.js", 1, 1, "r"));
        report.add(v("a.js", 2, 1, "r"));
        let out = report.finalize();

        let groups = by_file(&out);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Path::new("a.js"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Path::new("b.js"));
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert!(report.is_empty());
        assert!(report.finalize().is_empty());
    }
}
