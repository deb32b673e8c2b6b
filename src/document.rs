//! Parsed script document
//!
//! Owns the syntax tree, the source lines and the inline suppression state
//! for one file. This is the only entry point the evaluator uses to obtain
//! a tree; the scanner behind it can be swapped without touching the engine.

use crate::scanner::{scan, Comment, ParseError};
use crate::tree::Tree;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// A parsed JavaScript document
pub struct ScriptDocument {
    /// The syntax tree, nodes in pre-order
    tree: Tree,

    /// Source lines for display
    source_lines: Vec<String>,

    /// Lines with disable comments (rule_id -> set of lines)
    disabled_lines: HashMap<String, HashSet<usize>>,

    /// Rules disabled for the entire file
    disabled_file_rules: HashSet<String>,
}

impl ScriptDocument {
    /// Parse JavaScript content into a document
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let output = scan(content)?;
        let source_lines: Vec<String> = content.lines().map(String::from).collect();

        let (disabled_lines, disabled_file_rules) = Self::parse_disable_comments(&output.comments);

        Ok(Self {
            tree: output.tree,
            source_lines,
            disabled_lines,
            disabled_file_rules,
        })
    }

    /// Parse inline disable comments
    fn parse_disable_comments(
        comments: &[Comment],
    ) -> (HashMap<String, HashSet<usize>>, HashSet<String>) {
        let mut disabled_lines: HashMap<String, HashSet<usize>> = HashMap::new();
        let mut disabled_file_rules: HashSet<String> = HashSet::new();

        let disable_re = Regex::new(r"jstyle-disable\s+(\S+)").unwrap();
        let disable_next_re = Regex::new(r"jstyle-disable-next-line\s+(\S+)").unwrap();
        let disable_file_re = Regex::new(r"jstyle-disable-file\s+(\S+)").unwrap();

        for comment in comments {
            // most specific directive first
            if let Some(cap) = disable_file_re.captures(&comment.text) {
                disabled_file_rules.insert(cap[1].trim_end_matches("*/").trim().to_string());
            } else if let Some(cap) = disable_next_re.captures(&comment.text) {
                disabled_lines
                    .entry(cap[1].trim_end_matches("*/").trim().to_string())
                    .or_default()
                    .insert(comment.line + 1);
            } else if let Some(cap) = disable_re.captures(&comment.text) {
                disabled_lines
                    .entry(cap[1].trim_end_matches("*/").trim().to_string())
                    .or_default()
                    .insert(comment.line);
            }
        }

        (disabled_lines, disabled_file_rules)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn source_lines(&self) -> &[String] {
        &self.source_lines
    }

    /// Get source line at line number (1-based)
    pub fn get_source_line(&self, line: usize) -> Option<&str> {
        if line > 0 && line <= self.source_lines.len() {
            Some(&self.source_lines[line - 1])
        } else {
            None
        }
    }

    /// Check if a rule is disabled at a specific line (inline comments)
    pub fn is_rule_disabled(&self, rule_id: &str, line: usize) -> bool {
        if let Some(lines) = self.disabled_lines.get("all") {
            if lines.contains(&line) {
                return true;
            }
        }

        if let Some(lines) = self.disabled_lines.get(rule_id) {
            if lines.contains(&line) {
                return true;
            }
        }

        false
    }

    /// Check if a rule is disabled for the entire file
    pub fn is_rule_disabled_for_file(&self, rule_id: &str) -> bool {
        self.disabled_file_rules.contains("all") || self.disabled_file_rules.contains(rule_id)
    }
}
