//! Per-file evaluation state
//!
//! Owned exclusively by the evaluator for the duration of one file's walk
//! and discarded afterwards; never shared across files.

use crate::config::IndentUnit;
use std::collections::HashMap;

/// Mutable state threaded through one file's evaluation
pub struct Context<'a> {
    /// The file's source lines
    pub source_lines: &'a [String],

    /// Configured indentation unit
    pub indent_unit: IndentUnit,

    /// Rolling sort-key cursor for the current require block
    pub last_require_key: Option<String>,

    /// Rolling sort-key cursor per object literal (node index -> last key)
    pub last_object_keys: HashMap<usize, String>,
}

impl<'a> Context<'a> {
    pub fn new(source_lines: &'a [String], indent_unit: IndentUnit) -> Self {
        Self {
            source_lines,
            indent_unit,
            last_require_key: None,
            last_object_keys: HashMap::new(),
        }
    }
}
