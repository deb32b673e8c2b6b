//! Built-in style rules

pub mod alpha_order;
pub mod brace_style;
pub mod indent_style;
pub mod naming_case;
pub mod quote_style;

use crate::rule::Rule;

/// Get all built-in rules
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        alpha_order::rule(),
        brace_style::rule(),
        indent_style::rule(),
        naming_case::rule(),
        quote_style::rule(),
    ]
}

/// Ids of all built-in rules, in registration order
pub fn builtin_rule_ids() -> Vec<String> {
    builtin_rules().into_iter().map(|r| r.id).collect()
}
