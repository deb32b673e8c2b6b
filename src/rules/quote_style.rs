//! Prefer single quotes for strings
//!
//! Double quotes are justified only when the string contains an unescaped
//! single quote (an apostrophe), sparing an escape.

use crate::context::Context;
use crate::rule::{Rule, RuleCategory, RuleMatch};
use crate::tree::{NodeData, NodeKind, SyntaxNode};

pub fn rule() -> Rule {
    Rule::new("quote-style", &[NodeKind::StringLiteral], check)
        .with_category(RuleCategory::Pedantic)
        .with_description("Use single quotes unless the string contains a single quote")
}

fn check(node: &SyntaxNode, _ctx: &mut Context) -> Vec<RuleMatch> {
    let NodeData::StringLiteral {
        quote,
        has_unescaped_single_quote,
        ..
    } = &node.data
    else {
        return Vec::new();
    };

    if *quote == '"' && !has_unescaped_single_quote {
        return vec![RuleMatch::new(
            node.line,
            node.column,
            "double-quoted string contains no single quote; use single quotes",
        )];
    }

    Vec::new()
}
