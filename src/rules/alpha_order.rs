//! Alphabetical ordering of require blocks and object-literal keys
//!
//! A rolling last-seen cursor is kept in the per-file context: one for the
//! current run of require statements, one per object literal. Sort keys are
//! case-insensitive with leading path punctuation and scope prefixes
//! stripped, so `require('./Beta')` and `require('beta')` compare equal.

use crate::context::Context;
use crate::rule::{Rule, RuleMatch};
use crate::tree::{NodeData, NodeKind, SyntaxNode};

pub fn rule() -> Rule {
    Rule::new(
        "alpha-order",
        &[NodeKind::RequireCall, NodeKind::ObjectKey],
        check,
    )
    .with_description("Keep require statements and object keys in alphabetical order")
}

/// Case-insensitive sort key with common prefixes stripped
fn sort_key(raw: &str) -> String {
    let mut s = raw.to_ascii_lowercase();
    loop {
        if let Some(rest) = s.strip_prefix("./") {
            s = rest.to_string();
        } else if let Some(rest) = s.strip_prefix("../") {
            s = rest.to_string();
        } else if let Some(rest) = s.strip_prefix('/') {
            s = rest.to_string();
        } else {
            break;
        }
    }
    if s.starts_with('@') {
        if let Some(pos) = s.find('/') {
            s = s[pos + 1..].to_string();
        }
    }
    s
}

fn check(node: &SyntaxNode, ctx: &mut Context) -> Vec<RuleMatch> {
    match &node.data {
        NodeData::RequireCall {
            module,
            starts_block,
        } => {
            let key = sort_key(module);
            let mut matches = Vec::new();
            if !*starts_block {
                if let Some(last) = &ctx.last_require_key {
                    if key < *last {
                        matches.push(RuleMatch::new(
                            node.line,
                            node.column,
                            format!("require of '{}' is out of alphabetical order", module),
                        ));
                    }
                }
            }
            ctx.last_require_key = Some(key);
            matches
        }
        NodeData::ObjectKey { key, literal } => {
            let sorted = sort_key(key);
            let mut matches = Vec::new();
            if let Some(last) = ctx.last_object_keys.get(literal) {
                if sorted < *last {
                    matches.push(RuleMatch::new(
                        node.line,
                        node.column,
                        format!("object key '{}' is out of alphabetical order", key),
                    ));
                }
            }
            ctx.last_object_keys.insert(*literal, sorted);
            matches
        }
        _ => Vec::new(),
    }
}
