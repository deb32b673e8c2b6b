//! Opening braces belong on their own line
//!
//! Object literals and inline single-line forms (`if (x) { y(); }`) are
//! exempt; only braces owned by a control keyword or a function header and
//! opened on the owner's line are flagged.

use crate::context::Context;
use crate::rule::{Rule, RuleMatch};
use crate::tree::{BraceOwner, NodeData, NodeKind, SyntaxNode};
use crate::violation::Severity;

pub fn rule() -> Rule {
    Rule::new("brace-style", &[NodeKind::BraceOpen], check)
        .with_severity(Severity::Error)
        .with_description("Place the opening brace on its own line below the statement that owns it")
}

fn check(node: &SyntaxNode, _ctx: &mut Context) -> Vec<RuleMatch> {
    let NodeData::BraceOpen {
        owner,
        same_line_as_owner,
        close_line,
    } = &node.data
    else {
        return Vec::new();
    };

    if !*same_line_as_owner {
        return Vec::new();
    }

    // Single-line forms close where they open and stay legal
    if *close_line == Some(node.line) {
        return Vec::new();
    }

    let what = match owner {
        BraceOwner::Control(kw) => format!("control keyword '{}'", kw),
        BraceOwner::Function => "function header".to_string(),
        _ => return Vec::new(),
    };

    vec![RuleMatch::new(
        node.line,
        node.column,
        format!("opening brace on same line as {}", what),
    )]
}
