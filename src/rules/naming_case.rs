//! Naming conventions for constructors and constants
//!
//! Constructors invoked with `new` must be TitleCase; `const` bindings of
//! plain literals must be SCREAMING_SNAKE_CASE.

use crate::context::Context;
use crate::rule::{Rule, RuleMatch};
use crate::tree::{DeclKeyword, InitKind, NodeData, NodeKind, SyntaxNode};
use regex::Regex;

pub fn rule() -> Rule {
    Rule::new(
        "naming-case",
        &[NodeKind::NewExpr, NodeKind::Declaration],
        check,
    )
    .with_description("TitleCase constructors, SCREAMING_SNAKE_CASE literal constants")
}

fn is_title_case(name: &str) -> bool {
    let re = Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap();
    re.is_match(name) && name.bytes().any(|b| b.is_ascii_lowercase())
}

fn is_screaming_snake_case(name: &str) -> bool {
    let re = Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap();
    re.is_match(name)
}

fn check(node: &SyntaxNode, _ctx: &mut Context) -> Vec<RuleMatch> {
    match &node.data {
        NodeData::NewExpr { callee } => {
            if !is_title_case(callee) {
                return vec![RuleMatch::new(
                    node.line,
                    node.column,
                    format!("constructor '{}' should be TitleCase", callee),
                )];
            }
        }
        NodeData::Declaration {
            keyword: DeclKeyword::Const,
            name,
            init: InitKind::Literal,
        } => {
            if !is_screaming_snake_case(name) {
                return vec![RuleMatch::new(
                    node.line,
                    node.column,
                    format!("constant '{}' should be SCREAMING_SNAKE_CASE", name),
                )];
            }
        }
        _ => {}
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ScriptDocument;

    fn run(content: &str) -> Vec<RuleMatch> {
        let doc = ScriptDocument::parse(content).unwrap();
        let lines: Vec<String> = doc.source_lines().to_vec();
        let mut ctx = Context::new(&lines, Default::default());
        doc.tree()
            .iter()
            .flat_map(|(_, n)| check(n, &mut ctx))
            .collect()
    }

    #[test]
    fn test_lowercase_constructor_fires() {
        let matches = run("var w = new widget();\n");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].message.contains("'widget'"));
    }

    #[test]
    fn test_title_case_constructor_is_clean() {
        assert!(run("var w = new Widget();\n").is_empty());
    }

    #[test]
    fn test_snake_constructor_fires() {
        let matches = run("var w = new My_Widget();\n");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_lowercase_literal_const_fires() {
        let matches = run("const maxRetries = 3;\n");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].message.contains("SCREAMING_SNAKE_CASE"));
    }

    #[test]
    fn test_screaming_const_is_clean() {
        assert!(run("const MAX_RETRIES = 3;\n").is_empty());
    }

    #[test]
    fn test_non_literal_const_is_exempt() {
        assert!(run("const handler = makeHandler();\n").is_empty());
    }

    #[test]
    fn test_var_literal_is_exempt() {
        assert!(run("var count = 3;\n").is_empty());
    }

    #[test]
    fn test_member_chain_checks_final_segment() {
        assert!(run("var x = new lib.Widget();\n").is_empty());
        assert_eq!(run("var x = new lib.widget();\n").len(), 1);
    }

    #[test]
    fn test_is_title_case() {
        assert!(is_title_case("Widget"));
        assert!(is_title_case("XmlReader"));
        assert!(!is_title_case("widget"));
        assert!(!is_title_case("WIDGET"));
        assert!(!is_title_case("My_Widget"));
    }

    #[test]
    fn test_is_screaming_snake_case() {
        assert!(is_screaming_snake_case("MAX_RETRIES"));
        assert!(is_screaming_snake_case("TIMEOUT"));
        assert!(is_screaming_snake_case("HTTP2_PORT"));
        assert!(!is_screaming_snake_case("maxRetries"));
        assert!(!is_screaming_snake_case("Max_Retries"));
        assert!(!is_screaming_snake_case("_PRIVATE"));
    }
}
