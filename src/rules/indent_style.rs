//! Consistent indentation unit
//!
//! Flags leading whitespace that mixes tabs and spaces, or that uses the
//! unit the project does not indent with. Blank lines and block-comment
//! continuation lines (leading `*`) are skipped.

use crate::config::IndentUnit;
use crate::context::Context;
use crate::rule::{Rule, RuleMatch};
use crate::tree::{NodeData, NodeKind, SyntaxNode};
use crate::violation::Severity;

pub fn rule() -> Rule {
    Rule::new("indent-style", &[NodeKind::Program], check)
        .with_severity(Severity::Error)
        .with_description("Indent with a single whitespace unit, consistently")
}

fn check(node: &SyntaxNode, ctx: &mut Context) -> Vec<RuleMatch> {
    if !matches!(node.data, NodeData::Program) {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (i, line) in ctx.source_lines.iter().enumerate() {
        let line_num = i + 1;
        let indent: &str = &line[..line.len() - line.trim_start().len()];
        let rest = line.trim_start();

        if rest.is_empty() || rest.starts_with('*') {
            continue;
        }

        let has_tab = indent.contains('\t');
        let has_space = indent.contains(' ');

        if has_tab && has_space {
            matches.push(RuleMatch::new(
                line_num,
                1,
                "indentation mixes tabs and spaces",
            ));
        } else if has_space && ctx.indent_unit == IndentUnit::Tabs {
            matches.push(RuleMatch::new(
                line_num,
                1,
                "indentation uses spaces where tabs are expected",
            ));
        } else if has_tab && ctx.indent_unit == IndentUnit::Spaces {
            matches.push(RuleMatch::new(
                line_num,
                1,
                "indentation uses tabs where spaces are expected",
            ));
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ScriptDocument;

    fn run_with(content: &str, unit: IndentUnit) -> Vec<RuleMatch> {
        let doc = ScriptDocument::parse(content).unwrap();
        let lines: Vec<String> = doc.source_lines().to_vec();
        let mut ctx = Context::new(&lines, unit);
        doc.tree()
            .iter()
            .flat_map(|(_, n)| check(n, &mut ctx))
            .collect()
    }

    fn run(content: &str) -> Vec<RuleMatch> {
        run_with(content, IndentUnit::Tabs)
    }

    #[test]
    fn test_tab_indent_is_clean() {
        assert!(run("if (x)\n{\n\twork();\n}\n").is_empty());
    }

    #[test]
    fn test_space_indent_fires_under_tabs() {
        let matches = run("if (x)\n{\n    work();\n}\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 3);
    }

    #[test]
    fn test_mixed_indent_fires() {
        let matches = run("if (x)\n{\n\t  work();\n}\n");
        assert_eq!(matches.len(), 1);
        assert!(matches[0].message.contains("mixes"));
    }

    #[test]
    fn test_tab_indent_fires_under_spaces() {
        let matches = run_with("if (x)\n{\n\twork();\n}\n", IndentUnit::Spaces);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_comment_continuation_is_skipped() {
        let content = "/*\n * continuation lines\n */\nvar a = 1;\n";
        assert!(run(content).is_empty());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(run("var a = 1;\n\n   \nvar b = 2;\n").is_empty());
    }
}
