//! Rule registry
//!
//! An explicitly constructed, immutable set of rules. Built once at startup,
//! then shared read-only across concurrent file evaluations.

use crate::rule::Rule;
use crate::tree::NodeKind;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Error registering rules
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate rule id '{0}'")]
    DuplicateRule(String),
}

/// Holds the registered rules and the kind->rules dispatch index
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    ids: HashSet<String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a rule list, rejecting duplicates
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// Register a rule; fails if the id is already taken
    pub fn register(&mut self, rule: Rule) -> Result<(), RegistryError> {
        if !self.ids.insert(rule.id.clone()) {
            return Err(RegistryError::DuplicateRule(rule.id));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// All registered rules, in registration order
    pub fn all(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build the kind->rule-indices dispatch index. Built once per run and
    /// reused for every file.
    pub fn kind_index(&self) -> HashMap<NodeKind, Vec<usize>> {
        let mut index: HashMap<NodeKind, Vec<usize>> = HashMap::new();
        for (i, rule) in self.rules.iter().enumerate() {
            for kind in rule.kinds {
                index.entry(*kind).or_default().push(i);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::rule::RuleMatch;
    use crate::tree::SyntaxNode;

    fn noop(_node: &SyntaxNode, _ctx: &mut Context) -> Vec<RuleMatch> {
        Vec::new()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule::new("first", &[NodeKind::StringLiteral], noop))
            .unwrap();
        registry
            .register(Rule::new("second", &[NodeKind::BraceOpen], noop))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("first"));
        assert!(registry.get("second").is_some());
        assert!(registry.get("third").is_none());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let mut registry = RuleRegistry::new();
        registry
            .register(Rule::new("dup", &[NodeKind::StringLiteral], noop))
            .unwrap();
        let err = registry
            .register(Rule::new("dup", &[NodeKind::BraceOpen], noop))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRule(id) if id == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_kind_index() {
        let registry = RuleRegistry::from_rules(vec![
            Rule::new("strings", &[NodeKind::StringLiteral], noop),
            Rule::new("braces", &[NodeKind::BraceOpen], noop),
            Rule::new(
                "both",
                &[NodeKind::StringLiteral, NodeKind::BraceOpen],
                noop,
            ),
        ])
        .unwrap();

        let index = registry.kind_index();
        assert_eq!(index[&NodeKind::StringLiteral], vec![0, 2]);
        assert_eq!(index[&NodeKind::BraceOpen], vec![1, 2]);
        assert!(!index.contains_key(&NodeKind::Program));
    }
}
