//! Inline `noqa` suppression comments.
//!
//! A line comment suppresses violations anchored on the same line:
//! ```text
//! SELECT a FROM t UNION SELECT a FROM u -- noqa
//! SELECT a FROM t UNION SELECT a FROM u -- noqa: L033, other-rule
//! ```
//! Without a rule list every rule is suppressed. Rule codes and names are
//! matched case-insensitively.

use crate::tree::{NodeKind, SyntaxNode};
use std::collections::{HashMap, HashSet};

/// State of allowance for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowState {
    /// Rule is not allowed (default).
    Denied,
    /// Rule is explicitly allowed.
    Allowed,
}

impl AllowState {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

/// Parsed `noqa` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoqaDirective {
    /// Suppresses every rule.
    All,
    /// Suppresses the listed rules, stored upper case.
    Rules(HashSet<String>),
}

impl NoqaDirective {
    /// Parses a comment's text. Returns `None` if it is not a directive.
    #[must_use]
    pub fn parse(comment: &str) -> Option<Self> {
        let body = comment.trim().strip_prefix("--")?.trim();
        if !body.get(..4)?.eq_ignore_ascii_case("noqa") {
            return None;
        }

        let rest = body[4..].trim();
        if rest.is_empty() {
            return Some(Self::All);
        }

        let list = rest.strip_prefix(':')?;
        let rules: HashSet<String> = list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if rules.is_empty() {
            return Some(Self::All);
        }
        Some(Self::Rules(rules))
    }

    /// Returns whether this directive covers the rule.
    #[must_use]
    pub fn allows(&self, rule_code: &str, rule_name: &str) -> AllowState {
        let covered = match self {
            Self::All => true,
            Self::Rules(rules) => {
                rules.contains(&rule_code.to_uppercase()) || rules.contains(&rule_name.to_uppercase())
            }
        };
        if covered {
            AllowState::Allowed
        } else {
            AllowState::Denied
        }
    }
}

/// `noqa` directives of a parsed file, by line.
#[derive(Debug, Clone, Default)]
pub struct NoqaIndex {
    by_line: HashMap<usize, NoqaDirective>,
}

impl NoqaIndex {
    /// Collects the directives in the tree's line comments.
    #[must_use]
    pub fn from_tree(root: &SyntaxNode) -> Self {
        let mut by_line = HashMap::new();
        for leaf in root.leaves() {
            if leaf.kind() != NodeKind::Comment {
                continue;
            }
            if let Some(directive) = NoqaDirective::parse(leaf.raw()) {
                by_line.insert(leaf.position().line, directive);
            }
        }
        Self { by_line }
    }

    /// Returns true if there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Checks whether a violation of the rule on `line` is suppressed.
    #[must_use]
    pub fn check(&self, line: usize, rule_code: &str, rule_name: &str) -> AllowState {
        self.by_line
            .get(&line)
            .map_or(AllowState::Denied, |d| d.allows(rule_code, rule_name))
    }
}
