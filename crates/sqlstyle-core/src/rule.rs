//! Rule trait and the outcome types rules return.

use crate::tree::SyntaxNode;
use crate::types::Severity;

/// A style rule evaluated at every node of a syntax tree.
///
/// The linter walks the tree in pre-order and calls [`Rule::evaluate`] once
/// per node. Evaluation must depend only on the node, its ancestors and the
/// rule's own settings: no caching between calls, no interior mutability.
/// A node the rule cannot classify is reported as compliant.
///
/// # Example
///
/// ```ignore
/// use sqlstyle_core::{LintOutcome, NodeKind, Rule, RuleViolation, SyntaxNode};
///
/// pub struct NoSelectStar;
///
/// impl Rule for NoSelectStar {
///     fn name(&self) -> &'static str { "no-select-star" }
///     fn code(&self) -> &'static str { "L044" }
///
///     fn evaluate(&self, node: &SyntaxNode, ancestors: &[SyntaxNode]) -> LintOutcome {
///         let after_select = ancestors.last().is_some_and(|p| p.kind() == NodeKind::Statement);
///         if node.kind() == NodeKind::Symbol && node.raw() == "*" && after_select {
///             RuleViolation::new(node.clone()).into()
///         } else {
///             LintOutcome::Compliant
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "union-qualifier").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "L033").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Evaluates a single node.
    ///
    /// # Arguments
    ///
    /// * `node` - The node being checked
    /// * `ancestors` - Nodes from the tree root down to `node`'s parent
    fn evaluate(&self, node: &SyntaxNode, ancestors: &[SyntaxNode]) -> LintOutcome;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Result of evaluating a rule at one node.
#[derive(Debug, Clone, Default)]
#[must_use]
pub enum LintOutcome {
    /// The node complies with the rule.
    #[default]
    Compliant,
    /// The node violates the rule.
    Violation(RuleViolation),
}

impl LintOutcome {
    /// Returns true if no violation was found.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::Compliant)
    }

    /// Returns the violation, if any.
    #[must_use]
    pub fn violation(&self) -> Option<&RuleViolation> {
        match self {
            Self::Compliant => None,
            Self::Violation(v) => Some(v),
        }
    }

    /// Converts into the violation, if any.
    #[must_use]
    pub fn into_violation(self) -> Option<RuleViolation> {
        match self {
            Self::Compliant => None,
            Self::Violation(v) => Some(v),
        }
    }
}

impl From<RuleViolation> for LintOutcome {
    fn from(violation: RuleViolation) -> Self {
        Self::Violation(violation)
    }
}

impl From<Option<RuleViolation>> for LintOutcome {
    fn from(violation: Option<RuleViolation>) -> Self {
        violation.map_or(Self::Compliant, Self::Violation)
    }
}

/// A violation detected by a rule, with an optional fix.
#[derive(Debug, Clone)]
pub struct RuleViolation {
    /// Node to report the violation at.
    pub anchor: SyntaxNode,
    /// Edits that fix the violation, applied in order. Empty when the
    /// violation cannot be fixed automatically.
    pub fixes: Vec<Edit>,
    /// Message overriding the rule description.
    pub description: Option<String>,
}

impl RuleViolation {
    /// Creates a lint-only violation anchored at `anchor`.
    #[must_use]
    pub fn new(anchor: SyntaxNode) -> Self {
        Self {
            anchor,
            fixes: Vec::new(),
            description: None,
        }
    }

    /// Adds a fix edit.
    #[must_use]
    pub fn with_fix(mut self, edit: Edit) -> Self {
        self.fixes.push(edit);
        self
    }

    /// Sets a custom message.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if this violation carries a fix.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Kind of structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Replace the target with the replacement nodes.
    Replace,
    /// Insert the replacement nodes immediately before the target.
    Insert,
    /// Remove the target.
    Delete,
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Insert => write!(f, "insert"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A single structural edit of the syntax tree.
///
/// `target` is matched by identity, so it must be a node of the tree the
/// rule was given, not a copy of one.
#[derive(Debug, Clone)]
pub struct Edit {
    /// What to do.
    pub kind: EditKind,
    /// Node the edit applies to.
    pub target: SyntaxNode,
    /// New nodes. Empty for [`EditKind::Delete`].
    pub replacement: Vec<SyntaxNode>,
}

impl Edit {
    /// Replaces `target` with `replacement`.
    #[must_use]
    pub fn replace(target: SyntaxNode, replacement: Vec<SyntaxNode>) -> Self {
        Self {
            kind: EditKind::Replace,
            target,
            replacement,
        }
    }

    /// Inserts `nodes` before `target`.
    #[must_use]
    pub fn insert_before(target: SyntaxNode, nodes: Vec<SyntaxNode>) -> Self {
        Self {
            kind: EditKind::Insert,
            target,
            replacement: nodes,
        }
    }

    /// Removes `target`.
    #[must_use]
    pub fn delete(target: SyntaxNode) -> Self {
        Self {
            kind: EditKind::Delete,
            target,
            replacement: Vec::new(),
        }
    }
}
