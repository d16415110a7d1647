//! Rule to require an explicit `DISTINCT` or `ALL` after `UNION`.
//!
//! # Rationale
//!
//! A bare `UNION` silently removes duplicate rows. Writing `UNION DISTINCT`
//! or `UNION ALL` makes the intended behavior visible.
//!
//! ```sql
//! -- BAD
//! SELECT a, b FROM table_1 UNION SELECT a, b FROM table_2
//!
//! -- GOOD
//! SELECT a, b FROM table_1 UNION DISTINCT SELECT a, b FROM table_2
//! ```
//!
//! # Fix
//!
//! The bare `UNION` keyword is replaced with `UNION DISTINCT`, which keeps
//! the query's meaning. Keywords are always written in upper case.
//!
//! # Suppression
//!
//! - `-- noqa: L033` at the end of the line holding `UNION`

use sqlstyle_core::{
    Edit, LintOutcome, NodeKind, Rule, RuleViolation, Severity, SyntaxNode,
};

/// Rule code for union-qualifier.
pub const CODE: &str = "L033";

/// Rule name for union-qualifier.
pub const NAME: &str = "union-qualifier";

/// Requires `UNION` to be qualified with `DISTINCT` or `ALL`.
#[derive(Debug, Clone)]
pub struct UnionQualifier {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UnionQualifier {
    fn default() -> Self {
        Self::new()
    }
}

impl UnionQualifier {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for UnionQualifier {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "UNION [DISTINCT|ALL] is preferred over just UNION"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, node: &SyntaxNode, _ancestors: &[SyntaxNode]) -> LintOutcome {
        match node.kind() {
            NodeKind::SetOperator => check_set_operator(node),
            NodeKind::File
            | NodeKind::Statement
            | NodeKind::Keyword
            | NodeKind::Identifier
            | NodeKind::Literal
            | NodeKind::Symbol
            | NodeKind::Whitespace
            | NodeKind::Newline
            | NodeKind::Comment => LintOutcome::Compliant,
        }
    }
}

fn check_set_operator(node: &SyntaxNode) -> LintOutcome {
    let raw = node.raw_upper();
    if !raw.contains("UNION") || raw.contains("ALL") || raw.contains("DISTINCT") {
        return LintOutcome::Compliant;
    }

    // The fix rewrites the operator keyword itself; anything else in that
    // position cannot be fixed safely.
    let Some(union) = node.first_child() else {
        return LintOutcome::Compliant;
    };
    if union.kind() != NodeKind::Keyword || union.raw_upper() != "UNION" {
        tracing::debug!("Set operator {:?} does not start with UNION", node.raw());
        return LintOutcome::Compliant;
    }

    let position = node.position();
    let replacement = vec![
        SyntaxNode::keyword("UNION", position),
        SyntaxNode::whitespace(" ", position),
        SyntaxNode::keyword("DISTINCT", position),
    ];

    RuleViolation::new(node.clone())
        .with_fix(Edit::replace(union.clone(), replacement))
        .into()
}
