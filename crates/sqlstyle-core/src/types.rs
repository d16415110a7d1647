//! Reportable results of a lint run.
//!
//! Rules speak in tree nodes ([`RuleViolation`](crate::RuleViolation));
//! everything here is plain data derived from those nodes so it can be
//! printed, serialized to JSON or rendered as a `miette` diagnostic
//! without keeping the tree alive.

use crate::tree::SyntaxNode;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never fails a run on its own.
    Info,
    /// Style problem that should be addressed.
    Warning,
    /// Style problem that must be addressed.
    Error,
}

impl Severity {
    /// Lower-case name, as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The source span of a violation's anchor node.
///
/// `line`, `column` and `offset` are those of the anchor's
/// [`PositionMarker`](crate::PositionMarker); `length` is the byte length
/// of its raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the lint root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset of the anchor in the file.
    pub offset: usize,
    /// Byte length of the anchor's text.
    pub length: usize,
}

impl Location {
    /// Locates `node` in `file`.
    #[must_use]
    pub fn of_node(file: &Path, node: &SyntaxNode) -> Self {
        let position = node.position();
        Self {
            file: file.to_path_buf(),
            line: position.line,
            column: position.column,
            offset: position.offset,
            length: node.raw().len(),
        }
    }

    /// Byte span for diagnostics.
    #[must_use]
    pub fn span(&self) -> SourceSpan {
        SourceSpan::from((self.offset, self.length))
    }
}

/// What `sqlstyle fix` would do about a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixPreview {
    /// The fix only touches the anchor; this is its text before and after.
    Rewrite {
        /// Anchor text as found.
        original: String,
        /// Anchor text once fixed.
        fixed: String,
    },
    /// The fix edits nodes outside the anchor, so there is no local preview.
    Elsewhere,
}

impl FixPreview {
    /// One-line help text for the fix.
    #[must_use]
    pub fn help(&self) -> String {
        match self {
            Self::Rewrite { original, fixed } => {
                format!("replace `{}` with `{fixed}`", original.trim())
            }
            Self::Elsewhere => "fixable with `sqlstyle fix`".to_string(),
        }
    }
}

/// A lint violation ready for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "L033").
    pub code: String,
    /// Rule name (e.g., "union-qualifier").
    pub rule: String,
    /// Severity after configuration overrides.
    pub severity: Severity,
    /// Location of the anchor node.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Present when the rule supplied a fix.
    pub fix: Option<FixPreview>,
}

impl Violation {
    /// Creates a violation without a fix.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            fix: None,
        }
    }

    /// Attaches a fix preview.
    #[must_use]
    pub fn with_fix(mut self, fix: FixPreview) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns true if `sqlstyle fix` can correct this violation.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// The fixed anchor text, when the fix stays inside the anchor.
    #[must_use]
    pub fn fixed_text(&self) -> Option<&str> {
        match &self.fix {
            Some(FixPreview::Rewrite { fixed, .. }) => Some(fixed),
            _ => None,
        }
    }
}

/// `file:line:column: severity [code] message`
impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A violation as a miette diagnostic, labelled on the anchor's span.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: String,
    message: String,
    #[help]
    help: Option<String>,
    #[label("{rule} ({severity})")]
    span: SourceSpan,
    rule: String,
    severity: Severity,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            code: v.code.clone(),
            message: v.message.clone(),
            help: v.fix.as_ref().map(FixPreview::help),
            span: v.location.span(),
            rule: v.rule.clone(),
            severity: v.severity,
        }
    }
}

/// Result of linting a set of files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Violations, grouped by file in discovery order.
    pub violations: Vec<Violation>,
    /// Number of files parsed and linted.
    pub files_checked: usize,
    /// Files left out because they failed to parse.
    pub files_skipped: Vec<PathBuf>,
}

impl LintResult {
    /// Number of violations at exactly `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Number of violations `sqlstyle fix` can correct.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fixable()).count()
    }

    /// Checks if any violation is at or above `threshold`.
    #[must_use]
    pub fn has_violations_at(&self, threshold: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn union_node(sql: &str) -> SyntaxNode {
        let root = parse(sql).unwrap();
        let mut found = None;
        root.walk(|node, _| {
            if found.is_none() && node.kind() == crate::NodeKind::SetOperator {
                found = Some(node.clone());
            }
        });
        found.unwrap()
    }

    fn violation(severity: Severity) -> Violation {
        let node = union_node("SELECT 1\n  UNION SELECT 2");
        Violation::new(
            "L033",
            "union-qualifier",
            severity,
            Location::of_node(Path::new("queries/report.sql"), &node),
            "UNION without DISTINCT or ALL",
        )
    }

    #[test]
    fn location_comes_from_node_position() {
        let loc = violation(Severity::Warning).location;
        assert_eq!((loc.line, loc.column, loc.offset, loc.length), (2, 3, 11, 5));
        assert_eq!(loc.span(), SourceSpan::from((11, 5)));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(
            violation(Severity::Error).to_string(),
            "queries/report.sql:2:3: error [L033] UNION without DISTINCT or ALL"
        );
    }

    #[test]
    fn fix_preview_drives_fixable_and_help() {
        let plain = violation(Severity::Warning);
        assert!(!plain.is_fixable());
        assert_eq!(plain.fixed_text(), None);

        let rewrite = plain.clone().with_fix(FixPreview::Rewrite {
            original: "UNION".to_string(),
            fixed: "UNION DISTINCT".to_string(),
        });
        assert!(rewrite.is_fixable());
        assert_eq!(rewrite.fixed_text(), Some("UNION DISTINCT"));

        let diag = ViolationDiagnostic::from(&rewrite);
        assert_eq!(
            diag.help.as_deref(),
            Some("replace `UNION` with `UNION DISTINCT`")
        );

        let elsewhere = plain.with_fix(FixPreview::Elsewhere);
        assert!(elsewhere.is_fixable());
        assert_eq!(elsewhere.fixed_text(), None);
    }

    #[test]
    fn threshold_and_counts() {
        let mut result = LintResult::default();
        result.violations.push(violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.count(Severity::Error), 0);
        assert_eq!(result.fixable_count(), 0);
    }
}
