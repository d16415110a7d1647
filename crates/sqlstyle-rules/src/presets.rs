//! Rule presets for common configurations.

use crate::UnionQualifier;
use sqlstyle_core::RuleBox;

/// Preset configurations for sqlstyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    #[default]
    Recommended,
    /// Every available rule.
    All,
}

impl Preset {
    /// Looks a preset up by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::All => all_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `union-qualifier` (L033) - Requires `UNION DISTINCT` or `UNION ALL`
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![Box::new(UnionQualifier::new())]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(UnionQualifier::new())]
}

/// Finds a rule by name or code (case-insensitive).
#[must_use]
pub fn find_rule(name_or_code: &str) -> Option<RuleBox> {
    let wanted = name_or_code.trim();
    all_rules().into_iter().find(|rule| {
        rule.name().eq_ignore_ascii_case(wanted) || rule.code().eq_ignore_ascii_case(wanted)
    })
}
