//! Configuration types for sqlstyle.

use crate::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Default number of lint-and-fix passes before giving up.
pub const DEFAULT_MAX_FIX_PASSES: usize = 10;

/// Top-level configuration for sqlstyle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "all").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold at which `lint` exits with failure
    /// (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Linter configuration.
    #[serde(default)]
    pub linter: LinterConfig,

    /// Per-rule configurations, keyed by rule name or code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or two `[rules.*]` tables
    /// name the same rule in different case.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let mut seen = HashSet::new();
        for key in config.rules.keys() {
            if !seen.insert(key.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateRule { key: key.clone() });
            }
        }
        Ok(config)
    }

    /// Checks if a rule is enabled. Rules are enabled unless configured
    /// otherwise.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str, rule_code: &str) -> bool {
        self.rule(rule_name, rule_code)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str, rule_code: &str) -> Option<Severity> {
        self.rule(rule_name, rule_code).and_then(|c| c.severity)
    }

    /// Returns the failure threshold.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }

    /// Looks a rule up by name first, then by code, ignoring case.
    fn rule(&self, rule_name: &str, rule_code: &str) -> Option<&RuleConfig> {
        let lookup = |wanted: &str| {
            self.rules
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
                .map(|(_, rule)| rule)
        };
        lookup(rule_name).or_else(|| lookup(rule_code))
    }
}

/// Linter-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Root directory to lint (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from linting.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of lint-and-fix passes per file.
    #[serde(default = "default_max_fix_passes")]
    pub max_fix_passes: usize,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            respect_gitignore: true,
            max_fix_passes: DEFAULT_MAX_FIX_PASSES,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_max_fix_passes() -> usize {
    DEFAULT_MAX_FIX_PASSES
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Two `[rules.*]` tables differ only in case.
    #[error("Rule `{key}` is configured more than once")]
    DuplicateRule {
        /// One of the colliding keys.
        key: String,
    },
}
