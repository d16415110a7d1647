//! Linter that walks syntax trees, runs rules and applies their fixes.

use crate::config::{Config, ConfigError};
use crate::context::FileContext;
use crate::fix::apply_edits;
use crate::noqa::NoqaIndex;
use crate::parser::ParseError;
use crate::rule::{LintOutcome, Rule, RuleBox, RuleViolation};
use crate::tree::SyntaxNode;
use crate::types::{FixPreview, LintResult, Violation};

use std::collections::{BTreeMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extension of the files the linter discovers.
const SQL_EXTENSION: &str = "sql";

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a SQL file.
    #[error("Parse error in {path}: {source}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        source: ParseError,
    },

    /// Error walking the directory tree.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to lint.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or
    /// an exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Linter, LinterError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.linter.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.linter.exclude.clone());
        }

        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Linter {
            root,
            rules: self.rules,
            exclude,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Result of fixing one source text.
#[derive(Debug, Clone)]
#[must_use]
pub struct FixOutcome {
    /// The fixed SQL text.
    pub fixed_sql: String,
    /// Whether the text differs from the input.
    pub changed: bool,
    /// Number of lint-and-fix passes that applied at least one fix.
    pub passes: usize,
    /// Fixes applied, by rule code.
    pub applied: BTreeMap<String, usize>,
    /// Violations left in the fixed text.
    pub remaining: Vec<Violation>,
}

impl FixOutcome {
    /// Returns the total number of fixes applied.
    #[must_use]
    pub fn total_applied(&self) -> usize {
        self.applied.values().sum()
    }
}

/// A rule violation together with the rule that raised it.
struct Finding<'r> {
    rule: &'r dyn Rule,
    violation: RuleViolation,
}

/// The main linter.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the root being linted.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lints every SQL file under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// fails to parse and `fail_on_parse_error` is set.
    pub fn lint_paths(&self) -> Result<LintResult, LinterError> {
        info!("Starting lint at {:?}", self.root);

        let mut result = LintResult::default();
        let files = self.files()?;

        info!("Found {} files to lint", files.len());

        for path in &files {
            let content = std::fs::read_to_string(path)?;
            match self.lint_source(path, &content) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(LinterError::Parse { path, source }) => {
                    warn!("Failed to parse {}: {}", path.display(), source);
                    if self.fail_on_parse_error {
                        return Err(LinterError::Parse { path, source });
                    }
                    result.files_skipped.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Lint complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Lints a single source text.
    ///
    /// `path` is only used for reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if the text fails to parse.
    pub fn lint_source(&self, path: &Path, sql: &str) -> Result<Vec<Violation>, LinterError> {
        debug!("Linting: {}", path.display());

        let ctx = FileContext::new(path, sql, &self.root);
        let tree = ctx.parse()?;

        Ok(self.report(&ctx, &tree))
    }

    /// Repeatedly lints and fixes a source text.
    ///
    /// Each pass applies the fixes of every fixable violation whose edit
    /// targets do not overlap those of a fix already taken in that pass.
    /// Passes stop when nothing is left to fix, when the text returns to a
    /// state seen before, or after `max_fix_passes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text fails to parse.
    pub fn fix_source(&self, path: &Path, sql: &str) -> Result<FixOutcome, LinterError> {
        debug!("Fixing: {}", path.display());

        let ctx = FileContext::new(path, sql, &self.root);
        let mut tree = ctx.parse()?;

        let mut applied: BTreeMap<String, usize> = BTreeMap::new();
        let mut seen: HashSet<String> = HashSet::from([ctx.content().to_string()]);
        let mut passes = 0;

        for pass in 1..=self.config.linter.max_fix_passes {
            let noqa = NoqaIndex::from_tree(&tree);
            let findings = self.evaluate(&tree, &noqa);
            let (fixed, count) = apply_findings(&tree, &findings, &mut applied);
            if count == 0 {
                break;
            }

            debug!("Pass {pass}: applied {count} fix(es) to {}", ctx.path().display());
            passes = pass;
            tree = fixed;

            if !seen.insert(tree.raw().to_string()) {
                warn!(
                    "Fixes for {} loop back to an earlier state; stopping after pass {pass}",
                    ctx.path().display()
                );
                break;
            }
        }

        let remaining = self.report(&ctx, &tree);
        let fixed_sql = tree.raw().to_string();

        Ok(FixOutcome {
            changed: fixed_sql != ctx.content(),
            fixed_sql,
            passes,
            applied,
            remaining,
        })
    }

    /// Discovers the SQL files to lint.
    ///
    /// If the root is a file, it is the only file linted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails.
    pub fn files(&self) -> Result<Vec<PathBuf>, LinterError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.linter.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SQL_EXTENSION)
            {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        self.exclude.iter().any(|pattern| {
            if pattern.matches_path(path) || pattern.matches_path(relative) {
                return true;
            }

            // Also check as substring for patterns like "**/generated/**"
            let normalized = pattern.as_str().replace("**", "");
            !normalized.is_empty() && path.to_string_lossy().contains(&normalized)
        })
    }

    /// Runs every enabled rule over the tree and converts the findings
    /// into reportable violations, sorted by position.
    fn report(&self, ctx: &FileContext<'_>, tree: &SyntaxNode) -> Vec<Violation> {
        let noqa = NoqaIndex::from_tree(tree);
        let mut violations: Vec<Violation> = self
            .evaluate(tree, &noqa)
            .into_iter()
            .map(|finding| self.to_violation(ctx, finding))
            .collect();

        violations.sort_by(|a, b| {
            a.location
                .line
                .cmp(&b.location.line)
                .then(a.location.column.cmp(&b.location.column))
                .then(a.code.cmp(&b.code))
        });
        violations
    }

    /// Walks the tree in pre-order and evaluates every enabled rule at
    /// every node. Findings suppressed by `noqa` are dropped.
    fn evaluate<'r>(&'r self, tree: &SyntaxNode, noqa: &NoqaIndex) -> Vec<Finding<'r>> {
        let rules: Vec<&dyn Rule> = self
            .rules
            .iter()
            .map(|rule| &**rule)
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name(), rule.code());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        let mut findings = Vec::new();
        tree.walk(|node, ancestors| {
            for &rule in &rules {
                let Some(violation) = evaluate_isolated(rule, node, ancestors).into_violation()
                else {
                    continue;
                };

                let line = violation.anchor.position().line;
                if noqa.check(line, rule.code(), rule.name()).is_allowed() {
                    debug!("Suppressed {} on line {line} by noqa", rule.code());
                    continue;
                }
                findings.push(Finding { rule, violation });
            }
        });
        findings
    }

    fn to_violation(&self, ctx: &FileContext<'_>, finding: Finding<'_>) -> Violation {
        let Finding { rule, violation } = finding;
        let anchor = &violation.anchor;

        let severity = self
            .config
            .rule_severity(rule.name(), rule.code())
            .unwrap_or_else(|| rule.default_severity());
        let location = ctx.locate(anchor);
        let message = violation
            .description
            .clone()
            .unwrap_or_else(|| rule.description().to_string());

        let mut reported = Violation::new(rule.code(), rule.name(), severity, location, message);

        if violation.is_fixable() {
            let preview = match apply_edits(anchor, &violation.fixes) {
                Ok(fixed) => FixPreview::Rewrite {
                    original: anchor.raw().to_string(),
                    fixed: fixed.raw().to_string(),
                },
                Err(e) => {
                    debug!("Fix for {} reaches outside its anchor: {e}", rule.code());
                    FixPreview::Elsewhere
                }
            };
            reported = reported.with_fix(preview);
        }

        reported
    }
}

/// Evaluates one rule at one node. A panicking rule is treated as
/// reporting no violation so that the walk continues.
fn evaluate_isolated(rule: &dyn Rule, node: &SyntaxNode, ancestors: &[SyntaxNode]) -> LintOutcome {
    catch_unwind(AssertUnwindSafe(|| rule.evaluate(node, ancestors))).unwrap_or_else(|_| {
        warn!(
            "Rule {} panicked at {}:{}; ignoring",
            rule.code(),
            node.position().line,
            node.position().column
        );
        LintOutcome::Compliant
    })
}

/// Applies the fixes of non-overlapping findings, one finding at a time.
///
/// Returns the new tree and the number of findings fixed.
fn apply_findings(
    tree: &SyntaxNode,
    findings: &[Finding<'_>],
    applied: &mut BTreeMap<String, usize>,
) -> (SyntaxNode, usize) {
    let mut current = tree.clone();
    let mut claimed: Vec<SyntaxNode> = Vec::new();
    let mut count = 0;

    for finding in findings.iter().filter(|f| f.violation.is_fixable()) {
        let fixes = &finding.violation.fixes;
        let overlaps = fixes.iter().any(|edit| {
            claimed
                .iter()
                .any(|c| c.contains(&edit.target) || edit.target.contains(c))
        });
        if overlaps {
            debug!("Deferring overlapping fix from {}", finding.rule.code());
            continue;
        }

        match apply_edits(&current, fixes) {
            Ok(next) => {
                current = next;
                claimed.extend(fixes.iter().map(|e| e.target.clone()));
                *applied.entry(finding.rule.code().to_string()).or_default() += 1;
                count += 1;
            }
            Err(e) => warn!("Skipping fix from {}: {e}", finding.rule.code()),
        }
    }

    (current, count)
}
