//! Lint command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the lint command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let fail_on = config.fail_on();
    let linter = super::build_linter(path, rules_filter, exclude, config)?;

    tracing::info!("Linting {:?} with {} rules", path, linter.rule_count());

    let result = linter.lint_paths().context("Lint failed")?;

    super::output::print(&result, format, linter.root())?;

    // Exit with error code if anything reaches the failure threshold
    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}
