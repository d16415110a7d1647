//! Fix command implementation.

use anyhow::{Context, Result};
use sqlstyle_core::LinterError;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Runs the fix command.
pub fn run(
    path: &Path,
    check: bool,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let linter = super::build_linter(path, rules_filter, exclude, config)?;
    let files = linter.files().context("Failed to discover SQL files")?;

    tracing::info!("Fixing {} file(s) with {} rules", files.len(), linter.rule_count());

    let mut changed_files = 0;
    let mut applied = 0;
    let mut remaining = 0;

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let outcome = match linter.fix_source(file, &content) {
            Ok(outcome) => outcome,
            Err(e @ LinterError::Parse { .. }) => {
                tracing::warn!("{e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        remaining += outcome.remaining.len();
        if !outcome.changed {
            continue;
        }

        changed_files += 1;
        applied += outcome.total_applied();

        if check {
            println!(
                "would fix {} ({} fix(es))",
                file.display(),
                outcome.total_applied()
            );
        } else {
            std::fs::write(file, &outcome.fixed_sql)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("fixed {} ({} fix(es))", file.display(), outcome.total_applied());
        }
    }

    let verb = if check { "Would apply" } else { "Applied" };
    println!(
        "\n{verb} {applied} fix(es) in {changed_files} file(s); {remaining} violation(s) need manual attention"
    );

    if check && changed_files > 0 {
        std::process::exit(1);
    }

    Ok(())
}
