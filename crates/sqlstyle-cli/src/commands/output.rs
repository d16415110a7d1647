//! Shared output formatting for lint results.

use anyhow::{Context, Result};
use miette::{NamedSource, Report};
use sqlstyle_core::{LintResult, Severity, ViolationDiagnostic};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is the lint root that violation paths are relative to.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => return print_pretty(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{}:{}:{} {} {} ({})",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            paint(violation.severity),
            violation.code,
            violation.rule,
        );
        println!("  {}", violation.message);
        if let Some(fix) = &violation.fix {
            println!("  = help: {}", fix.help());
        }
        println!();
    }

    print_summary(result);
}

fn paint(severity: Severity) -> String {
    let color = match severity {
        Severity::Error => "31",
        Severity::Warning => "33",
        Severity::Info => "34",
    };
    format!("\x1b[{color}m{severity}\x1b[0m")
}

fn print_summary(result: &LintResult) {
    for skipped in &result.files_skipped {
        println!("skipped {} (parse error)", skipped.display());
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    let infos = result.count(Severity::Info);

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );

    let fixable = result.fixable_count();
    if fixable > 0 {
        println!("{fixable} violation(s) can be fixed with `sqlstyle fix`");
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, root: &Path) -> Result<()> {
    for violation in &result.violations {
        let file = &violation.location.file;
        let path = if root.is_file() {
            root.to_path_buf()
        } else {
            root.join(file)
        };
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let report = Report::new(ViolationDiagnostic::from(violation))
            .with_source_code(NamedSource::new(file.display().to_string(), source));
        println!("{report:?}");
    }

    print_summary(result);
    Ok(())
}
