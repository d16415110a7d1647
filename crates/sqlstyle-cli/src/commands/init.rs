//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# sqlstyle configuration

# Rule preset: "recommended" (default) or "all"
preset = "recommended"

# Severity at which `sqlstyle lint` exits with failure: "info", "warning" or "error"
fail_on = "error"

[linter]
# Root directory to lint (default: current directory)
# root = "./queries"

# Glob patterns to exclude from linting
exclude = [
    "**/target/**",
    "**/node_modules/**",
]

# Respect .gitignore files
respect_gitignore = true

# Lint-and-fix passes per file before `sqlstyle fix` gives up
max_fix_passes = 10

# Rule configurations, keyed by name or code
# Each rule can be enabled/disabled and have its severity overridden

[rules.union-qualifier]
enabled = true
# severity = "error"  # Override default severity

# Suppress a single line with a trailing comment:
#   SELECT a FROM t UNION SELECT a FROM u  -- noqa: L033
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure rules", config_path.display());
    println!("  2. Run: sqlstyle lint");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlstyle_core::{Config, Severity};

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.fail_on(), Severity::Error);
        assert!(config.is_rule_enabled("union-qualifier", "L033"));
        assert_eq!(config.linter.max_fix_passes, 10);
    }
}
