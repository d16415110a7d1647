//! Subcommand implementations.

pub mod fix;
pub mod init;
pub mod lint;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use sqlstyle_core::{Config, Linter, RuleBox};
use sqlstyle_rules::{find_rule, Preset};
use std::path::Path;

/// Builds a linter for `path` from the resolved configuration.
///
/// `rules_filter` is a comma-separated list of rule names or codes; when
/// absent, the configured preset (default: recommended) is used.
pub fn build_linter(
    path: &Path,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    config: Config,
) -> Result<Linter> {
    let rules = match rules_filter {
        Some(filter) => filter_rules(filter),
        None => preset_for(&config).rules(),
    };

    let mut builder = Linter::builder().root(path).config(config);
    for pattern in exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    builder.build().context("Failed to build linter")
}

fn preset_for(config: &Config) -> Preset {
    match config.preset.as_deref() {
        None => Preset::default(),
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown preset: {}, using recommended", name);
            Preset::default()
        }),
    }
}

fn filter_rules(filter: &str) -> Vec<RuleBox> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let rule = find_rule(name);
            if rule.is_none() {
                tracing::warn!("Unknown rule: {}", name);
            }
            rule
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_names_and_codes() {
        let rules = filter_rules("L033, union-qualifier,,nope");
        let codes: Vec<&str> = rules.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["L033", "L033"]);
    }

    #[test]
    fn unknown_preset_falls_back_to_recommended() {
        let config = Config::parse("preset = \"strict\"\n").unwrap();
        assert_eq!(preset_for(&config), Preset::Recommended);
    }
}
