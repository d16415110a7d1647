//! Locating the configuration that applies to a SQL file or directory.
//!
//! SQL tends to live in nested folders (`queries/reports/daily.sql`) while
//! the configuration sits at the project root, so the project search walks
//! upwards from the linted path:
//!
//! 1. `--config` flag (explicit path)
//! 2. `sqlstyle.toml` or `.sqlstyle.toml` in the linted directory (for a
//!    file, its directory) or the nearest ancestor that has one. The search
//!    stops at the first directory containing `.git`.
//! 3. `$SQLSTYLE_CONFIG_DIR/config.toml` or `~/.sqlstyle/config.toml`
//! 4. Built-in defaults

use anyhow::{Context, Result};
use sqlstyle_core::Config;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order within a directory.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["sqlstyle.toml", ".sqlstyle.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Marker of a repository root; the project search does not go above it.
const REPOSITORY_MARKER: &str = ".git";

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the linted SQL or above it.
    Project {
        /// The config file.
        path: PathBuf,
        /// Directories between the linted path's directory and the config
        /// (0 when they are the same).
        levels_up: usize,
    },
    /// From the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project { path: p, .. } | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Says where the configuration came from, relative to the linted path.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Explicit(p) => format!("{} (--config)", p.display()),
            Self::Project { path, levels_up: 0 } => {
                format!("{} (next to the linted SQL)", path.display())
            }
            Self::Project { path, levels_up: 1 } => {
                format!("{} (1 directory above the linted SQL)", path.display())
            }
            Self::Project { path, levels_up } => format!(
                "{} ({levels_up} directories above the linted SQL)",
                path.display()
            ),
            Self::Global(p) => format!("{} (global)", p.display()),
            Self::Default => "built-in defaults".to_string(),
        }
    }

    /// Loads the configuration this source points to.
    pub fn load(&self) -> Result<Config> {
        tracing::info!("Using config: {}", self.describe());
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the configuration for `target`, a SQL file or directory.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    let target = target
        .canonicalize()
        .unwrap_or_else(|_| target.to_path_buf());
    resolve_inner(&target, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    target: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let start = if target.is_file() {
        target.parent().unwrap_or(target)
    } else {
        target
    };
    if let Some(source) = find_project_config(start) {
        return source;
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

fn find_project_config(start: &Path) -> Option<ConfigSource> {
    for (levels_up, dir) in start.ancestors().enumerate() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if let Some(path) = found {
            tracing::debug!("Found project config: {}", path.display());
            return Some(ConfigSource::Project { path, levels_up });
        }
        if dir.join(REPOSITORY_MARKER).exists() {
            tracing::debug!("No project config up to repository root {}", dir.display());
            break;
        }
    }
    None
}

/// Returns the global config directory path.
///
/// Resolution: `$SQLSTYLE_CONFIG_DIR` > `~/.sqlstyle/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SQLSTYLE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".sqlstyle"))
}
