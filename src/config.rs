//! Settings management
//!
//! Settings come from two optional TOML files: the user-level
//! `~/.config/stepsync/config.toml` and the repository-local `.stepsync.toml`.
//! The local file is overlaid key by key on the user file; anything left
//! unset falls back to the defaults below. Command-line flags override the
//! values they name after loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepsError};
use crate::paths;

/// Default branch created by `togit`
const DEFAULT_BRANCH: &str = "steps";

/// Default branch consulted for Tier-2 message lookup
const DEFAULT_REFERENCE_BRANCH: &str = "main";

/// Default bound on branch-name attempts
const DEFAULT_MAX_BRANCH_ATTEMPTS: usize = 1000;

/// Tool settings, passed by reference into every component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Step folder used when none is given, relative to the repository
    pub steps_folder: String,
    /// Per-step metadata file name
    pub metadata_file: String,
    /// Branch name requested by `togit`
    pub default_branch: String,
    /// Branch searched for step messages when a metadata file is unusable
    pub reference_branch: String,
    /// Upper bound on candidate names tried by the branch allocator
    pub max_branch_attempts: usize,
    /// External tool settings
    pub git: GitSettings,
}

/// How external tools are invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// git executable
    pub program: String,
    /// tar executable, used to unpack `git archive` output
    pub tar_program: String,
    /// Committer name passed as `-c user.name=...`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Committer email passed as `-c user.email=...`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only (`--quiet`)
    Quiet,
    /// Progress messages (default)
    #[default]
    Normal,
    /// Every external command (`--debug`)
    Debug,
}

impl Verbosity {
    /// Pick the verbosity from the global flags; `--quiet` wins over `--debug`
    #[must_use]
    pub const fn from_flags(debug: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if debug {
            Self::Debug
        } else {
            Self::Normal
        }
    }

    /// Default `env_logger` filter for this verbosity
    #[must_use]
    pub const fn filter(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Debug => "debug",
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steps_folder: paths::DEFAULT_STEPS_FOLDER.to_string(),
            metadata_file: paths::DEFAULT_METADATA_FILE.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            reference_branch: DEFAULT_REFERENCE_BRANCH.to_string(),
            max_branch_attempts: DEFAULT_MAX_BRANCH_ATTEMPTS,
            git: GitSettings::default(),
        }
    }
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            tar_program: "tar".to_string(),
            user_name: None,
            user_email: None,
        }
    }
}

impl Settings {
    /// Load settings for a repository: user file, then `.stepsync.toml`
    pub fn load(repo: &Path) -> Result<Self> {
        let global = paths::global_config();
        let local = paths::local_config(repo);
        Self::load_from(global.as_deref(), Some(&local))
    }

    /// Load settings from explicit files; missing files are skipped
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self> {
        let mut merged = toml::Table::new();
        for path in [global, local].into_iter().flatten() {
            if let Some(table) = read_table(path)? {
                log::debug!("loaded settings from {}", path.display());
                overlay(&mut merged, table);
            }
        }
        let origin = local.or(global).unwrap_or_else(|| Path::new("<settings>"));
        let text = toml::to_string(&merged).map_err(|e| StepsError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, origin)
    }

    /// Parse a settings document; `origin` is only used in error messages
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| StepsError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn read_table(path: &Path) -> Result<Option<toml::Table>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| crate::error::io_err(path, e))?;
    let table = content.parse::<toml::Table>().map_err(|e| StepsError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(table))
}

/// Overlay `upper` onto `base`, merging nested tables key by key
fn overlay(base: &mut toml::Table, upper: toml::Table) {
    for (key, value) in upper {
        let toml::Value::Table(higher) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(lower)) = base.get_mut(&key) {
            overlay(lower, higher);
            continue;
        }
        base.insert(key, toml::Value::Table(higher));
    }
}
