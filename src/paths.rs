//! Centralized path definitions for stepsync
//!
//! ## Layout
//!
//! ```text
//! repo/
//! ├── .stepsync.toml        # optional repository-local settings
//! ├── .steps/               # default step folder hierarchy
//! │   ├── 01/
//! │   │   ├── step.md       # "# <one-line description>"
//! │   │   └── app.py
//! │   └── 02/
//! │       └── ...
//! └── .git/
//!
//! ~/.config/stepsync/
//! └── config.toml           # optional user-level settings
//! ```

use std::path::{Path, PathBuf};

/// Default step folder, relative to the repository
pub const DEFAULT_STEPS_FOLDER: &str = ".steps";

/// Per-step metadata file carrying the one-line description
pub const DEFAULT_METADATA_FILE: &str = "step.md";

/// Repository-local settings file
pub const LOCAL_CONFIG: &str = ".stepsync.toml";

/// Application directory under the user config dir
const APP_DIR: &str = "stepsync";

/// User-level settings filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Get the user-level config directory (`~/.config/stepsync` on Linux)
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Get the user-level config file path
#[must_use]
pub fn global_config() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Get the repository-local config file path
#[must_use]
pub fn local_config(repo: &Path) -> PathBuf {
    repo.join(LOCAL_CONFIG)
}

/// Git metadata directory (or worktree link file) of a repository
#[must_use]
pub fn git_dir(repo: &Path) -> PathBuf {
    repo.join(".git")
}
