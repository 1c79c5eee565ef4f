//! Step model
//!
//! A step is one incremental tutorial state, stored on disk as a directory
//! whose name starts with a decimal digit (`01`, `02_setup`, `10`).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifier of a step, shared by its folder name and its commit subject
///
/// Ids are contiguous runs of word characters (`[A-Za-z0-9_]`), which is
/// what the commit subject grammar accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Build an id from a token that is already known to be valid
    ///
    /// Returns `None` for empty tokens or tokens with non-word characters.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if !token.is_empty() && token.chars().all(is_word_char) {
            Some(Self(token))
        } else {
            None
        }
    }

    /// Derive an id from a step directory name
    ///
    /// The name must start with a decimal digit; the id is the leading run
    /// of word characters (`03-intro` gives `03`).
    #[must_use]
    pub fn from_dir_name(name: &str) -> Option<Self> {
        if !name.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let token: String = name.chars().take_while(|c| is_word_char(*c)).collect();
        Self::new(token)
    }

    /// Id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Word characters as understood by the step grammar
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A step directory found by the locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepEntry {
    /// Step id derived from the directory name
    pub id: StepId,
    /// Directory name, relative to the steps folder
    pub name: String,
    /// Absolute (or root-joined) path of the directory
    pub path: PathBuf,
}
