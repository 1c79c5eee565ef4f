//! Version control system port
//!
//! Defines the interface the step components use to talk to version control.
//! Every method names the repository (or directory) it acts on; the
//! components never read repository internals themselves.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::models::LogEntry;
use crate::error::VcsError;

/// Result of comparing two commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffOutput {
    /// Command line that produced the diff, for reports
    pub command: String,
    /// Diff text; empty when the trees are identical
    pub output: String,
}

impl DiffOutput {
    /// Whether the two commits differ
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.output.trim().is_empty()
    }
}

/// Version control system abstraction
///
/// Production code binds it to the `git` command line
/// ([`crate::adapters::git::GitCli`]); tests bind it to an in-memory fake.
pub trait VersionControl: fmt::Debug {
    /// Whether `repo` already carries version-control metadata
    fn is_repository(&self, repo: &Path) -> bool;

    /// Create a repository whose first branch is `initial_branch`
    fn init(&self, repo: &Path, initial_branch: &str) -> Result<(), VcsError>;

    /// Switch to a new branch that shares no history with the current one
    fn create_orphan_branch(&self, repo: &Path, branch: &str) -> Result<(), VcsError>;

    /// Whether a ref with this name exists (`show-ref`)
    fn ref_exists(&self, repo: &Path, name: &str) -> Result<bool, VcsError>;

    /// Files tracked under `dir`, relative to `dir`
    ///
    /// Empty when `dir` is not inside a repository.
    fn tracked_files(&self, dir: &Path) -> Result<Vec<PathBuf>, VcsError>;

    /// Stage paths (relative to `repo`)
    fn add(&self, repo: &Path, paths: &[PathBuf]) -> Result<(), VcsError>;

    /// Commit the index with `subject`, returning the new commit hash
    fn commit(&self, repo: &Path, subject: &str) -> Result<String, VcsError>;

    /// Hash of the current branch tip, `None` before the first commit
    fn head(&self, repo: &Path) -> Result<Option<String>, VcsError>;

    /// Subject line of a commit
    fn subject(&self, repo: &Path, commit: &str) -> Result<String, VcsError>;

    /// First parent of a commit, `None` for a root commit
    fn first_parent(&self, repo: &Path, commit: &str) -> Result<Option<String>, VcsError>;

    /// Full log of a branch, newest commit first
    fn log(&self, repo: &Path, branch: &str) -> Result<Vec<LogEntry>, VcsError>;

    /// Subjects on `branch` whose message matches `pattern`, newest first
    fn log_grep(&self, repo: &Path, branch: &str, pattern: &str) -> Result<Vec<String>, VcsError>;

    /// Write the full tree of `commit` into `dest`
    fn archive(&self, repo: &Path, commit: &str, dest: &Path) -> Result<(), VcsError>;

    /// Content diff between two commits
    fn diff(&self, repo: &Path, from: &str, to: &str) -> Result<DiffOutput, VcsError>;

    /// Reset index and working tree to the branch tip
    fn reset_hard(&self, repo: &Path) -> Result<(), VcsError>;

    /// Local branch names
    fn branches(&self, repo: &Path) -> Result<Vec<String>, VcsError>;
}
