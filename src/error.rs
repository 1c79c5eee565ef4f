//! Error types for stepsync
//!
//! Fatal conditions are [`StepsError`] values. Recoverable conditions (a
//! malformed metadata line, a foreign commit subject, a missing file at copy
//! time, drift between step ids) are logged and recorded in run reports
//! instead of being raised.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of an external command (git, tar)
#[derive(Debug, Error)]
pub enum VcsError {
    /// The process could not be started at all
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line that was attempted
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero status
    #[error("`{command}` exited with status {status}: {stderr}")]
    Failed {
        /// Command line that failed
        command: String,
        /// Exit code (-1 when terminated by a signal)
        status: i32,
        /// Captured standard error, trimmed
        stderr: String,
    },
}

/// Errors raised by the step components
#[derive(Debug, Error)]
pub enum StepsError {
    /// The step source folder does not exist
    #[error("steps folder {0} does not exist")]
    SourceMissing(PathBuf),

    /// The repository has no version-control metadata
    #[error("{0} is not a git repository")]
    NotARepository(PathBuf),

    /// The extraction target exists but is not a directory
    #[error("output {0} exists and is not a directory")]
    OutputNotADirectory(PathBuf),

    /// Every candidate branch name up to the attempt bound is taken
    #[error("no free branch name for `{base}` after {attempts} attempts (raise max_branch_attempts)")]
    BranchNamesExhausted {
        /// Requested base name
        base: String,
        /// Number of names tried
        attempts: usize,
    },

    /// Two step directories map to the same step id
    #[error("step id `{id}` is used by both {first} and {second}")]
    DuplicateStepId {
        /// The clashing id
        id: String,
        /// First directory carrying the id
        first: PathBuf,
        /// Second directory carrying the id
        second: PathBuf,
    },

    /// A configuration file could not be read or parsed
    #[error("invalid configuration in {path}: {message}")]
    Config {
        /// Offending file
        path: PathBuf,
        /// Parser or IO message
        message: String,
    },

    /// An external command failed
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Filesystem error, annotated with the path involved
    #[error("io error at {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error while walking a step directory
    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl StepsError {
    /// Whether this error is a precondition failure (missing input or repository)
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SourceMissing(_) | Self::NotARepository(_) | Self::OutputNotADirectory(_)
        )
    }
}

/// Convenience constructor for [`StepsError::Io`]
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StepsError {
    StepsError::Io {
        path: path.into(),
        source,
    }
}

/// Result alias used across the library
pub type Result<T, E = StepsError> = std::result::Result<T, E>;
