//! Commit-side models: parsed subjects and log lines

use serde::{Deserialize, Serialize};

use super::StepId;

/// A commit subject that follows `step <id> - <message>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSubject {
    /// Step id
    pub id: StepId,
    /// One-line description
    pub message: String,
}

/// One line of a branch log: abbreviated hash plus subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Commit hash as printed by the log
    pub hash: String,
    /// Raw subject line
    pub subject: String,
}

/// A step commit located on a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCommit {
    /// Step id parsed from the subject
    pub id: StepId,
    /// Commit hash
    pub hash: String,
    /// Message parsed from the subject
    pub message: String,
}
