//! Outcome of resolving a step's one-line description

use serde::Serialize;

use super::StepId;

/// Sentinel id reported when no tier produced a message
pub const UNKNOWN_ID: &str = "unknown";

/// Sentinel message reported when no tier produced a message
pub const UNKNOWN_MESSAGE: &str = "cannot find message";

/// Where a step message came from, in precedence order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Resolution {
    /// Tier 1: the step's metadata file. Carries no id.
    Metadata {
        /// Message read from `# <message>`
        message: String,
    },
    /// Tier 2: a matching subject on the reference branch
    CommitLog {
        /// Id found in the subject
        id: StepId,
        /// Message found in the subject
        message: String,
    },
    /// Tier 3: nothing usable
    Unknown,
}

impl Resolution {
    /// The resolved id, `None` for metadata, `"unknown"` for the sentinel
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Metadata { .. } => None,
            Self::CommitLog { id, .. } => Some(id.as_str()),
            Self::Unknown => Some(UNKNOWN_ID),
        }
    }

    /// The resolved message (the sentinel text for [`Resolution::Unknown`])
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Metadata { message } | Self::CommitLog { message, .. } => message,
            Self::Unknown => UNKNOWN_MESSAGE,
        }
    }

    /// Whether the message is an exact copy of what the operator wrote
    #[must_use]
    pub const fn is_lossless(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    /// Short tier label for reports
    #[must_use]
    pub const fn tier(&self) -> &'static str {
        match self {
            Self::Metadata { .. } => "metadata",
            Self::CommitLog { .. } => "commit_log",
            Self::Unknown => "unknown",
        }
    }
}
