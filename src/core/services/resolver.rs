//! Message resolver - recovers a step's one-line description
//!
//! Three tiers, tried in order, never failing:
//!
//! 1. the step's metadata file (`# <message>`)
//! 2. a `step <id> - <message>` subject on the reference branch
//! 3. the `("unknown", "cannot find message")` sentinel
//!
//! At most one version-control query is made per step.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::config::Settings;
use crate::core::grammar;
use crate::core::models::{Resolution, StepEntry, StepId};
use crate::core::ports::VersionControl;

/// Resolves step messages against a repository
#[derive(Debug, Clone, Copy)]
pub struct MessageResolver<'a> {
    vcs: &'a dyn VersionControl,
    settings: &'a Settings,
}

impl<'a> MessageResolver<'a> {
    /// Create a resolver
    #[must_use]
    pub const fn new(vcs: &'a dyn VersionControl, settings: &'a Settings) -> Self {
        Self { vcs, settings }
    }

    /// Resolve the message for `step`, consulting `reference_branch` in `repo`
    /// only when the metadata file is absent or malformed
    #[must_use]
    pub fn resolve(&self, step: &StepEntry, repo: &Path, reference_branch: &str) -> Resolution {
        if let Some(message) = self.from_metadata(&step.path) {
            return Resolution::Metadata { message };
        }

        if let Some((id, message)) = self.from_commit_log(repo, &step.id, reference_branch) {
            if id != step.id {
                warn!("step {} does not match {id} - using {message}", step.id);
            }
            return Resolution::CommitLog { id, message };
        }

        warn!("no message found for step {}", step.id);
        Resolution::Unknown
    }

    /// Tier 1: read `<step_dir>/<metadata_file>`
    #[must_use]
    pub fn from_metadata(&self, step_dir: &Path) -> Option<String> {
        let file = step_dir.join(&self.settings.metadata_file);
        if !file.is_file() {
            debug!("{} does not exist", file.display());
            return None;
        }
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                warn!("cannot read {}: {e}", file.display());
                return None;
            },
        };
        let message = grammar::parse_metadata(&content);
        if message.is_none() {
            warn!("{} not understood, expected a single `# <message>` line:\n{content}", file.display());
        }
        message
    }

    /// Tier 2: newest `step <id> - <message>` subject on `branch`
    ///
    /// The grep also hits subjects that merely mention the id in their
    /// message. A subject carrying exactly `id` wins; a parsed subject with
    /// another id is only returned when no exact one exists (drift).
    #[must_use]
    pub fn from_commit_log(&self, repo: &Path, id: &StepId, branch: &str) -> Option<(StepId, String)> {
        let pattern = format!("step {id} -");
        let subjects = match self.vcs.log_grep(repo, branch, &pattern) {
            Ok(subjects) => subjects,
            Err(e) => {
                debug!("cannot search {branch} for step {id}: {e}");
                return None;
            },
        };

        let mut drifted = None;
        for subject in subjects.iter().filter_map(|line| grammar::parse_subject(line)) {
            if subject.id == *id {
                return Some((subject.id, subject.message));
            }
            drifted.get_or_insert(subject);
        }
        drifted.map(|subject| (subject.id, subject.message))
    }
}
