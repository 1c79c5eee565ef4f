//! Consistency checker (`diff-branches`) - compares two step branches
//!
//! Both branches are scanned into an ordered id -> commit mapping, oldest
//! step first. The mappings are then walked position by position: a
//! position is flagged when the ids differ, the messages differ, or the two
//! commits' trees differ. The repository is never modified.

use std::path::Path;

use indexmap::IndexMap;
use indexmap::map::Entry;
use log::{debug, info, warn};
use serde::Serialize;

use crate::core::grammar;
use crate::core::models::{StepCommit, StepId};
use crate::core::ports::{DiffOutput, VersionControl};
use crate::error::Result;

/// Steps of one branch, keyed by id, in chronological order
pub type StepMap = IndexMap<StepId, StepCommit>;

/// Outcome of comparing two branches
#[derive(Debug, Clone, Serialize)]
pub struct BranchComparison {
    /// First branch name
    pub left: String,
    /// Second branch name
    pub right: String,
    /// Number of steps found on the first branch
    pub left_steps: usize,
    /// Number of steps found on the second branch
    pub right_steps: usize,
    /// The two branches do not carry the same set of step ids
    pub ids_differ: bool,
    /// Positions where the branches disagree
    pub divergences: Vec<Divergence>,
}

impl BranchComparison {
    /// Whether the branches agree at every paired position
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.divergences.is_empty() && !self.ids_differ
    }
}

/// One flagged position
#[derive(Debug, Clone, Serialize)]
pub struct Divergence {
    /// Zero-based position in step order
    pub position: usize,
    /// Step on the first branch
    pub left: StepCommit,
    /// Step on the second branch
    pub right: StepCommit,
    /// Diff between the two commits
    pub diff: DiffOutput,
}

/// Compares step branches inside one repository
#[derive(Debug, Clone, Copy)]
pub struct Checker<'a> {
    vcs: &'a dyn VersionControl,
}

impl<'a> Checker<'a> {
    /// Create a checker
    #[must_use]
    pub const fn new(vcs: &'a dyn VersionControl) -> Self {
        Self { vcs }
    }

    /// Compare `left` and `right` in `repo`
    pub fn compare(&self, repo: &Path, left: &str, right: &str) -> Result<BranchComparison> {
        info!("working in {}", repo.display());
        let left_map = self.scan_branch(repo, left)?;
        let right_map = self.scan_branch(repo, right)?;

        if left_map.len() != right_map.len() {
            warn!(
                "{left} and {right} have different number of steps ({} vs {})",
                left_map.len(),
                right_map.len()
            );
        }
        let ids_differ = !same_keys(&left_map, &right_map);
        if ids_differ {
            warn!("{left} and {right} have different steps");
            info!("{left}: {}", join_ids(&left_map));
            info!("{right}: {}", join_ids(&right_map));
        }

        let mut divergences = Vec::new();
        for (position, (l, r)) in left_map.values().zip(right_map.values()).enumerate() {
            let diff = self.vcs.diff(repo, &l.hash, &r.hash)?;
            if l.id != r.id || l.message != r.message || diff.has_changes() {
                divergences.push(Divergence {
                    position,
                    left: l.clone(),
                    right: r.clone(),
                    diff,
                });
            }
        }

        Ok(BranchComparison {
            left: left.to_string(),
            right: right.to_string(),
            left_steps: left_map.len(),
            right_steps: right_map.len(),
            ids_differ,
            divergences,
        })
    }

    /// Read a branch's step commits, oldest first
    ///
    /// Commits with foreign subjects are skipped. When an id occurs more than
    /// once, the newest commit wins but keeps the position of the id's first
    /// (oldest) appearance. This is not last-write-wins on both key and
    /// position: the compared tree is always the newest one for that id,
    /// while the pairing order stays the order in which steps were introduced.
    pub fn scan_branch(&self, repo: &Path, branch: &str) -> Result<StepMap> {
        let mut map = StepMap::new();
        for entry in self.vcs.log(repo, branch)?.into_iter().rev() {
            let Some(subject) = grammar::parse_subject(&entry.subject) else {
                debug!("{branch}: skipping foreign commit {}", entry.hash);
                continue;
            };
            let commit = StepCommit {
                id: subject.id.clone(),
                hash: entry.hash,
                message: subject.message,
            };
            match map.entry(subject.id) {
                Entry::Occupied(mut slot) => {
                    warn!("{branch}: step {} appears more than once", slot.key());
                    slot.insert(commit);
                },
                Entry::Vacant(slot) => {
                    slot.insert(commit);
                },
            }
        }
        debug!("{branch}: {} steps", map.len());
        Ok(map)
    }
}

fn same_keys(a: &StepMap, b: &StepMap) -> bool {
    a.len() == b.len() && a.keys().all(|id| b.contains_key(id))
}

fn join_ids(map: &StepMap) -> String {
    map.keys().map(StepId::as_str).collect::<Vec<_>>().join(", ")
}
