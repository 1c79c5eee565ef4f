//! Branch name allocator - finds a branch name nobody uses yet

use std::path::Path;

use log::debug;

use crate::core::ports::VersionControl;
use crate::error::{Result, StepsError};

/// Return `base` if no ref carries it, else the first free `base-1`,
/// `base-2`, ...
///
/// At most `max_attempts` names are tried (the bare `base` counts as one);
/// running out yields [`StepsError::BranchNamesExhausted`].
pub fn allocate(vcs: &dyn VersionControl, repo: &Path, base: &str, max_attempts: usize) -> Result<String> {
    for attempt in 0..max_attempts {
        let candidate = candidate(base, attempt);
        if vcs.ref_exists(repo, &candidate)? {
            debug!("branch name {candidate} is taken");
            continue;
        }
        return Ok(candidate);
    }
    Err(StepsError::BranchNamesExhausted {
        base: base.to_string(),
        attempts: max_attempts,
    })
}

fn candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 { base.to_string() } else { format!("{base}-{attempt}") }
}
