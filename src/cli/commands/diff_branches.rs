//! Compare two step branches

use std::path::Path;

use anyhow::Context;
use stepsync::adapters::GitCli;
use stepsync::core::services::Checker;
use stepsync::output::OutputMode;
use stepsync::{Settings, StepsError};

/// Report every position where `branch1` and `branch2` disagree
pub fn diff_branches(repo: &Path, branch1: &str, branch2: &str, mode: OutputMode) -> anyhow::Result<()> {
    let settings = Settings::load(repo)?;
    let git = GitCli::new(&settings.git);
    if !repo.is_dir() {
        return Err(StepsError::NotARepository(repo.to_path_buf()).into());
    }

    let comparison = Checker::new(&git)
        .compare(repo, branch1, branch2)
        .with_context(|| format!("cannot compare {branch1} and {branch2} in {}", repo.display()))?;
    comparison.render(mode);
    Ok(())
}
