//! Rebuild a git branch from a folder hierarchy

use std::path::{Path, PathBuf};

use stepsync::adapters::GitCli;
use stepsync::core::services::{MaterializeOptions, Materializer};
use stepsync::output::OutputMode;
use stepsync::Settings;

/// Materialize step folders into `repo`, one commit per step
pub fn togit(
    repo: &Path,
    branch_name: Option<String>,
    input_steps_folder: Option<PathBuf>,
    reference_branch: Option<String>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let settings = Settings::load(repo)?;
    let git = GitCli::new(&settings.git);

    let mut options = MaterializeOptions::from_settings(&settings);
    if let Some(branch) = branch_name {
        options.branch = branch;
    }
    if let Some(reference) = reference_branch {
        options.reference_branch = reference;
    }
    options.source = input_steps_folder;

    let report = Materializer::new(&git, &settings).run(repo, &options)?;
    report.render(mode);
    Ok(())
}
