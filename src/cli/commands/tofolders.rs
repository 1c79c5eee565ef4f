//! Create a folder hierarchy from a git repository

use std::path::Path;

use stepsync::adapters::GitCli;
use stepsync::core::services::Extractor;
use stepsync::output::OutputMode;
use stepsync::Settings;

/// Extract the current branch of `repo` into step folders
pub fn tofolders(repo: &Path, output_folder: Option<&Path>, mode: OutputMode) -> anyhow::Result<()> {
    let settings = Settings::load(repo)?;
    let git = GitCli::new(&settings.git);

    let report = Extractor::new(&git, &settings).run(repo, output_folder)?;
    if report.steps.is_empty() {
        anyhow::bail!("no step commits found in {}", repo.display());
    }
    report.render(mode);
    Ok(())
}
