//! History extractor (`tofolders`) - rebuilds step folders from a branch
//!
//! Walks first parents from the current branch tip, writes the full tree of
//! every `step <id> - <message>` commit into `<output>/<id>/`, and returns
//! the folders oldest first so the result can be fed straight back to the
//! materializer.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::Settings;
use crate::core::grammar;
use crate::core::models::StepId;
use crate::core::ports::VersionControl;
use crate::error::{Result, StepsError, io_err};

/// Outcome of a `tofolders` run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    /// Source repository
    pub repo: PathBuf,
    /// Folder that received the steps
    pub output: PathBuf,
    /// Extracted steps, oldest first
    pub steps: Vec<ExtractedStep>,
    /// Commits skipped because their subject is not a step subject
    pub skipped: usize,
}

/// One step folder written by the extractor
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedStep {
    /// Step id
    pub id: StepId,
    /// Message parsed from the subject
    pub message: String,
    /// Commit the folder was taken from
    pub commit: String,
    /// Folder path
    pub path: PathBuf,
}

/// Rebuilds a step folder hierarchy from a branch
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    vcs: &'a dyn VersionControl,
    settings: &'a Settings,
}

impl<'a> Extractor<'a> {
    /// Create an extractor
    #[must_use]
    pub const fn new(vcs: &'a dyn VersionControl, settings: &'a Settings) -> Self {
        Self { vcs, settings }
    }

    /// Extract the current branch of `repo` into `output`
    ///
    /// `output` defaults to `<repo>/<steps_folder>`; an existing directory
    /// there is deleted first.
    ///
    /// # Errors
    ///
    /// [`StepsError::NotARepository`] when `repo` has no git metadata,
    /// [`StepsError::OutputNotADirectory`] when `output` is a file.
    pub fn run(&self, repo: &Path, output: Option<&Path>) -> Result<ExtractReport> {
        if !repo.is_dir() || !self.vcs.is_repository(repo) {
            return Err(StepsError::NotARepository(repo.to_path_buf()));
        }
        let output = output.map_or_else(|| repo.join(&self.settings.steps_folder), Path::to_path_buf);
        prepare_output(&output)?;

        let mut steps = Vec::new();
        let mut skipped = 0;
        let mut seen_ids = HashSet::new();
        let mut visited = HashSet::new();

        let mut current = self.vcs.head(repo)?;
        if current.is_none() {
            warn!("{} has no commits", repo.display());
        }

        while let Some(commit) = current {
            if !visited.insert(commit.clone()) {
                warn!("commit {commit} seen twice, stopping");
                break;
            }

            let subject = self.vcs.subject(repo, &commit)?;
            match grammar::parse_subject(&subject) {
                Some(parsed) if !seen_ids.insert(parsed.id.clone()) => {
                    warn!("step {} appears again in older commit {commit}, keeping the newer one", parsed.id);
                },
                Some(parsed) => {
                    let folder = output.join(parsed.id.as_str());
                    fs::create_dir_all(&folder).map_err(|e| io_err(&folder, e))?;
                    info!("populating {}", parsed.id);
                    self.vcs.archive(repo, &commit, &folder)?;
                    let message = self.folder_message(&folder, parsed.message)?;
                    steps.push(ExtractedStep {
                        id: parsed.id,
                        message,
                        commit: commit.clone(),
                        path: folder,
                    });
                },
                None => {
                    debug!("skipping foreign commit {commit}: {subject}");
                    skipped += 1;
                },
            }

            current = self.vcs.first_parent(repo, &commit)?.filter(|parent| *parent != commit);
        }

        steps.reverse();
        Ok(ExtractReport {
            repo: repo.to_path_buf(),
            output,
            steps,
            skipped,
        })
    }

    /// Message of an extracted folder
    ///
    /// A metadata file shipped in the commit tree takes precedence over the
    /// subject. Without one, the subject's message is written out and returned.
    fn folder_message(&self, folder: &Path, subject_message: String) -> Result<String> {
        let metadata = folder.join(&self.settings.metadata_file);
        if metadata.exists() {
            let content = fs::read_to_string(&metadata).map_err(|e| io_err(&metadata, e))?;
            return Ok(grammar::parse_metadata(&content).unwrap_or_else(|| {
                warn!("{} not understood, keeping the subject message", metadata.display());
                subject_message
            }));
        }
        fs::write(&metadata, grammar::format_metadata(&subject_message)).map_err(|e| io_err(&metadata, e))?;
        Ok(subject_message)
    }
}

/// Delete and recreate the output directory
fn prepare_output(output: &Path) -> Result<()> {
    if output.is_dir() {
        warn!("{} already exists, deleting it", output.display());
        fs::remove_dir_all(output).map_err(|e| io_err(output, e))?;
    } else if output.exists() {
        return Err(StepsError::OutputNotADirectory(output.to_path_buf()));
    }
    fs::create_dir_all(output).map_err(|e| io_err(output, e))
}
