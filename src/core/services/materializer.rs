//! Branch materializer (`togit`) - turns step folders into one commit per step
//!
//! Each step runs through three phases:
//!
//! ```text
//! Copy    copy the step's files into the destination working tree
//! Commit  resolve the message, write the metadata file, stage, commit
//! Prune   delete the copied files from the working tree again
//! ```
//!
//! Pruning only touches the working tree, never the index, so every commit's
//! tree stays cumulative while the diff between consecutive commits is
//! exactly what the new step changed. The working tree is reset to the
//! branch tip once all steps are committed.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use super::{allocator, locator};
use crate::config::Settings;
use crate::core::grammar;
use crate::core::models::{Resolution, StepEntry, StepId};
use crate::core::ports::VersionControl;
use crate::core::services::resolver::MessageResolver;
use crate::error::{Result, StepsError, io_err};

/// What `togit` should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Requested branch name; a free variant is allocated if it is taken
    pub branch: String,
    /// Step folder; defaults to `<repo>/<steps_folder>`
    pub source: Option<PathBuf>,
    /// Branch consulted for messages when a metadata file is unusable
    pub reference_branch: String,
}

impl MaterializeOptions {
    /// Options built from settings defaults
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            branch: settings.default_branch.clone(),
            source: None,
            reference_branch: settings.reference_branch.clone(),
        }
    }
}

/// Outcome of a `togit` run
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeReport {
    /// Destination repository
    pub repo: PathBuf,
    /// Step folder that was read
    pub source: PathBuf,
    /// Branch that received the commits
    pub branch: String,
    /// Whether the repository was created by this run
    pub created_repository: bool,
    /// Whether file membership was restricted to tracked files
    pub tracked_only: bool,
    /// One entry per committed step, in order
    pub steps: Vec<MaterializedStep>,
}

/// One committed step
#[derive(Debug, Clone, Serialize)]
pub struct MaterializedStep {
    /// Step id
    pub id: StepId,
    /// Message used in the subject and metadata file
    pub message: String,
    /// How the message was obtained
    pub resolution: Resolution,
    /// The commit-log fallback matched a different id
    pub drift: bool,
    /// Commit hash
    pub commit: String,
    /// Files copied for this step, relative to the step directory
    pub files: Vec<PathBuf>,
    /// Files listed for the step but absent at copy time
    pub missing: Vec<PathBuf>,
}

/// A step with its file membership computed up front
#[derive(Debug, Clone)]
struct PlannedStep {
    entry: StepEntry,
    files: Vec<PathBuf>,
}

/// Per-step state machine
#[derive(Debug)]
enum Phase {
    Copy,
    Commit {
        copied: Vec<PathBuf>,
        missing: Vec<PathBuf>,
    },
    Prune {
        copied: Vec<PathBuf>,
        missing: Vec<PathBuf>,
        resolution: Resolution,
        commit: String,
    },
    Done(MaterializedStep),
}

/// Builds a step branch from a step folder hierarchy
#[derive(Debug, Clone, Copy)]
pub struct Materializer<'a> {
    vcs: &'a dyn VersionControl,
    settings: &'a Settings,
}

impl<'a> Materializer<'a> {
    /// Create a materializer
    #[must_use]
    pub const fn new(vcs: &'a dyn VersionControl, settings: &'a Settings) -> Self {
        Self { vcs, settings }
    }

    /// Materialize the steps under the configured source into `repo`
    ///
    /// # Errors
    ///
    /// [`StepsError::SourceMissing`] when the step folder does not exist;
    /// version-control and filesystem failures otherwise.
    pub fn run(&self, repo: &Path, options: &MaterializeOptions) -> Result<MaterializeReport> {
        let source = options
            .source
            .clone()
            .unwrap_or_else(|| repo.join(&self.settings.steps_folder));
        if !source.exists() {
            return Err(StepsError::SourceMissing(source));
        }

        fs::create_dir_all(repo).map_err(|e| io_err(repo, e))?;
        let repo = std::path::absolute(repo).map_err(|e| io_err(repo, e))?;
        let source = std::path::absolute(&source).map_err(|e| io_err(&source, e))?;
        info!("working in {}", repo.display());

        let tracked_only = !self.vcs.tracked_files(&source)?.is_empty();
        let plan = self.plan(&source, tracked_only)?;

        let created_repository = !self.vcs.is_repository(&repo);
        let branch = if created_repository {
            info!("creating git repository in {}", repo.display());
            self.vcs.init(&repo, &options.branch)?;
            options.branch.clone()
        } else {
            info!("{} already a git repository", repo.display());
            if tracked_only && source.starts_with(&repo) {
                warn!("step files tracked in {} are removed from the working tree by the branch switch", repo.display());
            }
            let branch =
                allocator::allocate(self.vcs, &repo, &options.branch, self.settings.max_branch_attempts)?;
            info!("using branch {branch}");
            self.vcs.create_orphan_branch(&repo, &branch)?;
            branch
        };

        if plan.is_empty() {
            warn!("no step directories found in {}", source.display());
        }

        let mut steps = Vec::with_capacity(plan.len());
        for planned in &plan {
            info!("processing {}", planned.entry.name);
            steps.push(self.materialize_step(&repo, planned, &options.reference_branch)?);
        }

        if let Err(e) = self.vcs.reset_hard(&repo) {
            warn!("cannot reset working tree of {}: {e}", repo.display());
        }
        match self.vcs.branches(&repo) {
            Ok(branches) => info!("branches: {}", branches.join(", ")),
            Err(e) => debug!("cannot list branches: {e}"),
        }

        Ok(MaterializeReport {
            repo,
            source,
            branch,
            created_repository,
            tracked_only,
            steps,
        })
    }

    fn plan(&self, source: &Path, tracked_only: bool) -> Result<Vec<PlannedStep>> {
        locator::list(source)?
            .into_iter()
            .map(|entry| {
                let files = self.step_files(&entry.path, tracked_only)?;
                info!("found {} files in {}", files.len(), entry.name);
                for file in &files {
                    debug!("  {}", file.display());
                }
                Ok(PlannedStep { entry, files })
            })
            .collect()
    }

    /// File membership of one step, relative to the step directory
    ///
    /// The metadata file is written by the commit phase, so it is left out.
    fn step_files(&self, step_dir: &Path, tracked_only: bool) -> Result<Vec<PathBuf>> {
        let mut files = if tracked_only {
            self.vcs.tracked_files(step_dir)?
        } else {
            let mut files = Vec::new();
            let walker = WalkDir::new(step_dir)
                .min_depth(1)
                .into_iter()
                .filter_entry(|e| e.file_name() != ".git");
            for entry in walker {
                let entry = entry?;
                if let Ok(relative) = entry.path().strip_prefix(step_dir) {
                    files.push(relative.to_path_buf());
                }
            }
            files
        };
        let metadata = Path::new(&self.settings.metadata_file);
        files.retain(|file| file != metadata && step_dir.join(file).is_file());
        files.sort();
        Ok(files)
    }

    fn materialize_step(&self, repo: &Path, step: &PlannedStep, reference_branch: &str) -> Result<MaterializedStep> {
        let mut phase = Phase::Copy;
        loop {
            phase = match phase {
                Phase::Done(done) => return Ok(done),
                phase => self.advance(repo, step, reference_branch, phase)?,
            };
        }
    }

    fn advance(&self, repo: &Path, step: &PlannedStep, reference_branch: &str, phase: Phase) -> Result<Phase> {
        Ok(match phase {
            Phase::Copy => {
                let (copied, missing) = copy_files(&step.entry.path, repo, &step.files)?;
                Phase::Commit { copied, missing }
            },
            Phase::Commit { copied, missing } => {
                let resolver = MessageResolver::new(self.vcs, self.settings);
                let resolution = resolver.resolve(&step.entry, repo, reference_branch);

                let metadata = PathBuf::from(&self.settings.metadata_file);
                let metadata_path = repo.join(&metadata);
                fs::write(&metadata_path, grammar::format_metadata(resolution.message()))
                    .map_err(|e| io_err(&metadata_path, e))?;

                let mut staged = Vec::with_capacity(copied.len() + 1);
                staged.push(metadata);
                staged.extend(copied.iter().cloned());
                self.vcs.add(repo, &staged)?;

                let subject = grammar::format_subject(&step.entry.id, resolution.message());
                let commit = self.vcs.commit(repo, &subject)?;
                debug!("committed {commit}: {subject}");
                Phase::Prune {
                    copied,
                    missing,
                    resolution,
                    commit,
                }
            },
            Phase::Prune {
                copied,
                missing,
                resolution,
                commit,
            } => {
                prune_files(repo, &copied);
                let drift = matches!(&resolution, Resolution::CommitLog { id, .. } if *id != step.entry.id);
                Phase::Done(MaterializedStep {
                    id: step.entry.id.clone(),
                    message: resolution.message().to_string(),
                    resolution,
                    drift,
                    commit,
                    files: copied,
                    missing,
                })
            },
            Phase::Done(done) => Phase::Done(done),
        })
    }
}

/// Copy `files` from `step_dir` into `repo`, preserving relative paths
///
/// Returns the copied files and the ones that vanished since planning.
fn copy_files(step_dir: &Path, repo: &Path, files: &[PathBuf]) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut copied = Vec::with_capacity(files.len());
    let mut missing = Vec::new();
    for file in files {
        let from = step_dir.join(file);
        if !from.is_file() {
            warn!("{} does not exist, skipping", from.display());
            missing.push(file.clone());
            continue;
        }
        let to = repo.join(file);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        fs::copy(&from, &to).map_err(|e| io_err(&from, e))?;
        copied.push(file.clone());
    }
    Ok((copied, missing))
}

/// Remove copied files from the working tree; failures are only logged
fn prune_files(repo: &Path, files: &[PathBuf]) {
    for file in files {
        let path = repo.join(file);
        match fs::remove_file(&path) {
            Ok(()) => debug!("removing {}", path.display()),
            Err(e) => warn!("cannot remove {}: {e}", path.display()),
        }
    }
}
