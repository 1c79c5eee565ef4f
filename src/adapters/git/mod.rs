//! Git integration adapter
//!
//! Implements [`VersionControl`] by spawning the `git` command line, plus
//! `tar` to unpack `git archive` output.
//!
//! - [`process`] - subprocess helpers

pub mod process;

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::config::GitSettings;
use crate::core::grammar;
use crate::core::models::LogEntry;
use crate::core::ports::{DiffOutput, VersionControl};
use crate::error::VcsError;
use crate::paths;

/// `show-ref` exit status meaning "no such ref"
const SHOW_REF_NOT_FOUND: i32 = 1;

/// Git-based version control implementation
#[derive(Debug, Clone)]
pub struct GitCli {
    /// git executable
    program: String,
    /// tar executable
    tar_program: String,
    /// `-c key=value` pairs passed to every invocation
    config: Vec<String>,
}

impl GitCli {
    /// Create a git adapter from settings
    #[must_use]
    pub fn new(settings: &GitSettings) -> Self {
        let mut config = Vec::new();
        if let Some(name) = &settings.user_name {
            config.push(format!("user.name={name}"));
        }
        if let Some(email) = &settings.user_email {
            config.push(format!("user.email={email}"));
        }
        Self {
            program: settings.program.clone(),
            tar_program: settings.tar_program.clone(),
            config,
        }
    }

    /// Build `git -C <dir> [-c ...] <args>`
    fn git(&self, dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-C").arg(dir);
        for pair in &self.config {
            cmd.arg("-c").arg(pair);
        }
        cmd.args(args);
        cmd
    }

    fn capture(&self, dir: &Path, args: &[&str]) -> Result<String, VcsError> {
        process::run_capture(self.git(dir, args))
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(&GitSettings::default())
    }
}

impl VersionControl for GitCli {
    fn is_repository(&self, repo: &Path) -> bool {
        paths::git_dir(repo).exists()
    }

    fn init(&self, repo: &Path, initial_branch: &str) -> Result<(), VcsError> {
        let branch_arg = format!("--initial-branch={initial_branch}");
        process::run_checked(self.git(repo, &["init", "--quiet", &branch_arg]))?;
        Ok(())
    }

    fn create_orphan_branch(&self, repo: &Path, branch: &str) -> Result<(), VcsError> {
        process::run_checked(self.git(repo, &["switch", "--quiet", "--orphan", branch]))?;
        Ok(())
    }

    fn ref_exists(&self, repo: &Path, name: &str) -> Result<bool, VcsError> {
        let cmd = self.git(repo, &["show-ref", "--quiet", name]);
        let command = process::describe(&cmd);
        let output = process::run(cmd)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(SHOW_REF_NOT_FOUND) => Ok(false),
            code => Err(VcsError::Failed {
                command,
                status: code.unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn tracked_files(&self, dir: &Path) -> Result<Vec<PathBuf>, VcsError> {
        let output = process::run(self.git(dir, &["ls-files", "-z"]))?;
        if !output.status.success() {
            debug!("{} is not under version control", dir.display());
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .split('\0')
            .filter(|name| !name.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn add(&self, repo: &Path, paths: &[PathBuf]) -> Result<(), VcsError> {
        if paths.is_empty() {
            return Ok(());
        }
        // Step membership is already decided; ignore rules must not drop files
        let mut cmd = self.git(repo, &["add", "--force", "--"]);
        cmd.args(paths);
        process::run_checked(cmd)?;
        Ok(())
    }

    fn commit(&self, repo: &Path, subject: &str) -> Result<String, VcsError> {
        process::run_checked(self.git(repo, &["commit", "--quiet", "--allow-empty", "-m", subject]))?;
        let hash = self.capture(repo, &["rev-parse", "--short", "HEAD"])?;
        Ok(hash.trim().to_string())
    }

    fn head(&self, repo: &Path) -> Result<Option<String>, VcsError> {
        let output = process::run(self.git(repo, &["rev-parse", "--short", "--verify", "--quiet", "HEAD"]))?;
        if !output.status.success() {
            return Ok(None);
        }
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(hash).filter(|h| !h.is_empty()))
    }

    fn subject(&self, repo: &Path, commit: &str) -> Result<String, VcsError> {
        let out = self.capture(repo, &["log", "--format=%s", "-n", "1", commit])?;
        Ok(out.trim_end().to_string())
    }

    fn first_parent(&self, repo: &Path, commit: &str) -> Result<Option<String>, VcsError> {
        let out = self.capture(repo, &["log", "--format=%p", "-n", "1", commit])?;
        Ok(out.split_whitespace().next().map(String::from))
    }

    fn log(&self, repo: &Path, branch: &str) -> Result<Vec<LogEntry>, VcsError> {
        let out = self.capture(repo, &["log", "--format=%h %s", branch, "--"])?;
        Ok(out.lines().filter_map(grammar::parse_log_line).collect())
    }

    fn log_grep(&self, repo: &Path, branch: &str, pattern: &str) -> Result<Vec<String>, VcsError> {
        let grep = format!("--grep={pattern}");
        let out = self.capture(repo, &["log", "--format=%s", &grep, branch, "--"])?;
        Ok(out.lines().map(String::from).collect())
    }

    fn archive(&self, repo: &Path, commit: &str, dest: &Path) -> Result<(), VcsError> {
        let output = process::run_checked(self.git(repo, &["archive", "--format=tar", commit]))?;
        let mut tar = Command::new(&self.tar_program);
        tar.arg("-x").arg("-f").arg("-").arg("-C").arg(dest);
        process::run_with_input(tar, &output.stdout)?;
        Ok(())
    }

    fn diff(&self, repo: &Path, from: &str, to: &str) -> Result<DiffOutput, VcsError> {
        let cmd = self.git(repo, &["diff", from, to]);
        let command = process::describe(&cmd);
        let output = process::run_checked(cmd)?;
        Ok(DiffOutput {
            command,
            output: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }

    fn reset_hard(&self, repo: &Path) -> Result<(), VcsError> {
        process::run_checked(self.git(repo, &["reset", "--hard", "--quiet"]))?;
        Ok(())
    }

    fn branches(&self, repo: &Path) -> Result<Vec<String>, VcsError> {
        let out = self.capture(repo, &["branch", "--format=%(refname:short)"])?;
        Ok(out.lines().map(str::trim).filter(|b| !b.is_empty()).map(String::from).collect())
    }
}
