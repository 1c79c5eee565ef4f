//! Subprocess helpers for the git adapter
//!
//! Every external command is logged at debug level before it runs, and a
//! non-zero exit is turned into [`VcsError::Failed`] carrying the command
//! line and its trimmed stderr.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use log::debug;

use crate::error::VcsError;

/// Render a command the way it would be typed in a shell
#[must_use]
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().to_string()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().to_string()));
    parts.join(" ")
}

/// Run a command to completion and capture its output, whatever the status
pub fn run(mut cmd: Command) -> Result<Output, VcsError> {
    let command = describe(&cmd);
    debug!("running command: {command}");
    cmd.stdin(Stdio::null())
        .output()
        .map_err(|source| VcsError::Spawn { command, source })
}

/// Run a command and fail on a non-zero exit status
pub fn run_checked(cmd: Command) -> Result<Output, VcsError> {
    let command = describe(&cmd);
    let output = run(cmd)?;
    ensure_success(&command, &output)?;
    Ok(output)
}

/// Run a command and return its stdout as text
pub fn run_capture(cmd: Command) -> Result<String, VcsError> {
    let output = run_checked(cmd)?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Feed `input` to a command's stdin and wait for it
pub fn run_with_input(mut cmd: Command, input: &[u8]) -> Result<Output, VcsError> {
    let command = describe(&cmd);
    debug!("running command: {command} (stdin: {} bytes)", input.len());
    let spawn_err = |source: std::io::Error| VcsError::Spawn {
        command: command.clone(),
        source,
    };

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).map_err(spawn_err)?;
    }
    let output = child.wait_with_output().map_err(spawn_err)?;
    ensure_success(&command, &output)?;
    Ok(output)
}

fn ensure_success(command: &str, output: &Output) -> Result<(), VcsError> {
    if output.status.success() {
        return Ok(());
    }
    Err(VcsError::Failed {
        command: command.to_string(),
        status: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
