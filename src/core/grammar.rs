//! Line grammars shared by every component
//!
//! ```text
//! commit subject   step <id> - <message>
//! log line         <hash> step <id> - <message>
//! metadata file    # <message>
//! ```
//!
//! A line that does not match is a grammar mismatch: parsers return `None`
//! and callers fall back or skip, they never fail.

use std::sync::LazyLock;

use regex::Regex;

use super::models::{LogEntry, StepId, StepSubject};

static SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^step (\w+) - (.+)$").expect("subject pattern is valid"));

static LOG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9a-f]+) (.*)$").expect("log line pattern is valid"));

static METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (.+)$").expect("metadata pattern is valid"));

/// Parse a commit subject of the form `step <id> - <message>`
#[must_use]
pub fn parse_subject(line: &str) -> Option<StepSubject> {
    let caps = SUBJECT.captures(line.trim_end_matches(['\r', '\n']))?;
    Some(StepSubject {
        id: StepId::new(&caps[1])?,
        message: caps[2].to_string(),
    })
}

/// Format the commit subject for a step
#[must_use]
pub fn format_subject(id: &StepId, message: &str) -> String {
    format!("step {id} - {message}")
}

/// Split a `<hash> <subject>` log line
#[must_use]
pub fn parse_log_line(line: &str) -> Option<LogEntry> {
    let caps = LOG_LINE.captures(line.trim_end_matches(['\r', '\n']))?;
    Some(LogEntry {
        hash: caps[1].to_string(),
        subject: caps[2].to_string(),
    })
}

/// Parse the content of a metadata file: exactly one `# <message>` line
///
/// A single trailing newline is tolerated; more lines are a mismatch.
#[must_use]
pub fn parse_metadata(content: &str) -> Option<String> {
    let line = content.strip_suffix('\n').unwrap_or(content);
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.contains('\n') {
        return None;
    }
    METADATA.captures(line).map(|caps| caps[1].to_string())
}

/// Render the metadata file content for a message
#[must_use]
pub fn format_metadata(message: &str) -> String {
    format!("# {message}\n")
}
