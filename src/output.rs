//! Output formatting for human and JSON modes
//!
//! Every command returns a report; this module renders it either as
//! human-readable text or machine-parseable JSON on stdout. Progress and
//! warnings go through the logger (stderr) instead.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;

use crate::core::services::{BranchComparison, ExtractReport, MaterializeReport};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Separator printed between flagged step pairs
const SEPARATOR_WIDTH: usize = 40;

fn render_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

impl MaterializeReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => render_json(self),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} step(s) on branch {} in {}",
            "Committed".green().bold(),
            self.steps.len(),
            self.branch.bold(),
            self.repo.display()
        );
        for step in &self.steps {
            let _ = write!(out, "  {} step {} - {}", step.commit, step.id, step.message);
            if !step.resolution.is_lossless() {
                let _ = write!(out, " {}", format!("[{}]", step.resolution.tier()).yellow());
            }
            if step.drift {
                let _ = write!(out, " {}", "[drift]".yellow());
            }
            if !step.missing.is_empty() {
                let _ = write!(out, " {}", format!("[{} missing]", step.missing.len()).red());
            }
            out.push('\n');
        }
        out
    }
}

impl ExtractReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => render_json(self),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} step folder(s) in {}",
            "Extracted".green().bold(),
            self.steps.len(),
            self.output.display()
        );
        for step in &self.steps {
            let _ = writeln!(out, "  {} <- {} {}", step.id, step.commit, step.message);
        }
        if self.skipped > 0 {
            let _ = writeln!(out, "  ({} non-step commit(s) skipped)", self.skipped);
        }
        out
    }
}

impl BranchComparison {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => render_json(self),
        }
    }

    /// Human-readable text: every flagged pair, then a summary line
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        for divergence in &self.divergences {
            let (l, r) = (&divergence.left, &divergence.right);
            let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
            let _ = writeln!(out, "{}", format!("{}: {} - {}", l.hash, l.id, l.message).bold());
            let _ = writeln!(out, "{}", format!("{}: {} - {}", r.hash, r.id, r.message).bold());
            let _ = writeln!(out, "{}", divergence.diff.command.cyan());
            out.push_str(&divergence.diff.output);
            if !divergence.diff.output.is_empty() && !divergence.diff.output.ends_with('\n') {
                out.push('\n');
            }
        }

        let summary = format!(
            "{} vs {}: {} and {} step(s), {} flagged",
            self.left,
            self.right,
            self.left_steps,
            self.right_steps,
            self.divergences.len()
        );
        if self.is_consistent() {
            let _ = writeln!(out, "{}", summary.green());
        } else {
            let _ = writeln!(out, "{}", summary.red());
        }
        out
    }
}
