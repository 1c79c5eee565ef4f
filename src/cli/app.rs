//! CLI definitions and entry point
//!
//! Subcommands can be chained in a single invocation:
//!
//! ```text
//! stepsync --debug tofolders -o /tmp/steps repo togit -i /tmp/steps repo2
//! ```
//!
//! The argument list is cut at every subcommand name and each link is parsed
//! on its own. A token is not treated as a cut point when it is the value of
//! a preceding option (`-b togit`).

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use super::commands;
use stepsync::Verbosity;
use stepsync::output::OutputMode;

/// Subcommand names, used to cut a chained command line
const SUBCOMMANDS: &[&str] = &["togit", "tofolders", "diff-branches"];

/// Options that consume the next token as their value
const VALUE_OPTIONS: &[&str] = &[
    "-b",
    "--branch-name",
    "-i",
    "--input-steps-folder",
    "-r",
    "--reference-branch",
    "-o",
    "--output-folder",
];

/// stepsync - keep tutorial steps in sync between folders and a git branch
#[derive(Parser, Debug)]
#[command(
    name = "stepsync",
    version,
    about = "Manage a set of tutorial steps, as either a git branch or a folder hierarchy",
    long_about = "Manage a set of tutorial steps, as either a git branch or a folder hierarchy.\n\n\
                  Step folders (01/, 02/, ...) become one commit per step with `togit`,\n\
                  a step branch becomes folders again with `tofolders`, and\n\
                  `diff-branches` checks that two step branches agree.\n\
                  Subcommands can be chained in one invocation."
)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only show warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rebuild a git branch from a folder hierarchy
    Togit {
        /// Branch name to use - a free variant is searched for if it exists
        #[arg(short, long)]
        branch_name: Option<String>,

        /// Use a separate steps folder (default: <REPO>/.steps)
        #[arg(short, long)]
        input_steps_folder: Option<PathBuf>,

        /// Branch searched for step messages when step.md is unusable
        #[arg(short, long)]
        reference_branch: Option<String>,

        /// Destination repository (created if absent)
        repo: PathBuf,
    },

    /// Create a folder hierarchy from the current branch of a git repository
    Tofolders {
        /// Output folder (default: <REPO>/.steps)
        #[arg(short, long)]
        output_folder: Option<PathBuf>,

        /// Source repository
        repo: PathBuf,
    },

    /// Compare two step branches
    DiffBranches {
        /// Repository holding both branches
        repo: PathBuf,

        /// First branch
        branch1: String,

        /// Second branch
        branch2: String,
    },
}

/// Cut a command line (without the program name) into chain links
///
/// Tokens before the first subcommand stay with the first link so that
/// global flags reach the parser.
#[must_use]
pub fn split_chain(args: &[OsString]) -> Vec<Vec<OsString>> {
    let mut links: Vec<Vec<OsString>> = vec![Vec::new()];
    let mut seen_command = false;
    let mut previous: Option<&OsStr> = None;

    for arg in args {
        let is_value = previous.is_some_and(|p| p.to_str().is_some_and(|p| VALUE_OPTIONS.contains(&p)));
        let is_command = !is_value && arg.to_str().is_some_and(|a| SUBCOMMANDS.contains(&a));
        if is_command && seen_command {
            links.push(Vec::new());
        }
        seen_command |= is_command;
        if let Some(link) = links.last_mut() {
            link.push(arg.clone());
        }
        previous = Some(arg.as_os_str());
    }
    links
}

/// Parse every link of a chained command line
fn parse_chain(args: Vec<OsString>) -> Vec<Cli> {
    let mut args = args.into_iter();
    let program = args.next().unwrap_or_else(|| OsString::from("stepsync"));
    let rest: Vec<OsString> = args.collect();
    split_chain(&rest)
        .into_iter()
        .map(|link| Cli::parse_from(std::iter::once(program.clone()).chain(link)))
        .collect()
}

fn init_logger(verbosity: Verbosity) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(verbosity.filter())).init();
}

/// Run the CLI
pub fn run() -> ExitCode {
    let links = parse_chain(std::env::args_os().collect());

    let debug = links.iter().any(|cli| cli.debug);
    let quiet = links.iter().any(|cli| cli.quiet);
    init_logger(Verbosity::from_flags(debug, quiet));

    let output_mode = if links.iter().any(|cli| cli.json) {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let commands: Vec<Command> = links.into_iter().filter_map(|cli| cli.command).collect();
    if commands.is_empty() {
        println!("stepsync v{}", env!("CARGO_PKG_VERSION"));
        println!("\nRun 'stepsync --help' for usage");
        return ExitCode::SUCCESS;
    }

    for command in commands {
        let result = match command {
            Command::Togit {
                branch_name,
                input_steps_folder,
                reference_branch,
                repo,
            } => commands::togit(&repo, branch_name, input_steps_folder, reference_branch, output_mode),
            Command::Tofolders { output_folder, repo } => {
                commands::tofolders(&repo, output_folder.as_deref(), output_mode)
            },
            Command::DiffBranches {
                repo,
                branch1,
                branch2,
            } => commands::diff_branches(&repo, &branch1, &branch2, output_mode),
        };
        if let Err(e) = result {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
