//! stepsync - keep a tutorial's build steps in sync between a folder
//! hierarchy and a git branch

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata,
    clippy::needless_pass_by_value
)]

mod cli;

/// Main entry point for the stepsync CLI
fn main() -> std::process::ExitCode {
    cli::run()
}
