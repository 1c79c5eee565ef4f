//! stepsync - keep a tutorial's build steps in sync between a folder hierarchy
//! and a git branch
//!
//! A tutorial is written as a sequence of numbered step directories
//! (`01/`, `02/`, ...). This library converts that sequence into a linear
//! branch with one commit per step, converts such a branch back into folders,
//! and checks that two step branches agree.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
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
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod paths;

pub use config::{Settings, Verbosity};
pub use error::{StepsError, VcsError};
