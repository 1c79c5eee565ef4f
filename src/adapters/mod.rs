//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `git/` - the `git` command line behind [`VersionControl`](crate::core::ports::VersionControl)

pub mod git;

pub use git::GitCli;
