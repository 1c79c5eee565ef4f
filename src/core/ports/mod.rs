//! Port traits (interfaces) for external dependencies
//!
//! The step components depend only on these traits, never on concrete
//! implementations. Implementations live in the `adapters` module; the test
//! suite carries an in-memory one.

mod vcs;

pub use vcs::{DiffOutput, VersionControl};
