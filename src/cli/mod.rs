//! CLI layer for stepsync
//!
//! - [`app`] - CLI definitions, chain splitting, entry point
//! - [`commands`] - Command implementations

pub mod app;
pub mod commands;

// Re-export main entry point
pub use app::run;
