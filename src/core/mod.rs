//! Core domain logic for stepsync
//!
//! All version-control interactions go through the [`ports::VersionControl`]
//! trait; the components here only touch the filesystem for the step
//! folders they read and write.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (`StepId`, `StepEntry`, `StepSubject`, `Resolution`)
//! - `grammar` - Subject and metadata line grammars
//! - `ports/` - Trait definitions for external dependencies
//! - `services/` - The step components

pub mod grammar;
pub mod models;
pub mod ports;
pub mod services;
