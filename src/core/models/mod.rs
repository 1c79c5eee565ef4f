//! Domain models for stepsync
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`StepId`] / [`StepEntry`] - step directories on disk
//! - [`StepSubject`] / [`LogEntry`] / [`StepCommit`] - steps as commits
//! - [`Resolution`] - where a step description came from

mod commit;
mod resolution;
mod step;

pub use commit::{LogEntry, StepCommit, StepSubject};
pub use resolution::{Resolution, UNKNOWN_ID, UNKNOWN_MESSAGE};
pub use step::{StepEntry, StepId, is_word_char};
