//! Step components
//!
//! - [`locator`] - find and order step directories
//! - [`resolver`] - three-tier step message lookup
//! - [`allocator`] - collision-free branch names
//! - [`materializer`] - step folders to branch (`togit`)
//! - [`extractor`] - branch to step folders (`tofolders`)
//! - [`checker`] - compare two step branches (`diff-branches`)

pub mod allocator;
pub mod checker;
pub mod extractor;
pub mod locator;
pub mod materializer;
pub mod resolver;

pub use checker::{BranchComparison, Checker, Divergence};
pub use extractor::{ExtractReport, ExtractedStep, Extractor};
pub use materializer::{MaterializeOptions, MaterializeReport, MaterializedStep, Materializer};
pub use resolver::MessageResolver;
