//! Command implementations

mod diff_branches;
mod tofolders;
mod togit;

pub use diff_branches::diff_branches;
pub use tofolders::tofolders;
pub use togit::togit;
