//! Shared asset pool: extraction into the pool and linking back out of it.

pub mod linker;
pub mod materialize;

pub use linker::{expected_target, LinkAction, LinkEntry, LinkReport, SharedLinkManager};
pub use materialize::{ensure, ConflictPolicy, Ensured, Wanted};
