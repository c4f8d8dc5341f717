//! Directory trees
//!
//! Recursive copy and removal of ordinary directory trees, plus the lexical
//! path arithmetic used to express links relative to their own location.

pub mod copy;
pub mod path;

pub use copy::{copy_tree, remove_tree};
pub use path::{normalize_lexically, physical_path, relative_path, resolve_link_target};
