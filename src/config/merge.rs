//! Source precedence for the workspace configuration.

pub mod merge_policy;
