//! Sitefed: shared assets for multi-subdomain site workspaces
//!
//! Keeps every subdomain's `src/<folder>` linked to one shared asset pool,
//! scaffolds new subdomains into that topology, and builds all subdomains
//! with a single aggregate outcome.

pub mod build;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod process;
pub mod scaffold;
pub mod shared;
pub mod tree;
pub mod workspace;
