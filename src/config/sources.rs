//! Configuration sources layered onto the builder.

pub mod package_manifest;
pub mod workspace_file;
