//! Subdomain discovery
//!
//! Two stages: list the immediate child directories of the subdomains root,
//! then keep those that carry a build manifest.

use crate::error::FederationError;
use std::fs;
use std::path::{Path, PathBuf};

/// Immediate child directories of `root`, sorted by name.
///
/// Symlinked directories count; plain files are ignored.
pub fn list_child_dirs(root: &Path) -> Result<Vec<PathBuf>, FederationError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| FederationError::io(root, e))? {
        let entry = entry.map_err(|e| FederationError::io(root, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// A directory is buildable iff `manifest` exists at its root.
pub fn is_buildable(dir: &Path, manifest: &str) -> bool {
    dir.join(manifest).is_file()
}

/// Buildable subdomains under `root`, in name order.
pub fn discover(root: &Path, manifest: &str) -> Result<Vec<PathBuf>, FederationError> {
    Ok(list_child_dirs(root)?
        .into_iter()
        .filter(|dir| is_buildable(dir, manifest))
        .collect())
}

/// Directory name used to label a subdomain in output.
pub fn subdomain_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
