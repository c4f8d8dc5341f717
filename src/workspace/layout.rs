//! Absolute workspace layout derived from the configuration.

use crate::config::FederationConfig;
use crate::error::FederationError;
use crate::tree::normalize_lexically;
use std::path::{Path, PathBuf};

/// Join `path` onto `base` unless it is already absolute, then collapse dots.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    normalize_lexically(&base.join(path))
}

/// Where everything lives, as absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub root: PathBuf,
    pub shared_dir: PathBuf,
    pub subdomains_dir: PathBuf,
}

impl WorkspaceLayout {
    /// Canonicalize the workspace root and resolve configured directories against it.
    pub fn resolve(root: &Path, config: &FederationConfig) -> Result<Self, FederationError> {
        let root = dunce::canonicalize(root).map_err(|_| FederationError::MissingDirectory {
            what: "Workspace root",
            path: root.to_path_buf(),
        })?;
        Ok(Self {
            shared_dir: resolve_against(&root, &config.shared_dir),
            subdomains_dir: resolve_against(&root, &config.subdomains_dir),
            root,
        })
    }

    /// Directory for the subdomain called `name`.
    pub fn subdomain_dir(&self, name: &str) -> PathBuf {
        self.subdomains_dir.join(name)
    }

    /// Resolve a user-supplied subdomain path against the workspace root.
    pub fn resolve_subdomain_path(&self, path: &Path) -> PathBuf {
        resolve_against(&self.root, path)
    }
}
