//! Shared link manager: points a subdomain's `src/<folder>` entries at the shared pool.

use crate::error::FederationError;
use crate::shared::materialize::{ensure, ConflictPolicy, Ensured, Wanted};
use crate::tree::{physical_path, relative_path};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome for one shared folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkAction {
    /// A link was created or an outdated link was replaced.
    Linked,
    /// The link already pointed at the shared folder.
    AlreadyLinked,
    /// A real file or directory occupies the link path; left untouched.
    SkippedConflict,
    /// The shared pool has no such folder; nothing to link to.
    MissingTarget,
    /// The link could not be inspected or created; see the entry's error.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkEntry {
    pub folder: String,
    pub link_path: PathBuf,
    /// Relative link target, absent when the shared folder does not exist.
    pub target: Option<PathBuf>,
    pub action: LinkAction,
    /// Set when `action` is `Failed`
    pub error: Option<String>,
}

/// Per-folder results of one linking pass, in configured folder order.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub subdomain_src: PathBuf,
    pub shared_dir: PathBuf,
    pub entries: Vec<LinkEntry>,
}

impl LinkReport {
    pub fn conflicts(&self) -> impl Iterator<Item = &LinkEntry> {
        self.entries
            .iter()
            .filter(|e| e.action == LinkAction::SkippedConflict)
    }

    pub fn failures(&self) -> impl Iterator<Item = &LinkEntry> {
        self.entries
            .iter()
            .filter(|e| e.action == LinkAction::Failed)
    }

    pub fn linked_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.action, LinkAction::Linked | LinkAction::AlreadyLinked))
            .count()
    }
}

/// Links subdomain source trees into one shared pool.
///
/// Never writes inside the shared pool.
#[derive(Debug, Clone)]
pub struct SharedLinkManager {
    shared_dir: PathBuf,
    folders: Vec<String>,
}

impl SharedLinkManager {
    /// `shared_dir` must be absolute.
    pub fn new(shared_dir: PathBuf, folders: Vec<String>) -> Self {
        Self {
            shared_dir,
            folders,
        }
    }

    /// Link a subdomain after checking that the shared pool and `<subdomain>/src` exist.
    pub fn link_subdomain(&self, subdomain_dir: &Path) -> Result<LinkReport, FederationError> {
        if !self.shared_dir.exists() {
            return Err(FederationError::MissingDirectory {
                what: "Shared directory",
                path: self.shared_dir.clone(),
            });
        }
        let src = subdomain_dir.join("src");
        if !src.exists() {
            return Err(FederationError::MissingDirectory {
                what: "Subdomain src",
                path: src,
            });
        }
        self.link(&src)
    }

    /// Ensure each configured `src/<folder>` is a relative directory link into the pool.
    ///
    /// Running this twice with no changes in between yields the same links. A
    /// folder that fails is recorded and the remaining folders are still linked.
    pub fn link(&self, subdomain_src: &Path) -> Result<LinkReport, FederationError> {
        let to_shared = relative_path(
            &physical_path(subdomain_src),
            &physical_path(&self.shared_dir),
        )?;
        let mut entries = Vec::with_capacity(self.folders.len());

        for folder in &self.folders {
            let link_path = subdomain_src.join(folder);

            if !self.shared_dir.join(folder).exists() {
                debug!(folder = %folder, "Shared folder absent, nothing to link");
                entries.push(LinkEntry {
                    folder: folder.clone(),
                    link_path,
                    target: None,
                    action: LinkAction::MissingTarget,
                    error: None,
                });
                continue;
            }

            let target = to_shared.join(folder);
            let wanted = Wanted::LinkTo(&target);
            let (action, error) = match ensure(&link_path, wanted, ConflictPolicy::ReplaceLinks) {
                Ok(Ensured::Created) => {
                    info!(folder = %folder, target = %target.display(), "Linked src/{}", folder);
                    (LinkAction::Linked, None)
                }
                Ok(Ensured::AlreadyCorrect) => {
                    debug!(folder = %folder, "Link already up to date");
                    (LinkAction::AlreadyLinked, None)
                }
                Ok(Ensured::SkippedConflict) => {
                    warn!(
                        path = %link_path.display(),
                        "Skipping {}: not a symlink (remove manually to replace)",
                        folder
                    );
                    (LinkAction::SkippedConflict, None)
                }
                Err(e) => {
                    warn!(folder = %folder, error = %e, "Linking src/{} failed", folder);
                    (LinkAction::Failed, Some(e.to_string()))
                }
            };

            entries.push(LinkEntry {
                folder: folder.clone(),
                link_path,
                target: Some(target),
                action,
                error,
            });
        }

        Ok(LinkReport {
            subdomain_src: subdomain_src.to_path_buf(),
            shared_dir: self.shared_dir.clone(),
            entries,
        })
    }
}

/// Link target that `src/<folder>` should carry to reach `shared_dir/<folder>`.
pub fn expected_target(
    subdomain_src: &Path,
    shared_dir: &Path,
    folder: &str,
) -> Result<PathBuf, FederationError> {
    Ok(relative_path(&physical_path(subdomain_src), &physical_path(shared_dir))?.join(folder))
}
