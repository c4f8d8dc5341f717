//! Read-only report of the link topology across all subdomains.

use crate::discovery::{is_buildable, list_child_dirs, subdomain_name};
use crate::error::FederationError;
use crate::shared::expected_target;
use crate::workspace::WorkspaceLayout;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// State of `src/<folder>` in one subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum FolderState {
    /// Relative link to the shared folder.
    Linked,
    /// A link that points somewhere other than the shared folder.
    StaleLink { target: PathBuf },
    /// A real file or directory; linking will leave it alone.
    Private,
    /// Nothing there yet, but the shared folder exists.
    Absent,
    /// Neither side has it.
    SharedMissing,
}

impl FolderState {
    pub fn label(&self) -> &'static str {
        match self {
            FolderState::Linked => "linked",
            FolderState::StaleLink { .. } => "stale link",
            FolderState::Private => "private",
            FolderState::Absent => "unlinked",
            FolderState::SharedMissing => "-",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubdomainStatus {
    pub name: String,
    pub path: PathBuf,
    pub buildable: bool,
    pub folders: Vec<(String, FolderState)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopologyStatus {
    pub shared_dir: PathBuf,
    pub subdomains_dir: PathBuf,
    pub shared_folders: Vec<String>,
    pub subdomains: Vec<SubdomainStatus>,
}

impl TopologyStatus {
    /// Inspect every subdomain directory without changing anything.
    pub fn collect(
        layout: &WorkspaceLayout,
        shared_folders: &[String],
        manifest: &str,
    ) -> Result<Self, FederationError> {
        if !layout.subdomains_dir.exists() {
            return Err(FederationError::MissingDirectory {
                what: "Subdomains directory",
                path: layout.subdomains_dir.clone(),
            });
        }

        let mut subdomains = Vec::new();
        for dir in list_child_dirs(&layout.subdomains_dir)? {
            let src = dir.join("src");
            let mut folders = Vec::with_capacity(shared_folders.len());
            for folder in shared_folders {
                let state = folder_state(&src, &layout.shared_dir, folder)?;
                folders.push((folder.clone(), state));
            }
            subdomains.push(SubdomainStatus {
                name: subdomain_name(&dir),
                buildable: is_buildable(&dir, manifest),
                path: dir,
                folders,
            });
        }

        Ok(Self {
            shared_dir: layout.shared_dir.clone(),
            subdomains_dir: layout.subdomains_dir.clone(),
            shared_folders: shared_folders.to_vec(),
            subdomains,
        })
    }
}

fn folder_state(
    src: &Path,
    shared_dir: &Path,
    folder: &str,
) -> Result<FolderState, FederationError> {
    let link_path = src.join(folder);
    let metadata = match fs::symlink_metadata(&link_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(if shared_dir.join(folder).exists() {
                FolderState::Absent
            } else {
                FolderState::SharedMissing
            });
        }
        Err(e) => return Err(FederationError::io(&link_path, e)),
    };

    if !metadata.file_type().is_symlink() {
        return Ok(FolderState::Private);
    }

    let target = fs::read_link(&link_path).map_err(|e| FederationError::io(&link_path, e))?;
    let expected = expected_target(src, shared_dir, folder)?;
    if target == expected {
        Ok(FolderState::Linked)
    } else {
        Ok(FolderState::StaleLink { target })
    }
}
