//! Idempotent conditional materialization
//!
//! Extraction into the shared pool and linking back into a subdomain both reduce
//! to "make this path hold that, unless something is already there". They share
//! this one primitive so their conflict handling cannot diverge.

use crate::error::FederationError;
use crate::tree::{copy_tree, remove_tree};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// What a path should end up holding.
#[derive(Debug, Clone, Copy)]
pub enum Wanted<'a> {
    /// A copy of this file or directory.
    CopyOf(&'a Path),
    /// A directory symlink with exactly this (relative) target.
    LinkTo(&'a Path),
}

/// What to do when the path is already occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// First writer wins: any existing entry is left alone.
    KeepExisting,
    /// Existing symlinks are replaced; anything else is a conflict and left alone.
    ReplaceLinks,
}

/// Result of [`ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ensured {
    Created,
    AlreadyCorrect,
    SkippedConflict,
}

/// Bring `path` into the wanted state under the given conflict policy.
pub fn ensure(
    path: &Path,
    wanted: Wanted<'_>,
    policy: ConflictPolicy,
) -> Result<Ensured, FederationError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            materialize(path, wanted)?;
            return Ok(Ensured::Created);
        }
        Err(e) => return Err(FederationError::io(path, e)),
    };

    match policy {
        ConflictPolicy::KeepExisting => Ok(Ensured::AlreadyCorrect),
        ConflictPolicy::ReplaceLinks if metadata.file_type().is_symlink() => {
            if let Wanted::LinkTo(target) = wanted {
                let current = fs::read_link(path).map_err(|e| FederationError::io(path, e))?;
                if current == target {
                    return Ok(Ensured::AlreadyCorrect);
                }
            }
            remove_tree(path)?;
            materialize(path, wanted)?;
            Ok(Ensured::Created)
        }
        ConflictPolicy::ReplaceLinks => Ok(Ensured::SkippedConflict),
    }
}

fn materialize(path: &Path, wanted: Wanted<'_>) -> Result<(), FederationError> {
    match wanted {
        Wanted::CopyOf(source) => {
            if source.is_dir() {
                copy_tree(source, path)
            } else {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| FederationError::io(parent, e))?;
                }
                fs::copy(source, path)
                    .map(|_| ())
                    .map_err(|e| FederationError::io(source, e))
            }
        }
        Wanted::LinkTo(target) => symlink_dir(target, path),
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> Result<(), FederationError> {
    std::os::unix::fs::symlink(target, link).map_err(|e| FederationError::io(link, e))
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> Result<(), FederationError> {
    std::os::windows::fs::symlink_dir(target, link).map_err(|e| FederationError::io(link, e))
}
