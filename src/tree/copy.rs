//! Recursive copy and removal over a filesystem subtree
//!
//! Neither operation is transactional. The first failure is returned as-is and
//! whatever was already copied or removed stays that way.

use crate::error::FederationError;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy every file and subdirectory of `src` into `dest`, creating `dest` and
/// any missing parents.
///
/// Symlinks inside `src` are not recreated; a linked file is copied by content.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<(), FederationError> {
    fs::create_dir_all(dest).map_err(|e| FederationError::io(dest, e))?;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| FederationError::InvalidArgument(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| FederationError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| FederationError::io(entry.path(), e))?;
        }
    }

    Ok(())
}

/// Delete `dir` and everything beneath it. A missing `dir` is not an error.
///
/// If `dir` is itself a symlink only the link is removed; its target is never
/// traversed.
pub fn remove_tree(dir: &Path) -> Result<(), FederationError> {
    let metadata = match fs::symlink_metadata(dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FederationError::io(dir, e)),
    };

    if !metadata.is_dir() {
        return remove_link_or_file(dir);
    }

    for entry in WalkDir::new(dir).follow_links(false).contents_first(true) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            fs::remove_dir(path).map_err(|e| FederationError::io(path, e))?;
        } else {
            remove_link_or_file(path)?;
        }
    }

    Ok(())
}

fn remove_link_or_file(path: &Path) -> Result<(), FederationError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        // Windows directory symlinks need remove_dir.
        Err(_) if cfg!(windows) => fs::remove_dir(path).map_err(|e| FederationError::io(path, e)),
        Err(e) => Err(FederationError::io(path, e)),
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> FederationError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
    FederationError::io(path, source)
}
