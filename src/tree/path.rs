//! Path arithmetic for relative links
//!
//! Links are computed from the paths as written, after resolving any symlinked
//! directories on the way, so a workspace can be moved as a whole without
//! breaking them. Only `physical_path` touches the filesystem.

use crate::error::FederationError;
use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without resolving symlinks.
///
/// `..` above the root of an absolute path is dropped; on a relative path it is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Relative path that leads from directory `from` to `to`.
///
/// Both paths must be absolute and share a root. Equal paths yield an empty path.
pub fn relative_path(from: &Path, to: &Path) -> Result<PathBuf, FederationError> {
    if !from.is_absolute() || !to.is_absolute() {
        return Err(FederationError::InvalidArgument(format!(
            "cannot relate non-absolute paths {} and {}",
            from.display(),
            to.display()
        )));
    }

    let from = normalize_lexically(from);
    let to = normalize_lexically(to);
    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    if from_parts.first() != to_parts.first() {
        return Err(FederationError::InvalidArgument(format!(
            "{} and {} do not share a root",
            from.display(),
            to.display()
        )));
    }

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from_parts.len() {
        relative.push("..");
    }
    for part in &to_parts[common..] {
        relative.push(part.as_os_str());
    }
    Ok(relative)
}

/// `path` with symlinks resolved when it exists, otherwise normalized lexically.
///
/// A relative link is followed from the physical directory holding it, so link
/// targets must be computed between physical paths.
pub fn physical_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| normalize_lexically(path))
}

/// Where a relative link target placed in `link_dir` points to.
pub fn resolve_link_target(link_dir: &Path, target: &Path) -> PathBuf {
    normalize_lexically(&link_dir.join(target))
}
