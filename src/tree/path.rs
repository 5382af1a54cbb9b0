//! Root path resolution and overlap detection

use crate::fs::FileSystem;
use std::path::{Component, Path, PathBuf};

/// Resolve a root to an absolute, canonical form.
///
/// The replica root may not exist yet, so the longest existing ancestor is
/// canonicalized and the remaining components are appended lexically.
pub fn resolve_root(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    if let Ok(canonical) = fs.canonicalize(path) {
        return canonical;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut remainder = Vec::new();
    let mut cursor = absolute.as_path();
    loop {
        if let Ok(canonical) = fs.canonicalize(cursor) {
            return remainder
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part: &PathBuf| acc.join(part));
        }
        match (cursor.parent(), cursor.file_name()) {
            (Some(parent), Some(name)) => {
                remainder.push(PathBuf::from(name));
                cursor = parent;
            }
            _ => return lexical_normalize(&absolute),
        }
    }
}

/// Drop `.` components and fold `..` against preceding normal components
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// True if one root contains the other (or they are the same directory)
pub fn roots_overlap(source: &Path, replica: &Path) -> bool {
    source.starts_with(replica) || replica.starts_with(source)
}
