//! Per-directory listing snapshots and traversal options

use crate::error::SyncError;
use crate::fs::FileSystem;
use crate::types::{DirectoryEntry, EntryKind};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Traversal configuration for a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Classify symbolic links by their target and copy the target's content
    /// (default: false, links are left alone)
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Maximum directory depth below the roots (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Entry names to treat as invisible on both sides (exact name or `*`/`?` glob)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: None,
            ignore_patterns: Vec::new(),
        }
    }
}

impl SyncOptions {
    /// Compile `ignore_patterns` into a matcher
    pub fn ignore_set(&self) -> Result<IgnoreSet, SyncError> {
        IgnoreSet::new(&self.ignore_patterns)
    }
}

/// Compiled ignore patterns, matched against single entry names
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    set: GlobSet,
}

impl IgnoreSet {
    /// `*` matches any run of characters within a name, `?` exactly one.
    pub fn new(patterns: &[String]) -> Result<Self, SyncError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| SyncError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| SyncError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { set })
    }

    pub fn is_match(&self, name: &OsStr) -> bool {
        self.set.is_match(name)
    }
}

/// Immediate children of one directory, split by kind and taken once.
///
/// Reconciliation at a level works against this snapshot only; nothing is
/// relisted while actions for the level are being computed.
#[derive(Debug, Default, Clone)]
pub struct Listing {
    pub files: Vec<OsString>,
    pub directories: Vec<OsString>,
    pub others: Vec<OsString>,
}

impl Listing {
    pub fn kind_of(&self, name: &OsStr) -> Option<EntryKind> {
        if self.files.iter().any(|n| n == name) {
            Some(EntryKind::File)
        } else if self.directories.iter().any(|n| n == name) {
            Some(EntryKind::Directory)
        } else if self.others.iter().any(|n| n == name) {
            Some(EntryKind::Other)
        } else {
            None
        }
    }
}

/// List `dir` and partition the result, dropping ignored names.
///
/// Replica directories must be listed with `follow_symlinks` off so a link
/// there is always `Other` and never written or descended through.
pub fn snapshot(
    fs: &dyn FileSystem,
    dir: &Path,
    follow_symlinks: bool,
    ignore: &IgnoreSet,
) -> Result<Listing, SyncError> {
    let entries = fs.list_entries(dir, follow_symlinks)?;
    Ok(partition(entries, ignore))
}

fn partition(entries: Vec<DirectoryEntry>, ignore: &IgnoreSet) -> Listing {
    let mut listing = Listing::default();
    for entry in entries {
        if ignore.is_match(&entry.name) {
            continue;
        }
        match entry.kind {
            EntryKind::File => listing.files.push(entry.name),
            EntryKind::Directory => listing.directories.push(entry.name),
            EntryKind::Other => listing.others.push(entry.name),
        }
    }
    listing
}
