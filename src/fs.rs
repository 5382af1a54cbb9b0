//! Filesystem abstraction consumed by the reconciler
//!
//! The reconciler never touches `std::fs` directly; every read, listing and
//! mutation goes through [`FileSystem`], so tests can inject faults and the
//! core stays independent of the concrete storage.

use crate::error::{FsOperation, SyncError};
use crate::types::{DirectoryEntry, EntryKind};
use filetime::FileTime;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Operations the reconciler needs from a filesystem
pub trait FileSystem {
    /// List the immediate children of `dir`, sorted by name.
    ///
    /// With `follow_symlinks` a link is classified by its target; a dangling
    /// link is `Other`. Without it every link is `Other`.
    fn list_entries(
        &self,
        dir: &Path,
        follow_symlinks: bool,
    ) -> Result<Vec<DirectoryEntry>, SyncError>;

    fn exists(&self, path: &Path) -> bool;

    /// Kind of the entry at `path`, or `None` if nothing is there
    fn entry_kind(&self, path: &Path, follow_symlinks: bool)
        -> Result<Option<EntryKind>, SyncError>;

    /// Open a streaming reader over the file's content
    fn open_read<'a>(&'a self, path: &Path) -> Result<Box<dyn Read + 'a>, SyncError>;

    /// Copy content, permission bits and access/modification times
    fn copy_with_metadata(&self, src: &Path, dst: &Path) -> Result<(), SyncError>;

    fn remove_file(&self, path: &Path) -> Result<(), SyncError>;

    fn remove_dir_recursive(&self, path: &Path) -> Result<(), SyncError>;

    fn create_dir(&self, path: &Path) -> Result<(), SyncError>;

    fn create_dir_all(&self, path: &Path) -> Result<(), SyncError>;

    /// Resolve links and relative components, used for cycle detection
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, SyncError>;
}

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn classify(path: &Path, file_type: fs::FileType, follow_symlinks: bool) -> EntryKind {
        if file_type.is_symlink() {
            if !follow_symlinks {
                return EntryKind::Other;
            }
            return match fs::metadata(path) {
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                _ => EntryKind::Other,
            };
        }

        if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        }
    }
}

impl FileSystem for LocalFs {
    fn list_entries(
        &self,
        dir: &Path,
        follow_symlinks: bool,
    ) -> Result<Vec<DirectoryEntry>, SyncError> {
        let mut entries = Vec::new();

        // Links are resolved by hand so a dangling one classifies as Other
        // instead of failing the whole listing.
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                SyncError::io(path, FsOperation::List, source)
            })?;

            let kind = Self::classify(entry.path(), entry.file_type(), follow_symlinks);
            entries.push(DirectoryEntry::new(entry.file_name().to_os_string(), kind));
        }

        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn entry_kind(
        &self,
        path: &Path,
        follow_symlinks: bool,
    ) -> Result<Option<EntryKind>, SyncError> {
        match fs::symlink_metadata(path) {
            Ok(meta) => Ok(Some(Self::classify(path, meta.file_type(), follow_symlinks))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::io(path, FsOperation::Stat, e)),
        }
    }

    fn open_read<'a>(&'a self, path: &Path) -> Result<Box<dyn Read + 'a>, SyncError> {
        let file = fs::File::open(path).map_err(|e| SyncError::io(path, FsOperation::Read, e))?;
        Ok(Box::new(file))
    }

    fn copy_with_metadata(&self, src: &Path, dst: &Path) -> Result<(), SyncError> {
        let meta = fs::metadata(src).map_err(|e| SyncError::io(src, FsOperation::Stat, e))?;
        fs::copy(src, dst).map_err(|e| SyncError::io(dst, FsOperation::Copy, e))?;

        let atime = FileTime::from_last_access_time(&meta);
        let mtime = FileTime::from_last_modification_time(&meta);
        filetime::set_file_times(dst, atime, mtime)
            .map_err(|e| SyncError::io(dst, FsOperation::SetTimes, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), SyncError> {
        fs::remove_file(path).map_err(|e| SyncError::io(path, FsOperation::RemoveFile, e))
    }

    fn remove_dir_recursive(&self, path: &Path) -> Result<(), SyncError> {
        fs::remove_dir_all(path).map_err(|e| SyncError::io(path, FsOperation::RemoveDir, e))
    }

    fn create_dir(&self, path: &Path) -> Result<(), SyncError> {
        fs::create_dir(path).map_err(|e| SyncError::io(path, FsOperation::CreateDir, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SyncError> {
        fs::create_dir_all(path).map_err(|e| SyncError::io(path, FsOperation::CreateDir, e))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, SyncError> {
        dunce::canonicalize(path).map_err(|e| SyncError::io(path, FsOperation::Stat, e))
    }
}
