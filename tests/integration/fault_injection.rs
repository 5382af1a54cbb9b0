//! Item-level failures injected through a wrapping filesystem

use crate::integration::test_utils::{roots, tree_contents, write, Roots};
use std::collections::HashSet;
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use treemirror::{
    synchronize, ActionKind, CancellationToken, DirectoryEntry, EntryKind, FileSystem,
    FsOperation, LocalFs, MemorySink, SyncError, SyncOptions, SyncReport,
};

/// Delegates to [`LocalFs`], failing operations on entries with chosen names
#[derive(Default)]
struct FaultFs {
    fail_list: HashSet<OsString>,
    fail_read: HashSet<OsString>,
    fail_copy: HashSet<OsString>,
    fail_remove: HashSet<OsString>,
    /// Names deleted from disk right after their directory is listed
    vanish: HashSet<OsString>,
    local: LocalFs,
}

impl FaultFs {
    fn hit(set: &HashSet<OsString>, path: &Path) -> bool {
        path.file_name().is_some_and(|name| set.contains(name))
    }

    fn denied(path: &Path, operation: FsOperation) -> SyncError {
        SyncError::io(
            path,
            operation,
            io::Error::new(io::ErrorKind::PermissionDenied, "injected fault"),
        )
    }
}

impl FileSystem for FaultFs {
    fn list_entries(
        &self,
        dir: &Path,
        follow_symlinks: bool,
    ) -> Result<Vec<DirectoryEntry>, SyncError> {
        if Self::hit(&self.fail_list, dir) {
            return Err(Self::denied(dir, FsOperation::List));
        }
        let entries = self.local.list_entries(dir, follow_symlinks)?;
        for entry in &entries {
            if self.vanish.contains(&entry.name) {
                let _ = std::fs::remove_file(dir.join(&entry.name));
            }
        }
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        self.local.exists(path)
    }

    fn entry_kind(
        &self,
        path: &Path,
        follow_symlinks: bool,
    ) -> Result<Option<EntryKind>, SyncError> {
        self.local.entry_kind(path, follow_symlinks)
    }

    fn open_read<'a>(&'a self, path: &Path) -> Result<Box<dyn Read + 'a>, SyncError> {
        if Self::hit(&self.fail_read, path) {
            return Err(Self::denied(path, FsOperation::Read));
        }
        self.local.open_read(path)
    }

    fn copy_with_metadata(&self, src: &Path, dst: &Path) -> Result<(), SyncError> {
        if Self::hit(&self.fail_copy, dst) {
            return Err(Self::denied(dst, FsOperation::Copy));
        }
        self.local.copy_with_metadata(src, dst)
    }

    fn remove_file(&self, path: &Path) -> Result<(), SyncError> {
        if Self::hit(&self.fail_remove, path) {
            return Err(Self::denied(path, FsOperation::RemoveFile));
        }
        self.local.remove_file(path)
    }

    fn remove_dir_recursive(&self, path: &Path) -> Result<(), SyncError> {
        if Self::hit(&self.fail_remove, path) {
            return Err(Self::denied(path, FsOperation::RemoveDir));
        }
        self.local.remove_dir_recursive(path)
    }

    fn create_dir(&self, path: &Path) -> Result<(), SyncError> {
        self.local.create_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SyncError> {
        self.local.create_dir_all(path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, SyncError> {
        self.local.canonicalize(path)
    }
}

fn names(list: &[&str]) -> HashSet<OsString> {
    list.iter().map(OsString::from).collect()
}

fn run(fs: &FaultFs, roots: &Roots, sink: &MemorySink) -> SyncReport {
    synchronize(
        fs,
        &roots.source,
        &roots.replica,
        &SyncOptions::default(),
        sink,
        &CancellationToken::new(),
    )
    .unwrap()
}

fn io_operation(err: &SyncError) -> Option<FsOperation> {
    match err {
        SyncError::Io { operation, .. } => Some(*operation),
        _ => None,
    }
}

/// A failed copy is reported once and the rest of the pass continues
#[test]
fn test_copy_failure_does_not_abort_pass() {
    let roots = roots();
    write(&roots.source, "a.txt", "a");
    write(&roots.source, "bad.txt", "bad");
    write(&roots.source, "z/inner.txt", "inner");

    let fs = FaultFs {
        fail_copy: names(&["bad.txt"]),
        ..FaultFs::default()
    };
    let sink = MemorySink::new();
    let report = run(&fs, &roots, &sink);

    assert_eq!(report.errors.len(), 1);
    assert_eq!(io_operation(&report.errors[0]), Some(FsOperation::Copy));
    assert_eq!(report.errors[0].path(), Some(roots.replica.join("bad.txt").as_path()));
    assert_eq!(sink.errors().len(), 1);
    assert!(roots.replica.join("a.txt").exists());
    assert!(roots.replica.join("z/inner.txt").exists());
    assert!(!roots.replica.join("bad.txt").exists());
    // No event for the failed action
    assert!(!sink.events().iter().any(|e| e.replica.ends_with("bad.txt")));
    assert_eq!(sink.events().len(), report.actions.len());
}

/// An unreadable file cannot be compared, so it is neither updated nor deleted
#[test]
fn test_unreadable_file_is_left_alone() {
    let roots = roots();
    write(&roots.source, "locked.txt", "new");
    write(&roots.replica, "locked.txt", "old");
    write(&roots.source, "fine.txt", "new");
    write(&roots.replica, "fine.txt", "old");

    let fs = FaultFs {
        fail_read: names(&["locked.txt"]),
        ..FaultFs::default()
    };
    let report = run(&fs, &roots, &MemorySink::new());

    assert_eq!(report.errors.len(), 1);
    assert_eq!(io_operation(&report.errors[0]), Some(FsOperation::Read));
    assert_eq!(report.count(ActionKind::Update), 1);
    assert_eq!(
        std::fs::read_to_string(roots.replica.join("locked.txt")).unwrap(),
        "old"
    );
    assert_eq!(
        std::fs::read_to_string(roots.replica.join("fine.txt")).unwrap(),
        "new"
    );
}

/// An unlistable source directory is never mistaken for an empty one
#[test]
fn test_unlistable_source_directory_protects_replica() {
    let roots = roots();
    write(&roots.source, "secret/data.txt", "data");
    write(&roots.source, "open/data.txt", "data");
    write(&roots.replica, "secret/data.txt", "data");
    write(&roots.replica, "secret/replica_only.txt", "keep me");

    let fs = FaultFs {
        fail_list: names(&["secret"]),
        ..FaultFs::default()
    };
    let report = run(&fs, &roots, &MemorySink::new());

    assert_eq!(report.errors.len(), 1);
    assert_eq!(io_operation(&report.errors[0]), Some(FsOperation::List));
    assert!(roots.replica.join("secret/replica_only.txt").exists());
    assert!(roots.replica.join("open/data.txt").exists());
}

/// A file that vanishes between listing and copying is an item error
#[test]
fn test_file_vanishing_mid_pass() {
    let roots = roots();
    write(&roots.source, "ephemeral.txt", "gone soon");
    write(&roots.source, "stable.txt", "stable");

    let fs = FaultFs {
        vanish: names(&["ephemeral.txt"]),
        ..FaultFs::default()
    };
    let report = run(&fs, &roots, &MemorySink::new());

    assert_eq!(report.errors.len(), 1);
    assert_eq!(io_operation(&report.errors[0]), Some(FsOperation::Stat));
    assert_eq!(report.errors[0].path(), Some(roots.source.join("ephemeral.txt").as_path()));
    assert!(roots.replica.join("stable.txt").exists());

    // The next pass sees a consistent source and converges
    let second = run(&FaultFs::default(), &roots, &MemorySink::new());
    assert!(second.is_clean());
    assert_eq!(tree_contents(&roots.replica), tree_contents(&roots.source));
}

/// A replica directory that cannot be removed keeps the rest of the pass going
#[test]
fn test_failed_directory_delete_is_reported() {
    let roots = roots();
    write(&roots.source, "kept.txt", "kept");
    write(&roots.replica, "stuck/file.txt", "stuck");
    write(&roots.replica, "loose/file.txt", "loose");

    let fs = FaultFs {
        fail_remove: names(&["stuck"]),
        ..FaultFs::default()
    };
    let report = run(&fs, &roots, &MemorySink::new());

    assert_eq!(report.errors.len(), 1);
    assert_eq!(io_operation(&report.errors[0]), Some(FsOperation::RemoveDir));
    assert!(roots.replica.join("stuck").exists());
    assert!(!roots.replica.join("loose").exists());
    assert!(roots.replica.join("kept.txt").exists());
}
