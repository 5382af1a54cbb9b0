//! Core data types shared by the reconciler, the executor and the driver.
//!
//! Everything here is transient: values are recomputed from live filesystem
//! state on every pass and never persisted.

use crate::error::SyncError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// BLAKE3 content digest of a file (32 bytes). Compared for equality only.
pub type Fingerprint = [u8; 32];

/// Classification of a directory entry as seen by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    /// Symbolic links (when not followed), devices, sockets, fifos
    Other,
}

/// One immediate child of a directory
///
/// Names are compared exactly as the filesystem reports them; no case or
/// Unicode normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// One unit of filesystem change computed for a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconciliationAction {
    Copy { source: PathBuf, replica: PathBuf },
    Update { source: PathBuf, replica: PathBuf },
    DeleteFile { replica: PathBuf },
    CreateDir { replica: PathBuf },
    DeleteDir { replica: PathBuf },
}

impl ReconciliationAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ReconciliationAction::Copy { .. } => ActionKind::Copy,
            ReconciliationAction::Update { .. } => ActionKind::Update,
            ReconciliationAction::DeleteFile { .. } => ActionKind::DeleteFile,
            ReconciliationAction::CreateDir { .. } => ActionKind::CreateDir,
            ReconciliationAction::DeleteDir { .. } => ActionKind::DeleteDir,
        }
    }

    /// Source path, for actions that read from the source tree
    pub fn source_path(&self) -> Option<&Path> {
        match self {
            ReconciliationAction::Copy { source, .. }
            | ReconciliationAction::Update { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Replica path the action mutates
    pub fn replica_path(&self) -> &Path {
        match self {
            ReconciliationAction::Copy { replica, .. }
            | ReconciliationAction::Update { replica, .. }
            | ReconciliationAction::DeleteFile { replica }
            | ReconciliationAction::CreateDir { replica }
            | ReconciliationAction::DeleteDir { replica } => replica,
        }
    }
}

/// Tag of a [`ReconciliationAction`], without its paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Copy,
    Update,
    DeleteFile,
    CreateDir,
    DeleteDir,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Copy => "copy",
            ActionKind::Update => "update",
            ActionKind::DeleteFile => "delete_file",
            ActionKind::CreateDir => "create_dir",
            ActionKind::DeleteDir => "delete_dir",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable record emitted after an action has been applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub replica: PathBuf,
    pub timestamp: DateTime<Utc>,
}

impl SyncEvent {
    pub fn from_action(action: &ReconciliationAction) -> Self {
        Self {
            kind: action.kind(),
            source: action.source_path().map(Path::to_path_buf),
            replica: action.replica_path().to_path_buf(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of one non-fatal pass
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Actions applied successfully, in application order
    pub actions: Vec<ReconciliationAction>,
    /// Item-level failures; the pass continued past each of them
    pub errors: Vec<SyncError>,
    /// Entries deliberately left untouched (kind `Other`, or a name clash with one)
    pub skipped: Vec<PathBuf>,
    /// True if the pass stopped early on a cancellation request
    pub cancelled: bool,
}

impl SyncReport {
    /// A pass that applied nothing and hit no errors
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty() && self.errors.is_empty()
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|a| a.kind() == kind).count()
    }
}
