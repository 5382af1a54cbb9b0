//! Error types for the treemirror synchronization engine.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem step that failed, carried by [`SyncError::Io`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    List,
    Stat,
    Read,
    Copy,
    SetTimes,
    RemoveFile,
    RemoveDir,
    CreateDir,
}

impl FsOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FsOperation::List => "list",
            FsOperation::Stat => "stat",
            FsOperation::Read => "read",
            FsOperation::Copy => "copy",
            FsOperation::SetTimes => "set-times",
            FsOperation::RemoveFile => "remove-file",
            FsOperation::RemoveDir => "remove-dir",
            FsOperation::CreateDir => "create-dir",
        }
    }
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while reconciling a replica against its source
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error during {operation} of {path:?}: {source}")]
    Io {
        path: PathBuf,
        operation: FsOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("Source root does not exist: {0:?}")]
    RootMissing(PathBuf),

    #[error("Source root is not a directory: {0:?}")]
    SourceNotDirectory(PathBuf),

    #[error("Replica root exists but is not a directory: {0:?}")]
    ReplicaNotDirectory(PathBuf),

    #[error("Source {source_root:?} and replica {replica_root:?} overlap")]
    OverlappingRoots {
        source_root: PathBuf,
        replica_root: PathBuf,
    },

    #[error("Directory cycle through symbolic link at {0:?}")]
    SymlinkCycle(PathBuf),

    #[error("Directory {path:?} is deeper than the configured limit of {limit}")]
    DepthLimitExceeded { path: PathBuf, limit: usize },

    #[error("Source directory {0:?} resolves into the replica tree")]
    LinkIntoReplica(PathBuf),

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, operation: FsOperation, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Fatal errors abort the whole pass; everything else is recorded per item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::RootMissing(_)
                | SyncError::SourceNotDirectory(_)
                | SyncError::ReplicaNotDirectory(_)
                | SyncError::OverlappingRoots { .. }
                | SyncError::InvalidPattern { .. }
        )
    }

    /// Path the error is about, if it concerns one
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SyncError::Io { path, .. }
            | SyncError::RootMissing(path)
            | SyncError::SourceNotDirectory(path)
            | SyncError::ReplicaNotDirectory(path)
            | SyncError::SymlinkCycle(path)
            | SyncError::LinkIntoReplica(path)
            | SyncError::DepthLimitExceeded { path, .. } => Some(path),
            SyncError::OverlappingRoots { replica_root, .. } => Some(replica_root),
            SyncError::InvalidPattern { .. } => None,
        }
    }
}

/// Driver-facing errors: configuration, logging setup and fatal passes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Prompt failed: {0}")]
    PromptError(String),

    #[error("Synchronization failed: {0}")]
    SyncError(#[from] SyncError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
