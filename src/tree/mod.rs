//! Tree reconciliation
//!
//! Diffs a source directory tree against a replica and applies the actions
//! needed to make the replica an exact mirror of the source.

pub mod executor;
pub mod hasher;
pub mod level;
pub mod path;
pub mod reconciler;
pub mod walker;

use crate::cancel::CancellationToken;
use crate::error::SyncError;
use crate::fs::{FileSystem, LocalFs};
use crate::sink::{EventSink, TracingSink};
use crate::types::SyncReport;
use reconciler::TreeReconciler;
use std::path::Path;
use walker::SyncOptions;

/// Run one synchronization pass of `replica_root` against `source_root`.
///
/// Calling it again with an unchanged source applies nothing. Only pass-fatal
/// conditions are returned as `Err`; item-level failures land in
/// [`SyncReport::errors`] and have already been delivered to `sink`.
pub fn synchronize(
    fs: &dyn FileSystem,
    source_root: &Path,
    replica_root: &Path,
    options: &SyncOptions,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> Result<SyncReport, SyncError> {
    TreeReconciler::new(fs, options, sink, cancel).run(source_root, replica_root)
}

/// [`synchronize`] on the local disk with default options, reporting through `tracing`
pub fn synchronize_local(source_root: &Path, replica_root: &Path) -> Result<SyncReport, SyncError> {
    synchronize(
        &LocalFs,
        source_root,
        replica_root,
        &SyncOptions::default(),
        &TracingSink,
        &CancellationToken::new(),
    )
}
