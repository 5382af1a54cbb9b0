//! File-level diff of one source/replica directory pair
//!
//! Only the immediate files of each directory are compared here. Subdirectories
//! are the tree reconciler's business; `Other` entries are never acted on.

use crate::error::SyncError;
use crate::fs::FileSystem;
use crate::tree::hasher::{fingerprint_file, to_hex};
use crate::tree::walker::{snapshot, Listing, SyncOptions};
use crate::types::{EntryKind, ReconciliationAction};
use std::path::Path;
use tracing::{debug, trace};

/// Actions computed for one directory level, plus the items that could not be compared
#[derive(Debug, Default)]
pub struct LevelPlan {
    pub actions: Vec<ReconciliationAction>,
    pub errors: Vec<SyncError>,
}

/// Snapshot both directories and compute their file-level actions.
///
/// Links are followed on the source side only when `options` asks for it,
/// and never on the replica side.
pub fn reconcile_files(
    fs: &dyn FileSystem,
    source_dir: &Path,
    replica_dir: &Path,
    options: &SyncOptions,
) -> Result<LevelPlan, SyncError> {
    let ignore = options.ignore_set()?;
    let source = snapshot(fs, source_dir, options.follow_symlinks, &ignore)?;
    let replica = snapshot(fs, replica_dir, false, &ignore)?;
    Ok(plan_files(fs, source_dir, replica_dir, &source, &replica))
}

/// Compute file-level actions from two listings taken beforehand.
///
/// Each replica path appears in at most one action, except when a replica
/// directory stands where the source has a file: that name gets `DeleteDir`
/// immediately followed by `Copy`.
pub fn plan_files(
    fs: &dyn FileSystem,
    source_dir: &Path,
    replica_dir: &Path,
    source: &Listing,
    replica: &Listing,
) -> LevelPlan {
    let mut plan = LevelPlan::default();

    for name in &source.files {
        let source_path = source_dir.join(name);
        let replica_path = replica_dir.join(name);

        match replica.kind_of(name) {
            None => plan.actions.push(ReconciliationAction::Copy {
                source: source_path,
                replica: replica_path,
            }),
            Some(EntryKind::File) => {
                let source_hash = match fingerprint_file(fs, &source_path) {
                    Ok(hash) => hash,
                    Err(e) => {
                        plan.errors.push(e);
                        continue;
                    }
                };
                let replica_hash = match fingerprint_file(fs, &replica_path) {
                    Ok(hash) => hash,
                    Err(e) => {
                        plan.errors.push(e);
                        continue;
                    }
                };

                if source_hash != replica_hash {
                    debug!(
                        path = %replica_path.display(),
                        source_hash = %to_hex(&source_hash),
                        replica_hash = %to_hex(&replica_hash),
                        "Content differs"
                    );
                    plan.actions.push(ReconciliationAction::Update {
                        source: source_path,
                        replica: replica_path,
                    });
                } else {
                    trace!(path = %replica_path.display(), "Unchanged");
                }
            }
            Some(EntryKind::Directory) => {
                plan.actions.push(ReconciliationAction::DeleteDir {
                    replica: replica_path.clone(),
                });
                plan.actions.push(ReconciliationAction::Copy {
                    source: source_path,
                    replica: replica_path,
                });
            }
            // Never write through a link or device on the replica side
            Some(EntryKind::Other) => {}
        }
    }

    for name in &replica.files {
        if source.kind_of(name) != Some(EntryKind::File) {
            plan.actions.push(ReconciliationAction::DeleteFile {
                replica: replica_dir.join(name),
            });
        }
    }

    plan
}
