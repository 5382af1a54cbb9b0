//! Recursive tree reconciliation
//!
//! Walks the source tree depth-first with an explicit work stack. At each
//! directory the file-level plan is applied first, then missing replica
//! subdirectories are created, replica-only subdirectories are removed
//! wholesale, and finally matched subdirectories are pushed for processing.
//! Siblings are visited in name order.

use crate::cancel::CancellationToken;
use crate::error::SyncError;
use crate::fs::FileSystem;
use crate::sink::EventSink;
use crate::tree::executor::ActionExecutor;
use crate::tree::level::plan_files;
use crate::tree::path::{resolve_root, roots_overlap};
use crate::tree::walker::{snapshot, IgnoreSet, Listing, SyncOptions};
use crate::types::{EntryKind, ReconciliationAction, SyncReport};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One directory pair waiting to be reconciled
#[derive(Debug)]
struct Frame {
    source: PathBuf,
    replica: PathBuf,
    depth: usize,
    /// Canonical source paths from the root down to the parent, when following links
    ancestors: Vec<PathBuf>,
}

/// Per-pass state shared by every frame
struct PassScope {
    replica_root: PathBuf,
    ignore: IgnoreSet,
}

/// Converges a replica tree onto a source tree, one pass at a time
pub struct TreeReconciler<'a> {
    fs: &'a dyn FileSystem,
    options: &'a SyncOptions,
    sink: &'a dyn EventSink,
    cancel: &'a CancellationToken,
    executor: ActionExecutor<'a>,
}

impl<'a> TreeReconciler<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        options: &'a SyncOptions,
        sink: &'a dyn EventSink,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            fs,
            options,
            sink,
            cancel,
            executor: ActionExecutor::new(fs, sink),
        }
    }

    /// Run one full pass.
    ///
    /// `Err` means the pass could not start or the replica root could not be
    /// prepared; nothing below the roots has been touched in that case.
    /// Per-item failures are collected in the returned report instead.
    pub fn run(&self, source_root: &Path, replica_root: &Path) -> Result<SyncReport, SyncError> {
        let ignore = self.options.ignore_set()?;

        match self.fs.entry_kind(source_root, true)? {
            None => return Err(SyncError::RootMissing(source_root.to_path_buf())),
            Some(EntryKind::Directory) => {}
            Some(_) => return Err(SyncError::SourceNotDirectory(source_root.to_path_buf())),
        }

        let source_root = resolve_root(self.fs, source_root);
        let replica_root = resolve_root(self.fs, replica_root);
        if roots_overlap(&source_root, &replica_root) {
            return Err(SyncError::OverlappingRoots {
                source_root,
                replica_root,
            });
        }

        let mut report = SyncReport::default();

        match self.fs.entry_kind(&replica_root, true)? {
            Some(EntryKind::Directory) => {}
            Some(_) => return Err(SyncError::ReplicaNotDirectory(replica_root)),
            None => {
                self.executor.create_root(&replica_root)?;
                report.actions.push(ReconciliationAction::CreateDir {
                    replica: replica_root.clone(),
                });
            }
        }

        let scope = PassScope {
            replica_root: replica_root.clone(),
            ignore,
        };
        let mut stack = vec![Frame {
            source: source_root,
            replica: replica_root,
            depth: 0,
            ancestors: Vec::new(),
        }];

        while let Some(frame) = stack.pop() {
            if self.cancel.is_cancelled() {
                debug!(path = %frame.source.display(), "Pass cancelled");
                report.cancelled = true;
                break;
            }
            self.reconcile_directory(&scope, frame, &mut stack, &mut report);
        }

        Ok(report)
    }

    fn reconcile_directory(
        &self,
        scope: &PassScope,
        frame: Frame,
        stack: &mut Vec<Frame>,
        report: &mut SyncReport,
    ) {
        debug!(
            source = %frame.source.display(),
            replica = %frame.replica.display(),
            depth = frame.depth,
            "Reconciling directory"
        );

        let mut ancestors = frame.ancestors;
        if self.options.follow_symlinks {
            let canonical = match self.fs.canonicalize(&frame.source) {
                Ok(path) => path,
                Err(e) => return self.record(report, e),
            };
            if ancestors.contains(&canonical) {
                return self.record(report, SyncError::SymlinkCycle(frame.source));
            }
            // Mirroring the replica into itself would grow it on every pass.
            if canonical.starts_with(&scope.replica_root) {
                return self.record(report, SyncError::LinkIntoReplica(frame.source));
            }
            ancestors.push(canonical);
        }

        // A source listing failure must not be mistaken for an empty source.
        let source = match snapshot(
            self.fs,
            &frame.source,
            self.options.follow_symlinks,
            &scope.ignore,
        ) {
            Ok(listing) => listing,
            Err(e) => return self.record(report, e),
        };
        let replica = match snapshot(self.fs, &frame.replica, false, &scope.ignore) {
            Ok(listing) => listing,
            Err(e) => return self.record(report, e),
        };

        self.report_others(&frame.source, &source, report);
        self.report_others(&frame.replica, &replica, report);

        let plan = plan_files(self.fs, &frame.source, &frame.replica, &source, &replica);
        for err in plan.errors {
            self.record(report, err);
        }
        for action in plan.actions {
            self.apply(action, report);
        }

        // File actions may have changed what sits at a directory name.
        let replica = match snapshot(self.fs, &frame.replica, false, &scope.ignore) {
            Ok(listing) => listing,
            Err(e) => return self.record(report, e),
        };

        let mut children = Vec::new();
        for name in &source.directories {
            let source_child = frame.source.join(name);
            let replica_child = frame.replica.join(name);
            let depth = frame.depth + 1;

            if let Some(limit) = self.options.max_depth {
                if depth > limit {
                    self.record(
                        report,
                        SyncError::DepthLimitExceeded {
                            path: source_child,
                            limit,
                        },
                    );
                    continue;
                }
            }

            let ready = match replica.kind_of(name) {
                Some(EntryKind::Directory) => true,
                None => self.apply(
                    ReconciliationAction::CreateDir {
                        replica: replica_child.clone(),
                    },
                    report,
                ),
                // Other was reported above; a File here means its deletion failed.
                Some(EntryKind::File) | Some(EntryKind::Other) => false,
            };

            if ready {
                children.push(Frame {
                    source: source_child,
                    replica: replica_child,
                    depth,
                    ancestors: ancestors.clone(),
                });
            }
        }

        for name in &replica.directories {
            if source.kind_of(name) != Some(EntryKind::Directory) {
                self.apply(
                    ReconciliationAction::DeleteDir {
                        replica: frame.replica.join(name),
                    },
                    report,
                );
            }
        }

        // Reversed so the first child in name order is processed next.
        stack.extend(children.into_iter().rev());
    }

    /// Apply one action; true on success
    fn apply(&self, action: ReconciliationAction, report: &mut SyncReport) -> bool {
        match self.executor.apply(&action) {
            Ok(_) => {
                report.actions.push(action);
                true
            }
            Err(e) => {
                self.record(report, e);
                false
            }
        }
    }

    fn record(&self, report: &mut SyncReport, err: SyncError) {
        self.sink.on_error(&err);
        report.errors.push(err);
    }

    fn report_others(&self, dir: &Path, listing: &Listing, report: &mut SyncReport) {
        for name in &listing.others {
            let path = dir.join(name);
            self.sink.on_skip(&path, EntryKind::Other);
            report.skipped.push(path);
        }
    }
}
