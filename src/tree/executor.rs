//! Applies reconciliation actions to the replica and reports each one

use crate::error::SyncError;
use crate::fs::FileSystem;
use crate::sink::EventSink;
use crate::types::{ReconciliationAction, SyncEvent};
use std::path::Path;

/// Performs the filesystem mutation named by each action.
///
/// A successful mutation produces exactly one [`SyncEvent`], delivered to the
/// sink before it is returned. A failed one produces no event.
pub struct ActionExecutor<'a> {
    fs: &'a dyn FileSystem,
    sink: &'a dyn EventSink,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(fs: &'a dyn FileSystem, sink: &'a dyn EventSink) -> Self {
        Self { fs, sink }
    }

    pub fn apply(&self, action: &ReconciliationAction) -> Result<SyncEvent, SyncError> {
        match action {
            ReconciliationAction::Copy { source, replica }
            | ReconciliationAction::Update { source, replica } => {
                self.fs.copy_with_metadata(source, replica)?
            }
            ReconciliationAction::DeleteFile { replica } => self.fs.remove_file(replica)?,
            ReconciliationAction::CreateDir { replica } => self.fs.create_dir(replica)?,
            ReconciliationAction::DeleteDir { replica } => self.fs.remove_dir_recursive(replica)?,
        }

        Ok(self.emit(action))
    }

    /// Create the replica root along with any missing ancestors.
    pub fn create_root(&self, replica_root: &Path) -> Result<SyncEvent, SyncError> {
        self.fs.create_dir_all(replica_root)?;
        Ok(self.emit(&ReconciliationAction::CreateDir {
            replica: replica_root.to_path_buf(),
        }))
    }

    fn emit(&self, action: &ReconciliationAction) -> SyncEvent {
        let event = SyncEvent::from_action(action);
        self.sink.on_event(&event);
        event
    }
}
