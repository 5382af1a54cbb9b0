//! Event sinks
//!
//! The core produces [`SyncEvent`] values and hands them to an injected
//! [`EventSink`]; it never configures or touches global logging state itself.

use crate::error::SyncError;
use crate::types::{ActionKind, EntryKind, SyncEvent};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Receiver for everything a pass wants to report
pub trait EventSink {
    /// Called once per successfully applied action
    fn on_event(&self, event: &SyncEvent);

    /// Called once per item-level error
    fn on_error(&self, _error: &SyncError) {}

    /// Called once per entry left untouched on purpose
    fn on_skip(&self, _path: &Path, _kind: EntryKind) {}
}

/// Sink that forwards to `tracing`, for use by the driver
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &SyncEvent) {
        let replica = event.replica.display();
        match (&event.source, event.kind) {
            (Some(source), ActionKind::Copy) => {
                info!(action = %event.kind, source = %source.display(), replica = %replica, "Copied file")
            }
            (Some(source), ActionKind::Update) => {
                info!(action = %event.kind, source = %source.display(), replica = %replica, "Updated file")
            }
            (_, ActionKind::DeleteFile) => {
                info!(action = %event.kind, replica = %replica, "Deleted file")
            }
            (_, ActionKind::CreateDir) => {
                info!(action = %event.kind, replica = %replica, "Created folder")
            }
            (_, ActionKind::DeleteDir) => {
                info!(action = %event.kind, replica = %replica, "Deleted folder")
            }
            (None, kind) => info!(action = %kind, replica = %replica, "Applied action"),
        }
    }

    fn on_error(&self, err: &SyncError) {
        match err.path() {
            Some(path) => error!(path = %path.display(), error = %err, "Synchronization error"),
            None => error!(error = %err, "Synchronization error"),
        }
    }

    fn on_skip(&self, path: &Path, kind: EntryKind) {
        warn!(path = %path.display(), kind = ?kind, "Skipping entry that is not a regular file or directory");
    }
}

/// Sink that records everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SyncEvent>>,
    errors: Mutex<Vec<String>>,
    skips: Mutex<Vec<PathBuf>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().clone()
    }

    /// Rendered error messages, in the order reported
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn skips(&self) -> Vec<PathBuf> {
        self.skips.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
        self.errors.lock().clear();
        self.skips.lock().clear();
    }
}

impl EventSink for MemorySink {
    fn on_event(&self, event: &SyncEvent) {
        self.events.lock().push(event.clone());
    }

    fn on_error(&self, error: &SyncError) {
        self.errors.lock().push(error.to_string());
    }

    fn on_skip(&self, path: &Path, _kind: EntryKind) {
        self.skips.lock().push(path.to_path_buf());
    }
}
