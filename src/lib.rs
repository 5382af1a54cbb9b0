//! Treemirror: One-Way Directory Mirroring
//!
//! Converges a replica directory tree onto a source tree: after each pass the
//! replica's files and subdirectories are byte-for-byte identical to the
//! source's, and anything that exists only in the replica is removed.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod fs;
pub mod logging;
pub mod sink;
pub mod tree;
pub mod types;

pub use cancel::CancellationToken;
pub use error::{ApiError, FsOperation, SyncError};
pub use fs::{FileSystem, LocalFs};
pub use sink::{EventSink, MemorySink, TracingSink};
pub use tree::walker::SyncOptions;
pub use tree::{synchronize, synchronize_local};
pub use types::{
    ActionKind, DirectoryEntry, EntryKind, Fingerprint, ReconciliationAction, SyncEvent,
    SyncReport,
};
