//! Cooperative cancellation
//!
//! The reconciler polls the token at the top of each directory step, so a stop
//! request lands at a safe point between directories rather than mid-copy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for registering with signal handlers
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Install SIGINT/SIGTERM handlers that set this token.
    pub fn register_signals(&self) -> std::io::Result<()> {
        signal_hook::flag::register(signal_hook::consts::SIGINT, self.flag())?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, self.flag())?;
        Ok(())
    }
}
