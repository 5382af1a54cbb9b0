//! Pass scheduling
//!
//! Runs one pass, sleeps for the configured interval, and repeats until
//! cancelled or a pass limit is reached. Passes never overlap. A fatal pass is
//! logged and retried on the next interval; there is no in-pass retry.

use crate::cancel::CancellationToken;
use crate::config::MirrorConfig;
use crate::error::{ApiError, SyncError};
use crate::fs::FileSystem;
use crate::sink::EventSink;
use crate::tree::synchronize;
use crate::tree::walker::SyncOptions;
use crate::types::{ActionKind, SyncReport};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Granularity of the inter-pass sleep, bounding how long a stop request waits
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Totals across all passes a driver has run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriverSummary {
    pub passes: usize,
    pub actions: usize,
    pub item_errors: usize,
    pub fatal_passes: usize,
    pub cancelled: bool,
}

impl DriverSummary {
    fn record(&mut self, outcome: &Result<SyncReport, SyncError>) {
        self.passes += 1;
        match outcome {
            Ok(report) => {
                self.actions += report.actions.len();
                self.item_errors += report.errors.len();
                self.cancelled |= report.cancelled;
            }
            Err(_) => self.fatal_passes += 1,
        }
    }
}

/// Drives repeated synchronization passes between two fixed roots
pub struct SyncDriver<'a> {
    fs: &'a dyn FileSystem,
    sink: &'a dyn EventSink,
    cancel: CancellationToken,
    source: PathBuf,
    replica: PathBuf,
    interval: Duration,
    options: SyncOptions,
}

impl<'a> SyncDriver<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        sink: &'a dyn EventSink,
        cancel: CancellationToken,
        source: PathBuf,
        replica: PathBuf,
        interval: Duration,
        options: SyncOptions,
    ) -> Self {
        Self {
            fs,
            sink,
            cancel,
            source,
            replica,
            interval,
            options,
        }
    }

    /// Build a driver from a validated configuration
    pub fn from_config(
        config: &MirrorConfig,
        fs: &'a dyn FileSystem,
        sink: &'a dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<Self, ApiError> {
        config.ensure_valid()?;
        let (Some(source), Some(replica)) = (config.source.clone(), config.replica.clone()) else {
            return Err(ApiError::ConfigError(
                "source and replica are required".to_string(),
            ));
        };

        Ok(Self::new(
            fs,
            sink,
            cancel,
            source,
            replica,
            Duration::from_secs(config.interval_secs),
            config.sync.clone(),
        ))
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a single pass and log its summary
    pub fn run_once(&self) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        info!(
            source = %self.source.display(),
            replica = %self.replica.display(),
            "Synchronization pass starting"
        );

        let outcome = synchronize(
            self.fs,
            &self.source,
            &self.replica,
            &self.options,
            self.sink,
            &self.cancel,
        );

        let elapsed_ms = started.elapsed().as_millis();
        match &outcome {
            Ok(report) => info!(
                actions = report.actions.len(),
                copied = report.count(ActionKind::Copy),
                updated = report.count(ActionKind::Update),
                deleted_files = report.count(ActionKind::DeleteFile),
                created_dirs = report.count(ActionKind::CreateDir),
                deleted_dirs = report.count(ActionKind::DeleteDir),
                errors = report.errors.len(),
                skipped = report.skipped.len(),
                cancelled = report.cancelled,
                elapsed_ms = elapsed_ms as u64,
                "Synchronization pass finished"
            ),
            Err(e) => error!(error = %e, elapsed_ms = elapsed_ms as u64, "Synchronization pass aborted"),
        }

        outcome
    }

    /// Loop until cancelled
    pub fn run(&self) -> DriverSummary {
        self.run_passes(None)
    }

    /// Loop until cancelled or `limit` passes have run
    pub fn run_passes(&self, limit: Option<usize>) -> DriverSummary {
        let mut summary = DriverSummary::default();

        loop {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let outcome = self.run_once();
            summary.record(&outcome);

            if limit.is_some_and(|max| summary.passes >= max) {
                break;
            }
            if !self.sleep_interval() {
                summary.cancelled = true;
                break;
            }
        }

        info!(
            passes = summary.passes,
            actions = summary.actions,
            errors = summary.item_errors,
            fatal = summary.fatal_passes,
            "Driver stopped"
        );
        summary
    }

    /// Sleep for the interval; false if cancelled meanwhile
    fn sleep_interval(&self) -> bool {
        let deadline = Instant::now() + self.interval;
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
