//! CLI route: merge flags over loaded configuration and run the driver.

use crate::cancel::CancellationToken;
use crate::cli::output::{exit_code, EXIT_OK};
use crate::cli::parse::Cli;
use crate::cli::prompt::prompt_for_settings;
use crate::config::{ConfigLoader, MirrorConfig};
use crate::driver::SyncDriver;
use crate::error::ApiError;
use crate::fs::LocalFs;
use crate::sink::TracingSink;
use tracing::{info, warn};

/// Build the effective configuration.
/// Precedence: CLI flags override environment override config files override defaults.
pub fn build_config(cli: &Cli) -> Result<MirrorConfig, ApiError> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;

    if let Some(ref source) = cli.source {
        config.source = Some(source.clone());
    }
    if let Some(ref replica) = cli.replica {
        config.replica = Some(replica.clone());
    }
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    if cli.follow_symlinks {
        config.sync.follow_symlinks = true;
    }
    if cli.max_depth.is_some() {
        config.sync.max_depth = cli.max_depth;
    }
    config.sync.ignore_patterns.extend(cli.ignore.iter().cloned());

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.logging.file = Some(file.clone());
    }

    Ok(config)
}

/// Runtime context for CLI execution: the effective config and the stop token.
pub struct RunContext {
    config: MirrorConfig,
    cancel: CancellationToken,
    passes: Option<usize>,
}

impl RunContext {
    /// Build the context from parsed flags, prompting first when `--interactive` is set.
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let mut config = build_config(cli)?;
        if cli.interactive {
            prompt_for_settings(&mut config)?;
        }

        let passes = if cli.once { Some(1) } else { cli.passes };

        Ok(Self {
            config,
            cancel: CancellationToken::new(),
            passes,
        })
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run passes until stopped; returns the process exit code.
    pub fn execute(&self) -> Result<i32, ApiError> {
        self.config.ensure_valid()?;

        if let Err(e) = self.cancel.register_signals() {
            warn!(error = %e, "Failed to install signal handlers; stop with SIGKILL");
        }

        let fs = LocalFs::new();
        let sink = TracingSink;
        let driver = SyncDriver::from_config(&self.config, &fs, &sink, self.cancel.clone())?;

        info!(
            interval_secs = self.config.interval_secs,
            passes = ?self.passes,
            "Starting synchronization"
        );
        let summary = driver.run_passes(self.passes);

        if summary.cancelled && summary.fatal_passes == 0 && summary.item_errors == 0 {
            return Ok(EXIT_OK);
        }
        Ok(exit_code(&summary))
    }
}
