//! Merge rules: defaults first, then sources in ascending precedence.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("interval_secs", super::DEFAULT_INTERVAL_SECS as i64)?
        .set_default("sync.follow_symlinks", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "both")
}
