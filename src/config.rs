//! Configuration System
//!
//! Layered configuration for the mirroring driver: built-in defaults, the
//! global config file, an explicit `--config` file and `TREEMIRROR_*`
//! environment variables, in ascending precedence. CLI flags are applied on
//! top by the caller.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::walker::SyncOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

mod merge_policy;
mod sources;

pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Seconds between the end of one pass and the start of the next
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Directory to mirror from
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Directory to mirror into
    #[serde(default)]
    pub replica: Option<PathBuf>,

    /// Delay between passes, in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Traversal options for each pass
    #[serde(default)]
    pub sync: SyncOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            source: None,
            replica: None,
            interval_secs: default_interval_secs(),
            sync: SyncOptions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Missing(&'static str),
    Interval(String),
    Roots(String),
    Sync(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "Missing required setting '{}'", field),
            ValidationError::Interval(msg) => write!(f, "Interval: {}", msg),
            ValidationError::Roots(msg) => write!(f, "Roots: {}", msg),
            ValidationError::Sync(msg) => write!(f, "Sync: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl MirrorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.source.is_none() {
            errors.push(ValidationError::Missing("source"));
        }
        if self.replica.is_none() {
            errors.push(ValidationError::Missing("replica"));
        }
        if let (Some(source), Some(replica)) = (&self.source, &self.replica) {
            if source == replica {
                errors.push(ValidationError::Roots(format!(
                    "source and replica are the same path: {}",
                    source.display()
                )));
            }
        }

        if self.interval_secs == 0 {
            errors.push(ValidationError::Interval(
                "must be at least one second".to_string(),
            ));
        }

        if let Err(e) = self.sync.ignore_set() {
            errors.push(ValidationError::Sync(e.to_string()));
        }

        if let Err(e) = crate::logging::validate(&self.logging) {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all errors into one [`ApiError`]
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

/// Loads [`MirrorConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then global file, then `explicit` (if given), then environment.
    pub fn load(explicit: Option<&Path>) -> Result<MirrorConfig, ApiError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            builder = sources::explicit_file::add_to_builder(builder, path)?;
        }
        builder = sources::environment::add_to_builder(builder);

        let config = builder.build()?.try_deserialize::<MirrorConfig>()?;
        Ok(config)
    }

    /// Load a single TOML file over defaults, ignoring other sources
    pub fn load_from_file(path: &Path) -> Result<MirrorConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = sources::explicit_file::add_to_builder(builder, path)?;
        Ok(builder.build()?.try_deserialize::<MirrorConfig>()?)
    }

    /// Global config path, if HOME or XDG_CONFIG_HOME is set
    pub fn global_config_path() -> Option<PathBuf> {
        global_config_path()
    }
}
