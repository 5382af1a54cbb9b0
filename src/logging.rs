//! Logging System
//!
//! Structured logging via `tracing`. This is the physical sink for the
//! events a pass produces: the driver configures it once at startup and the
//! core only ever emits through the injected [`crate::sink::EventSink`].

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, both (file and stdout)
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output includes a file). Resolved to the state
    /// directory when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "both".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Default log file: `<state dir>/treemirror.log`, falling back to the
/// working directory when no platform directory is available.
pub fn default_log_file_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "treemirror")
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .join("treemirror.log")
        })
        .unwrap_or_else(|| PathBuf::from("treemirror.log"))
}

/// Resolve the log file: explicit CLI path, then config, then default.
pub fn resolve_log_file_path(cli_path: Option<PathBuf>, config_path: Option<PathBuf>) -> PathBuf {
    cli_path.or(config_path).unwrap_or_else(default_log_file_path)
}

/// Initialize the global subscriber
///
/// Priority order (highest to lowest):
/// 1. Environment variables (TREEMIRROR_LOG, TREEMIRROR_LOG_FORMAT, TREEMIRROR_LOG_OUTPUT)
/// 2. The passed configuration (CLI flags already merged over the config file)
/// 3. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let filter = build_env_filter(config)?;
    let json = determine_format(config)? == "json";
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if output.stdout {
        layers.push(boxed_layer(json, use_color, std::io::stdout));
    }
    if output.stderr {
        layers.push(boxed_layer(json, use_color, std::io::stderr));
    }
    if output.file {
        let log_file = resolve_log_file_path(None, config.and_then(|c| c.file.clone()));
        let file = open_log_file(&log_file)?;
        layers.push(boxed_layer(json, false, Mutex::new(file)));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| ApiError::LoggingError(format!("Failed to install subscriber: {}", e)))
}

fn boxed_layer<W>(json: bool, ansi: bool, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed()
    }
}

fn open_log_file(log_file: &Path) -> Result<std::fs::File, ApiError> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::LoggingError(format!("Failed to create log directory: {}", e))
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            ApiError::LoggingError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("TREEMIRROR_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");

    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| ApiError::LoggingError(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, ApiError> {
    if let Ok(format) = std::env::var("TREEMIRROR_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");

    if format != "json" && format != "text" {
        return Err(ApiError::LoggingError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, ApiError> {
    if let Ok(output) = std::env::var("TREEMIRROR_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }

    let output = config.map(|c| c.output.as_str()).unwrap_or("both");

    parse_output_destinations(output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ApiError> {
    match output {
        "stdout" => Ok(OutputDestinations {
            stdout: true,
            stderr: false,
            file: false,
        }),
        "stderr" => Ok(OutputDestinations {
            stdout: false,
            stderr: true,
            file: false,
        }),
        "file" => Ok(OutputDestinations {
            stdout: false,
            stderr: false,
            file: true,
        }),
        "both" => Ok(OutputDestinations {
            stdout: true,
            stderr: false,
            file: true,
        }),
        _ => Err(ApiError::LoggingError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'both')",
            output
        ))),
    }
}

/// Validate a logging configuration without installing anything
pub fn validate(config: &LoggingConfig) -> Result<(), ApiError> {
    determine_format(Some(config))?;
    parse_output_destinations(&config.output)?;
    Ok(())
}
