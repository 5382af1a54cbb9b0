//! CLI output: error mapping and exit codes.

use crate::driver::DriverSummary;
use crate::error::ApiError;

/// Every pass clean
pub const EXIT_OK: i32 = 0;
/// Startup failure or a fatal pass
pub const EXIT_FATAL: i32 = 1;
/// Passes completed but some items failed
pub const EXIT_ITEM_ERRORS: i32 = 2;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ConfigError(msg) => format!("Configuration error: {}\nSee `treemirror --help`.", msg),
        other => other.to_string(),
    }
}

/// Exit status for a finished run
pub fn exit_code(summary: &DriverSummary) -> i32 {
    if summary.fatal_passes > 0 {
        EXIT_FATAL
    } else if summary.item_errors > 0 {
        EXIT_ITEM_ERRORS
    } else {
        EXIT_OK
    }
}
