//! Interactive prompting for the values the argument form takes on the command line.

use crate::config::MirrorConfig;
use crate::error::ApiError;
use crate::logging::resolve_log_file_path;
use dialoguer::Input;
use std::path::PathBuf;

fn prompt_error(e: dialoguer::Error) -> ApiError {
    ApiError::PromptError(format!("Failed to get user input: {}", e))
}

fn prompt_path(prompt: &str, current: Option<&PathBuf>) -> Result<PathBuf, ApiError> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(current) = current {
        input = input.default(current.display().to_string());
    }
    let value = input.interact_text().map_err(prompt_error)?;
    Ok(PathBuf::from(value.trim()))
}

/// Ask for source, replica, interval and log file, offering known values as defaults.
pub fn prompt_for_settings(config: &mut MirrorConfig) -> Result<(), ApiError> {
    config.source = Some(prompt_path(
        "Enter the source folder path",
        config.source.as_ref(),
    )?);
    config.replica = Some(prompt_path(
        "Enter the replica folder path",
        config.replica.as_ref(),
    )?);

    config.interval_secs = Input::<u64>::new()
        .with_prompt("Enter the synchronization interval in seconds")
        .default(config.interval_secs)
        .validate_with(|value: &u64| -> Result<(), &str> {
            if *value == 0 {
                Err("interval must be at least one second")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(prompt_error)?;

    let current_log = resolve_log_file_path(None, config.logging.file.clone());
    config.logging.file = Some(prompt_path("Enter the log file path", Some(&current_log))?);

    Ok(())
}
