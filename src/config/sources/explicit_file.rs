//! Explicit config file source: the path given with `--config`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use config::FileFormat;
use std::path::Path;

/// Add the explicit config file; it must exist.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Message(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(true)))
}
