//! Environment source: TREEMIRROR_* variables, `__` separating nested keys.
//!
//! `TREEMIRROR_INTERVAL_SECS=30`, `TREEMIRROR_SYNC__FOLLOW_SYMLINKS=true`,
//! `TREEMIRROR_SYNC__IGNORE_PATTERNS=.git,*.swp`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "TREEMIRROR";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("sync.ignore_patterns"),
    )
}
