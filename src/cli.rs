//! CLI domain: parse, prompt, route and output only.
//! Synchronization itself lives in the library; this layer just wires it up.

mod output;
mod parse;
mod prompt;
mod route;

pub use output::{exit_code, map_error, EXIT_FATAL, EXIT_ITEM_ERRORS, EXIT_OK};
pub use parse::Cli;
pub use prompt::prompt_for_settings;
pub use route::{build_config, RunContext};
