//! Treemirror CLI Binary
//!
//! Mirrors a source directory onto a replica at a fixed interval.

use clap::Parser;
use std::process;
use tracing::{error, info};
use treemirror::cli::{map_error, Cli, RunContext, EXIT_FATAL};
use treemirror::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    // Prompting (if any) happens before logging so the log file answer is honoured
    let context = match RunContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FATAL);
        }
    };

    if cli.print_config {
        match context.config().to_toml() {
            Ok(rendered) => {
                print!("{}", rendered);
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{}", map_error(&e));
                process::exit(EXIT_FATAL);
            }
        }
    }

    if let Err(e) = init_logging(Some(&context.config().logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(EXIT_FATAL);
    }

    info!("Treemirror starting");

    match context.execute() {
        Ok(code) => {
            info!(exit_code = code, "Treemirror stopped");
            process::exit(code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(EXIT_FATAL);
        }
    }
}
