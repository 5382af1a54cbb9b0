//! CLI parse: clap types for treemirror. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Treemirror CLI - keep a replica directory identical to a source directory
#[derive(Parser, Debug)]
#[command(name = "treemirror")]
#[command(about = "One-way recursive mirroring of a source directory onto a replica")]
pub struct Cli {
    /// Source directory (authoritative)
    pub source: Option<PathBuf>,

    /// Replica directory (overwritten to match the source)
    pub replica: Option<PathBuf>,

    /// Seconds between synchronization passes
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Log file path
    #[arg(long, short = 'l')]
    pub log_file: Option<PathBuf>,

    /// Configuration file path (layered over the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Prompt for source, replica, interval and log file
    #[arg(long)]
    pub interactive: bool,

    /// Run a single pass and exit
    #[arg(long, conflicts_with = "passes")]
    pub once: bool,

    /// Stop after this many passes
    #[arg(long)]
    pub passes: Option<usize>,

    /// Copy the targets of symbolic links instead of skipping them
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Do not descend more than this many levels below the roots
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Entry name (or `*` glob) to leave out on both sides; repeatable
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,
}
