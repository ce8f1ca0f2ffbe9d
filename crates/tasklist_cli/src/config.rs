//! Command-line configuration.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Single-list task tracker")]
pub struct CliArgs {
    /// SQLite database file. Uses a throwaway in-memory store when omitted.
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    pub log_dir: Option<String>,
}

impl CliArgs {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| tasklist_core::default_log_level())
    }
}
