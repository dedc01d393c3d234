//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod context;
pub mod init;
pub mod run;
pub mod status;

pub use context::RunContext;

/// duebrief - daily deadline digest from a Notion database to Telegram
#[derive(Parser, Debug)]
#[command(name = "duebrief")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "DUEBRIEF_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "DUEBRIEF_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize duebrief configuration
    Init,

    /// Fetch, compose, and publish today's digest
    Run {
        /// Compose and preview the digest without publishing
        #[arg(long)]
        dry_run: bool,

        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long, value_name = "DATE")]
        date: Option<String>,
    },

    /// Show configuration and cache status
    Status,

    /// Display version information
    Version,
}
