//! duebrief - daily deadline digest from a Notion database to Telegram

use clap::Parser;

mod cache;
mod cli;
mod client;
mod compose;
mod config;
mod digest;
mod error;
mod output;
mod publish;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(cli).await {
        log::error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => cli::init::run(cli.config.as_deref()).await,
        Commands::Run { dry_run, date } => {
            cli::run::run(cli.config.as_deref(), dry_run, date).await
        }
        Commands::Status => cli::status::run(cli.config.as_deref()),
        Commands::Version => {
            println!("duebrief version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
