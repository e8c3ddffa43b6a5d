mod cli;
mod commands;
mod config;
mod utils;

use clap::Parser;

use crate::cli::Commands;
use crate::commands::{handle_config_command, handle_cover_command, handle_covers_command};
use crate::config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = cli.config.unwrap_or_else(Config::get_config_path);
    tracing::debug!("Using configuration at {}", config_path.display());

    match cli.command {
        Commands::Covers {
            book_id,
            urls,
            json,
        } => {
            let config = Config::load(&config_path).await?;
            handle_covers_command(book_id, urls, json, &config).await?;
        }
        Commands::Cover { cover_id, json } => {
            let config = Config::load(&config_path).await?;
            handle_cover_command(cover_id, json, &config).await?;
        }
        Commands::Config { command } => {
            handle_config_command(command, &config_path).await?;
        }
    }

    Ok(())
}
