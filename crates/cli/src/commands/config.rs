use eyre::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub async fn handle_config_command(cmd: ConfigCommands, path: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => handle_set_config(key, value, path).await,
        ConfigCommands::Get { key } => handle_get_config(key, path).await,
        ConfigCommands::Show => handle_show_config(path).await,
        ConfigCommands::Reset { force } => handle_reset_config(force, path).await,
    }
}

async fn handle_set_config(key: String, value: String, path: &Path) -> Result<()> {
    let mut config = Config::load(path).await?;

    match config.set_value(&key, &value) {
        Ok(_) => {
            config.save(path).await?;
            println!("✅ Configuration updated: {} = {}", key, value);
        }
        Err(e) => {
            println!("❌ Failed to set configuration: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

async fn handle_get_config(key: String, path: &Path) -> Result<()> {
    let config = Config::load(path).await?;

    match config.get_value(&key) {
        Ok(value) => {
            println!("{}: {}", key, value);
        }
        Err(e) => {
            println!("❌ Failed to get configuration: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

async fn handle_show_config(path: &Path) -> Result<()> {
    let config = Config::load(path).await?;
    println!("{}", config.show_all());
    println!("File: {}", path.display());
    Ok(())
}

async fn handle_reset_config(force: bool, path: &Path) -> Result<()> {
    if !force {
        print!("Are you sure you want to reset all configuration? (y/N): ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().to_lowercase().starts_with('y') {
            println!("❌ Cancelled");
            return Ok(());
        }
    }

    Config::reset(path).await?;
    println!("✅ Configuration reset to defaults");
    Ok(())
}
