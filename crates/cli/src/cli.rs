use std::path::PathBuf;

use url::Url;
use uuid::Uuid;

#[derive(clap::Parser, Debug)]
#[clap(name = "bookshelf", about = "Fetch book covers from the cover service")]
pub struct Cli {
    /// Use this configuration file instead of the default location
    #[clap(long, global = true, env = "BOOKSHELF_CONFIG")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fetch every cover of a book in one batch
    Covers {
        /// Book identifier
        book_id: Uuid,
        /// Fetch these URLs instead of the configured cover variants
        #[clap(long = "url")]
        urls: Vec<Url>,
        /// Print the covers as JSON
        #[clap(long)]
        json: bool,
    },
    /// Look up a single cover by id
    Cover {
        /// Cover identifier, e.g. "<book-id>-dummycover1"
        cover_id: String,
        /// Print the cover as JSON
        #[clap(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. "covers.base_url")
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Reset configuration to defaults
    Reset {
        /// Skip the confirmation prompt
        #[clap(long)]
        force: bool,
    },
}
