pub mod config;
pub mod covers;

pub use config::handle_config_command;
pub use covers::{handle_cover_command, handle_covers_command};
