use bookshelf_covers::{CoverConfig, CoverLocators, DecodePolicy};
use directories::ProjectDirs;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub covers: CoverConfig,
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    /// Loads the configuration at `path`, writing the defaults there first if it
    /// does not exist yet.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save(path).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| eyre::eyre!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub async fn reset(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save(path).await?;
        Ok(config)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["covers", "base_url"] => {
                CoverLocators::new(value, Vec::new())
                    .map_err(|e| eyre::eyre!("Invalid base url {}: {}", value, e))?;
                self.covers.base_url = value.to_string();
            }
            ["covers", "variants"] => {
                self.covers.variants = value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
            }
            ["covers", "request_timeout_ms"] => {
                self.covers.request_timeout_ms = parse_millis(value)?;
            }
            ["covers", "batch_timeout_ms"] => {
                self.covers.batch_timeout_ms = parse_millis(value)?;
            }
            ["covers", "decode_policy"] => {
                self.covers.decode_policy = value.parse::<DecodePolicy>().map_err(|e| eyre::eyre!(e))?;
            }
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["covers", "base_url"] => self.covers.base_url.clone(),
            ["covers", "variants"] => self.covers.variants.join(","),
            ["covers", "request_timeout_ms"] => show_millis(self.covers.request_timeout_ms),
            ["covers", "batch_timeout_ms"] => show_millis(self.covers.batch_timeout_ms),
            ["covers", "decode_policy"] => self.covers.decode_policy.to_string(),
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        format!(
            "Configuration:\n\
             Covers:\n\
             ├─ base_url: {}\n\
             ├─ variants: {}\n\
             ├─ request_timeout_ms: {}\n\
             ├─ batch_timeout_ms: {}\n\
             └─ decode_policy: {}",
            self.covers.base_url,
            self.covers.variants.join(", "),
            show_millis(self.covers.request_timeout_ms),
            show_millis(self.covers.batch_timeout_ms),
            self.covers.decode_policy,
        )
    }
}

/// An empty value clears the timeout.
fn parse_millis(value: &str) -> Result<Option<u64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| eyre::eyre!("Invalid millisecond value: {}", value))
}

fn show_millis(value: Option<u64>) -> String {
    value
        .map(|ms| ms.to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

/// Get the default configuration directory
fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "bookshelf", "bookshelf") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".bookshelf").join("config")
    }
}
