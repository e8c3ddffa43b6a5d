use url::Url;
use uuid::Uuid;

use crate::config::CoverConfig;
use crate::error::{CoverError, Result};

/// Builds cover URLs for a book from the configured base and variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverLocators {
    base: Url,
    variants: Vec<String>,
}

impl CoverLocators {
    pub fn new(base_url: &str, variants: Vec<String>) -> Result<Self> {
        // Keep the base as a directory.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base = Url::parse(&normalized).map_err(|e| CoverError::InvalidLocator {
            message: format!("bad base url {base_url}"),
            source: Some(e),
        })?;

        if base.cannot_be_a_base() {
            return Err(CoverError::InvalidLocator {
                message: format!("{base_url} cannot be used as a base url"),
                source: None,
            });
        }

        Ok(Self { base, variants })
    }

    pub fn from_config(config: &CoverConfig) -> Result<Self> {
        Self::new(&config.base_url, config.variants.clone())
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// One locator per variant, in variant order: `{base}{book_id}-{variant}`.
    pub fn for_book(&self, book_id: Uuid) -> Result<Vec<Url>> {
        self.variants
            .iter()
            .map(|variant| self.cover(&format!("{book_id}-{variant}")))
            .collect()
    }

    /// Locator of a single cover: `{base}{cover_id}`. The id always becomes
    /// exactly one path segment below the base.
    pub fn cover(&self, cover_id: &str) -> Result<Url> {
        if matches!(cover_id, "" | "." | "..") || cover_id.contains('/') {
            return Err(CoverError::InvalidLocator {
                message: format!("invalid cover id {cover_id:?}"),
                source: None,
            });
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| CoverError::InvalidLocator {
                message: format!("cannot resolve cover {cover_id}"),
                source: None,
            })?
            .pop_if_empty()
            .push(cover_id);
        Ok(url)
    }
}
