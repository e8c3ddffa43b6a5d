//! Utility functions for CLI operations and common functionality.

use std::sync::Arc;

use bookshelf_covers::{CoverConfig, CoverFetcher};
use bookshelf_http::{HttpExecutor, ReqwestExecutor};
use eyre::Result;

/// Create the HTTP executor described by the cover configuration
pub fn create_executor(config: &CoverConfig) -> Result<Arc<dyn HttpExecutor>> {
    let executor = match config.request_timeout() {
        Some(timeout) => {
            tracing::debug!("Using Reqwest executor with a {:?} request timeout", timeout);
            ReqwestExecutor::with_timeout(timeout).map_err(eyre::Report::from)?
        }
        None => ReqwestExecutor::new(),
    };
    Ok(Arc::new(executor))
}

/// Create a cover fetcher backed by a Reqwest executor
pub fn create_cover_fetcher(config: &CoverConfig) -> Result<CoverFetcher> {
    let executor = create_executor(config)?;
    CoverFetcher::new(executor, config).map_err(eyre::Report::from)
}
