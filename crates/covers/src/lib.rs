//! Concurrent cover fetching for bookshelf.
//!
//! [`CoverFetcher`] resolves the cover locators of a book, requests them all at
//! once through an [`HttpExecutor`](bookshelf_http::HttpExecutor), and returns
//! either every cover or none of them.

pub mod config;
pub mod decode;
pub mod error;
mod fetcher;
pub mod locator;
pub mod model;

pub use config::{CoverConfig, DecodePolicy};
pub use decode::{CoverDecoder, JsonCoverDecoder};
pub use error::{CoverError, DecodeError, Result};
pub use fetcher::CoverFetcher;
pub use locator::CoverLocators;
pub use model::{BatchOutcome, BookCover, CoverBatch, CoverRequest, TaskStatus};

pub use bookshelf_http::CancelReason;
