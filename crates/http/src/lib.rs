//! HTTP plumbing for bookshelf.
//!
//! This crate provides the request/response types, the [`HttpExecutor`]
//! abstraction the cover fetcher talks to, a reqwest-backed executor, and the
//! per-batch [`CancellationSignal`].

pub mod cancel;
mod executor;
mod reqwest;
pub mod types;

pub use self::cancel::{CancelReason, CancellationSignal};
pub use self::executor::HttpExecutor;
pub use self::reqwest::ReqwestExecutor;
pub use self::types::{Method, Request, Response, ResponseError, ResponseErrorKind};
