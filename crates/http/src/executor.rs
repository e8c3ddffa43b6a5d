use async_trait::async_trait;

use crate::cancel::CancellationSignal;
use crate::types::{Request, Response, ResponseError};

/// Issues HTTP requests on behalf of the cover fetcher.
///
/// Implementations return non-success statuses as ordinary responses. Once
/// `cancel` is set while a request is in flight, they should abandon it and
/// return a [`ResponseError`] of kind `Cancelled`.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(
        &self,
        request: Request,
        cancel: &CancellationSignal,
    ) -> Result<Response, ResponseError>;
}
