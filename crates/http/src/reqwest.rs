use std::time::Duration;

use async_trait::async_trait;

use super::HttpExecutor;
use crate::cancel::CancellationSignal;
use crate::types::{Request, Response, ResponseError, ResponseErrorKind};

pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestExecutor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Executor whose requests give up after `timeout`, connect included.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ResponseError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_build_error)?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: Request) -> Result<Response, ResponseError> {
        let url = request.url.clone();
        let mut builder = self.client.request(request.method.into(), &request.url);

        if let Some(headers) = request.headers {
            for (key, value) in headers {
                builder = builder.header(key, value);
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_error(&url, e))?;
        map_response(&url, response).await
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(
        &self,
        request: Request,
        cancel: &CancellationSignal,
    ) -> Result<Response, ResponseError> {
        let url = request.url.clone();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %url, "Abandoning request after cancellation");
                Err(ResponseError::cancelled(url))
            }
            result = self.send(request) => result,
        }
    }
}

async fn map_response(url: &str, value: reqwest::Response) -> Result<Response, ResponseError> {
    let status = value.status().as_u16();
    let headers = value
        .headers()
        .into_iter()
        .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
        .collect::<Vec<_>>();

    let data = value
        .bytes()
        .await
        .map_err(|e| ResponseError {
            kind: ResponseErrorKind::BadResponse,
            status: Some(status),
            url: url.to_string(),
            message: e.to_string(),
        })?
        .to_vec();

    Ok(Response {
        status,
        headers: Some(headers),
        data: Some(data),
    })
}

fn map_build_error(value: reqwest::Error) -> ResponseError {
    ResponseError::new(
        ResponseErrorKind::Build,
        "",
        format!("failed to build http client: {value}"),
    )
}

fn map_error(url: &str, value: reqwest::Error) -> ResponseError {
    let kind = if value.is_connect() {
        ResponseErrorKind::Connect
    } else if value.is_timeout() {
        ResponseErrorKind::Timeout
    } else if value.is_body() || value.is_decode() {
        ResponseErrorKind::BadResponse
    } else {
        ResponseErrorKind::Network
    };

    ResponseError {
        kind,
        status: value.status().map(|v| v.as_u16()),
        url: url.to_string(),
        message: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelReason;

    async fn unused_local_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/api/bookcovers/nothing-here")
    }

    #[tokio::test]
    async fn connection_refused_is_a_connect_error() {
        let executor = ReqwestExecutor::new();
        let url = unused_local_url().await;

        let err = executor
            .execute(Request::get(&url), &CancellationSignal::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ResponseErrorKind::Connect);
        assert_eq!(err.url, url);
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn already_cancelled_signal_short_circuits() {
        let executor = ReqwestExecutor::new();
        let url = unused_local_url().await;
        let signal = CancellationSignal::new();
        signal.cancel(CancelReason::RemoteUnavailable {
            url: "http://elsewhere".to_string(),
            status: 404,
        });

        let err = executor
            .execute(Request::get(&url), &signal)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn in_flight_request_is_abandoned_on_cancel() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let executor = ReqwestExecutor::new();
        let signal = CancellationSignal::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel(CancelReason::BatchTimeout {
                after: Duration::from_millis(50),
            });
        });

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            executor.execute(Request::get(format!("http://{addr}/slow")), &signal),
        )
        .await
        .expect("cancellation should abandon the request")
        .unwrap_err();

        assert!(err.is_cancelled());
    }

    #[test]
    fn client_build_failure_is_not_a_network_error() {
        let source = reqwest::Client::new().get("not a url").build().unwrap_err();

        let err = map_build_error(source);

        assert_eq!(err.kind, ResponseErrorKind::Build);
        assert!(err.message.starts_with("failed to build http client"));
        assert!(err.url.is_empty());
    }

    #[tokio::test]
    async fn request_timeout_maps_to_timeout_kind() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let executor = ReqwestExecutor::with_timeout(Duration::from_millis(100)).unwrap();
        let err = executor
            .execute(
                Request::get(format!("http://{addr}/slow")),
                &CancellationSignal::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ResponseErrorKind::Timeout);
    }
}
