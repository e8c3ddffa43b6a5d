use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Head => write!(f, "HEAD"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Option<Vec<(String, String)>>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: None,
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Option<Vec<(String, String)>>,
    pub data: Option<Vec<u8>>,
}

impl Response {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseErrorKind {
    /// The connection could not be established.
    Connect,
    /// The transport gave up waiting for the remote.
    Timeout,
    /// Any other failure while talking to the remote.
    Network,
    /// The remote answered but the response could not be read.
    BadResponse,
    /// The request was abandoned because its cancellation signal fired.
    Cancelled,
    /// The HTTP client itself could not be built.
    Build,
}

impl fmt::Display for ResponseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ResponseErrorKind::Connect => "connect",
            ResponseErrorKind::Timeout => "timeout",
            ResponseErrorKind::Network => "network",
            ResponseErrorKind::BadResponse => "bad response",
            ResponseErrorKind::Cancelled => "cancelled",
            ResponseErrorKind::Build => "client build",
        };
        f.write_str(name)
    }
}

/// Transport-level failure returned by an [`HttpExecutor`](crate::HttpExecutor).
///
/// A non-success HTTP status is *not* a `ResponseError`; executors return those
/// as ordinary [`Response`] values and leave the interpretation to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error for {url}: {message}")]
pub struct ResponseError {
    pub kind: ResponseErrorKind,
    pub status: Option<u16>,
    pub url: String,
    pub message: String,
}

impl ResponseError {
    pub fn new(kind: ResponseErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::new(
            ResponseErrorKind::Cancelled,
            url,
            "request abandoned after cancellation",
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ResponseErrorKind::Cancelled
    }
}
