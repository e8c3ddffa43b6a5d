use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:58482/api/bookcovers/";

/// What to do when a successful response carries an undecodable body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Fail the whole batch with a decode error.
    #[default]
    Fail,
    /// Treat it like an unavailable cover and cancel the batch.
    Cancel,
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodePolicy::Fail => f.write_str("fail"),
            DecodePolicy::Cancel => f.write_str("cancel"),
        }
    }
}

impl FromStr for DecodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(DecodePolicy::Fail),
            "cancel" => Ok(DecodePolicy::Cancel),
            other => Err(format!("Invalid decode policy: {other} (expected fail or cancel)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Base URL covers are resolved against.
    pub base_url: String,
    /// Cover variant names appended to the book id.
    pub variants: Vec<String>,
    /// Per-request timeout handed to the HTTP executor.
    pub request_timeout_ms: Option<u64>,
    /// Deadline for a whole batch.
    pub batch_timeout_ms: Option<u64>,
    pub decode_policy: DecodePolicy,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            variants: ["dummycover1", "dummycover3", "dummycover4", "dummycover5"]
                .into_iter()
                .map(String::from)
                .collect(),
            request_timeout_ms: None,
            batch_timeout_ms: None,
            decode_policy: DecodePolicy::Fail,
        }
    }
}

impl CoverConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_ms.map(Duration::from_millis)
    }
}
