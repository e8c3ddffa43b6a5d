use std::fmt;

use bookshelf_http::CancelReason;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A cover record served by the external cover service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCover {
    pub id: String,
    /// Encoded image payload, when the service sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Locator the cover was fetched from. Filled in by the fetcher.
    #[serde(default, skip_deserializing)]
    pub source: String,
}

/// One batch of covers to fetch for a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverRequest {
    pub book_id: Uuid,
    pub locators: Vec<Url>,
}

impl CoverRequest {
    pub fn new(book_id: Uuid, locators: Vec<Url>) -> Self {
        Self { book_id, locators }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every locator produced a cover.
    Success,
    /// At least one locator failed; all covers of the batch were discarded.
    CancelledPartial { reason: CancelReason },
}

/// Result of [`CoverFetcher::fetch_all`](crate::CoverFetcher::fetch_all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverBatch {
    /// Covers in completion order, not request order.
    pub covers: Vec<BookCover>,
    pub outcome: BatchOutcome,
}

impl CoverBatch {
    pub(crate) fn success(covers: Vec<BookCover>) -> Self {
        Self {
            covers,
            outcome: BatchOutcome::Success,
        }
    }

    pub(crate) fn cancelled(reason: CancelReason) -> Self {
        Self {
            covers: Vec::new(),
            outcome: BatchOutcome::CancelledPartial { reason },
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == BatchOutcome::Success
    }
}

/// Terminal state of one per-locator fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    TriggeredCancellation,
    ObservedCancellation,
    Errored,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::TriggeredCancellation => "triggered cancellation",
            TaskStatus::ObservedCancellation => "observed cancellation",
            TaskStatus::Errored => "errored",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_deserializes_camel_case_and_ignores_source() {
        let cover: BookCover = serde_json::from_str(
            r#"{"id":"c1","content":"aGVsbG8=","source":"ignored","extra":1}"#,
        )
        .unwrap();

        assert_eq!(cover.id, "c1");
        assert_eq!(cover.content.as_deref(), Some("aGVsbG8="));
        assert!(cover.source.is_empty());
    }

    #[test]
    fn cover_without_content() {
        let cover: BookCover = serde_json::from_str(r#"{"id":"c2"}"#).unwrap();
        assert_eq!(cover.content, None);

        let json = serde_json::to_value(&cover).unwrap();
        assert!(json.get("content").is_none());
    }

    #[test]
    fn cancelled_batch_is_empty() {
        let batch = CoverBatch::cancelled(CancelReason::RemoteUnavailable {
            url: "http://a".to_string(),
            status: 404,
        });
        assert!(batch.covers.is_empty());
        assert!(!batch.is_success());
    }
}
