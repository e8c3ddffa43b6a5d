use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bookshelf_http::{CancelReason, CancellationSignal, HttpExecutor, Request};
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{Instrument, debug, error, info, warn};
use uuid::Uuid;

use crate::config::{CoverConfig, DecodePolicy};
use crate::decode::{CoverDecoder, JsonCoverDecoder};
use crate::error::{CoverError, Result};
use crate::locator::CoverLocators;
use crate::model::{BookCover, CoverBatch, CoverRequest, TaskStatus};

/// Fetches the covers of a book concurrently from the cover service.
///
/// A batch is all-or-nothing: if any locator answers with a non-success
/// status, the remaining requests are cancelled and the batch resolves to an
/// empty [`CoverBatch`] with a `CancelledPartial` outcome. Transport and
/// decode failures are returned as errors once every task has finished.
pub struct CoverFetcher {
    executor: Arc<dyn HttpExecutor>,
    decoder: Arc<dyn CoverDecoder>,
    locators: CoverLocators,
    decode_policy: DecodePolicy,
    batch_timeout: Option<Duration>,
}

impl CoverFetcher {
    pub fn new(executor: Arc<dyn HttpExecutor>, config: &CoverConfig) -> Result<Self> {
        Ok(Self {
            executor,
            decoder: Arc::new(JsonCoverDecoder),
            locators: CoverLocators::from_config(config)?,
            decode_policy: config.decode_policy,
            batch_timeout: config.batch_timeout(),
        })
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn CoverDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn with_batch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch_timeout = timeout;
        self
    }

    pub fn locators(&self) -> &CoverLocators {
        &self.locators
    }

    /// Fetches every configured cover variant of `book_id`.
    pub async fn fetch_book_covers(&self, book_id: Uuid) -> Result<CoverBatch> {
        let request = CoverRequest::new(book_id, self.locators.for_book(book_id)?);
        self.fetch_all(&request).await
    }

    /// Looks up a single cover. A non-success status yields `None`.
    pub async fn fetch_cover(&self, cover_id: &str) -> Result<Option<BookCover>> {
        let url = self.locators.cover(cover_id)?.to_string();
        debug!(url = %url, "Fetching single cover");

        let response = self
            .executor
            .execute(json_request(&url), &CancellationSignal::new())
            .await
            .map_err(|source| CoverError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.is_success() {
            debug!(url = %url, status = response.status, "Cover not available");
            return Ok(None);
        }

        let mut cover = self
            .decoder
            .decode(response.body())
            .map_err(|source| CoverError::Decode {
                url: url.clone(),
                source,
            })?;
        cover.source = url;
        Ok(Some(cover))
    }

    /// Fetches all locators of `request` concurrently and joins every task.
    pub async fn fetch_all(&self, request: &CoverRequest) -> Result<CoverBatch> {
        let span = tracing::info_span!(
            "cover_batch",
            book_id = %request.book_id,
            locators = request.locators.len()
        );
        self.run_batch(request).instrument(span).await
    }

    async fn run_batch(&self, request: &CoverRequest) -> Result<CoverBatch> {
        if request.locators.is_empty() {
            debug!("No cover locators, nothing to fetch");
            return Ok(CoverBatch::success(Vec::new()));
        }

        let signal = CancellationSignal::new();
        let mut tasks = JoinSet::new();
        let mut spawned = HashMap::with_capacity(request.locators.len());

        for (index, locator) in request.locators.iter().enumerate() {
            let job = CoverJob {
                index,
                url: locator.to_string(),
                executor: self.executor.clone(),
                decoder: self.decoder.clone(),
                decode_policy: self.decode_policy,
                signal: signal.clone(),
            };
            let handle = tasks.spawn(job.run().in_current_span());
            spawned.insert(handle.id(), (index, locator.to_string()));
        }

        let joined = join_all(&mut tasks, &signal, self.batch_timeout).await;

        if let Some(reason) = signal.reason() {
            report_cancellation(reason, &joined, &spawned);
        }

        let mut covers = Vec::with_capacity(joined.len());
        let mut first_error = None;

        for result in joined {
            let outcome = match result {
                Ok(report) => report.outcome,
                Err(source) => Err(CoverError::TaskFailed { source }),
            };

            match outcome {
                Ok(Some(cover)) => covers.push(cover),
                Ok(None) => {}
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            error!(error = %e, "Cover batch failed");
            return Err(e);
        }

        match signal.reason() {
            Some(CancelReason::BatchTimeout { after }) => Err(CoverError::TimedOut { after: *after }),
            Some(reason) => Ok(CoverBatch::cancelled(reason.clone())),
            None => {
                debug!(covers = covers.len(), "Cover batch complete");
                Ok(CoverBatch::success(covers))
            }
        }
    }
}

/// Waits for every task. When `deadline` passes first, the signal is set and
/// the wait continues until the remaining tasks wind down.
async fn join_all(
    tasks: &mut JoinSet<TaskReport>,
    signal: &CancellationSignal,
    deadline: Option<Duration>,
) -> Vec<std::result::Result<TaskReport, JoinError>> {
    let mut joined = Vec::with_capacity(tasks.len());

    let sleep = async {
        match deadline {
            Some(after) => tokio::time::sleep(after).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(sleep);
    let mut expired = false;

    loop {
        tokio::select! {
            next = tasks.join_next() => match next {
                Some(result) => joined.push(result),
                None => break,
            },
            _ = &mut sleep, if !expired => {
                expired = true;
                if let Some(after) = deadline
                    && signal.cancel(CancelReason::BatchTimeout { after })
                {
                    warn!(?after, pending = tasks.len(), "Cover batch deadline passed");
                }
            }
        }
    }

    joined
}

fn report_cancellation(
    reason: &CancelReason,
    joined: &[std::result::Result<TaskReport, JoinError>],
    spawned: &HashMap<Id, (usize, String)>,
) {
    info!(reason = %reason, "Cover batch cancelled");
    for result in joined {
        match result {
            Ok(report) => info!(
                task = report.index,
                url = %report.url,
                status = %report.status,
                "Cover task finished"
            ),
            Err(e) => match spawned.get(&e.id()) {
                Some((index, url)) => info!(
                    task = index,
                    url = %url,
                    status = %TaskStatus::Errored,
                    error = %e,
                    "Cover task failed"
                ),
                None => info!(status = %TaskStatus::Errored, error = %e, "Cover task failed"),
            },
        }
    }
}

fn json_request(url: &str) -> Request {
    Request::get(url).with_header("accept", "application/json")
}

struct TaskReport {
    index: usize,
    url: String,
    status: TaskStatus,
    outcome: Result<Option<BookCover>>,
}

struct CoverJob {
    index: usize,
    url: String,
    executor: Arc<dyn HttpExecutor>,
    decoder: Arc<dyn CoverDecoder>,
    decode_policy: DecodePolicy,
    signal: CancellationSignal,
}

impl CoverJob {
    async fn run(self) -> TaskReport {
        if self.signal.is_cancelled() {
            return self.finish(TaskStatus::ObservedCancellation, Ok(None));
        }

        debug!(task = self.index, url = %self.url, "Fetching cover");

        let result = self
            .executor
            .execute(json_request(&self.url), &self.signal)
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_cancelled() => {
                return self.finish(TaskStatus::ObservedCancellation, Ok(None));
            }
            Err(e) => {
                warn!(task = self.index, url = %self.url, error = %e, "Cover request failed");
                let url = self.url.clone();
                return self.finish(
                    TaskStatus::Errored,
                    Err(CoverError::Transport { url, source: e }),
                );
            }
        };

        if !response.is_success() {
            self.signal.cancel(CancelReason::RemoteUnavailable {
                url: self.url.clone(),
                status: response.status,
            });
            return self.finish(TaskStatus::TriggeredCancellation, Ok(None));
        }

        let decoded = self.decoder.decode(response.body());
        let policy = self.decode_policy;

        match decoded {
            Ok(mut cover) => {
                cover.source = self.url.clone();
                self.finish(TaskStatus::Succeeded, Ok(Some(cover)))
            }
            Err(e) => match policy {
                DecodePolicy::Fail => {
                    warn!(task = self.index, url = %self.url, error = %e, "Cover body undecodable");
                    let url = self.url.clone();
                    self.finish(TaskStatus::Errored, Err(CoverError::Decode { url, source: e }))
                }
                DecodePolicy::Cancel => {
                    self.signal.cancel(CancelReason::Undecodable {
                        url: self.url.clone(),
                        message: e.message,
                    });
                    self.finish(TaskStatus::TriggeredCancellation, Ok(None))
                }
            },
        }
    }

    fn finish(self, status: TaskStatus, outcome: Result<Option<BookCover>>) -> TaskReport {
        TaskReport {
            index: self.index,
            url: self.url,
            status,
            outcome,
        }
    }
}
