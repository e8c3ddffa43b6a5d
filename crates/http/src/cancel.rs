//! Cooperative cancellation shared by the requests of one batch.
//!
//! A [`CancellationSignal`] is created by whoever coordinates a group of
//! requests and cloned into each of them. Any clone may set it; once set it
//! stays set, and every clone observes the same [`CancelReason`].

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::Notify;

/// Why a batch was cancelled. Only the first reason is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// A remote answered with a non-success status.
    RemoteUnavailable { url: String, status: u16 },
    /// A remote answered successfully but the body could not be decoded.
    Undecodable { url: String, message: String },
    /// The batch ran past its deadline.
    BatchTimeout { after: Duration },
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CancelReason::RemoteUnavailable { url, status } => {
                write!(f, "{url} answered with status {status}")
            }
            CancelReason::Undecodable { url, message } => {
                write!(f, "{url} returned an undecodable body: {message}")
            }
            CancelReason::BatchTimeout { after } => {
                write!(f, "batch did not finish within {after:?}")
            }
        }
    }
}

#[derive(Default)]
struct Inner {
    reason: OnceLock<CancelReason>,
    notify: Notify,
}

/// Write-once, read-many cancellation flag.
#[derive(Clone, Default)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signal. Returns `true` only for the call that actually set it.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let won = self.inner.reason.set(reason).is_ok();
        if won {
            self.inner.notify.notify_waiters();
        }
        won
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    pub fn reason(&self) -> Option<&CancelReason> {
        self.inner.reason.get()
    }

    /// Resolves once the signal has been set.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent `cancel` cannot slip between.
            notified.as_mut().enable();

            if self.is_cancelled() {
                return;
            }

            notified.await;
        }
    }
}

impl fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable(url: &str) -> CancelReason {
        CancelReason::RemoteUnavailable {
            url: url.to_string(),
            status: 404,
        }
    }

    #[test]
    fn starts_unset() {
        let signal = CancellationSignal::new();
        assert!(!signal.is_cancelled());
        assert!(signal.reason().is_none());
    }

    #[test]
    fn first_cancel_wins() {
        let signal = CancellationSignal::new();

        assert!(signal.cancel(unavailable("http://a")));
        assert!(!signal.cancel(unavailable("http://b")));
        assert!(!signal.cancel(CancelReason::BatchTimeout {
            after: Duration::from_secs(1)
        }));

        assert!(signal.is_cancelled());
        assert_eq!(signal.reason(), Some(&unavailable("http://a")));
    }

    #[test]
    fn clones_share_state() {
        let signal = CancellationSignal::new();
        let observer = signal.clone();

        signal.cancel(unavailable("http://a"));
        assert!(observer.is_cancelled());
        assert_eq!(observer.reason(), signal.reason());
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_set() {
        let signal = CancellationSignal::new();
        signal.cancel(unavailable("http://a"));

        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("already-set signal should resolve");
    }

    #[tokio::test]
    async fn waiters_wake_on_cancel() {
        let signal = CancellationSignal::new();

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let observer = signal.clone();
            waiters.push(tokio::spawn(async move { observer.cancelled().await }));
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        signal.cancel(unavailable("http://a"));

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("waiter should wake")
                .unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cancels_set_once() {
        let signal = CancellationSignal::new();

        let mut setters = Vec::new();
        for i in 0..16 {
            let signal = signal.clone();
            setters.push(tokio::spawn(async move {
                signal.cancel(unavailable(&format!("http://{i}")))
            }));
        }

        let mut winners = 0;
        for setter in setters {
            if setter.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn pending_until_cancelled() {
        let signal = CancellationSignal::new();
        let waited = tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(waited.is_err());
    }
}
