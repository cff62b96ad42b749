//! Location sources - push streams of [`LocationEvent`]s.
//!
//! A source is subscribed once per tracker. It pushes events into the
//! tracker's channel until the returned [`SourceGuard`] is dropped, which is
//! the only way to unsubscribe. Dropping the guard also happens on abnormal
//! teardown (panics unwind through the tracker loop), so the platform
//! resource is always released.
//!
//! # Built-in sources
//!
//! - [`ChannelSource`] - events pushed by the host (embedding, tests)
//! - [`ReplaySource`] - plays back a recorded track file
//! - [`UnsupportedSource`] - a platform without any location capability

mod replay;

pub use replay::{load_track, parse_track, ReplaySource, TrackFileError};

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::sample::LocationEvent;

/// Message shown when the platform has no location capability.
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by this platform.";

/// Options handed to the source when subscribing.
///
/// The source owns staleness; the tracker applies no timeout of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Prefer the most accurate positioning the platform offers.
    pub high_accuracy: bool,

    /// How long the source may take to produce a single position.
    pub timeout: Duration,

    /// Maximum age of a cached position the source may return.
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(5000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// The platform has no location capability at all.
///
/// Surfaced as a persistent error state; never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct SourceUnavailable {
    pub reason: String,
}

impl SourceUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn unsupported() -> Self {
        Self::new(UNSUPPORTED_MESSAGE)
    }
}

/// A push stream of location events.
pub trait LocationSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Start pushing events into `events` until the guard is dropped.
    fn subscribe(
        &self,
        options: WatchOptions,
        events: mpsc::Sender<LocationEvent>,
    ) -> Result<SourceGuard, SourceUnavailable>;
}

/// Subscription handle; dropping it unsubscribes.
#[derive(Debug)]
pub struct SourceGuard {
    cancellation: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SourceGuard {
    /// Guard for a subscription whose producer observes `cancellation`.
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            task: None,
        }
    }

    /// Guard that also aborts the producing task on release.
    pub fn with_task(cancellation: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            cancellation,
            task: Some(task),
        }
    }

    /// Release the subscription now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.cancellation.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Source fed by hand through [`ChannelSource::push`].
///
/// Events are delivered to every live subscription. Released subscriptions
/// are pruned on the next push.
#[derive(Debug, Default)]
pub struct ChannelSource {
    subscribers: Mutex<Vec<(mpsc::Sender<LocationEvent>, CancellationToken)>>,
}

impl ChannelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to all live subscriptions.
    ///
    /// Returns the number of subscriptions that received it.
    pub async fn push(&self, event: impl Into<LocationEvent>) -> usize {
        let event = event.into();
        let live: Vec<mpsc::Sender<LocationEvent>> = {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|(tx, token)| !token.is_cancelled() && !tx.is_closed());
            subscribers.iter().map(|(tx, _)| tx.clone()).collect()
        };

        let mut delivered = 0;
        for tx in live {
            if tx.send(event.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of subscriptions that have not been released.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|(tx, token)| !token.is_cancelled() && !tx.is_closed())
            .count()
    }
}

impl LocationSource for ChannelSource {
    fn name(&self) -> &str {
        "channel"
    }

    fn subscribe(
        &self,
        options: WatchOptions,
        events: mpsc::Sender<LocationEvent>,
    ) -> Result<SourceGuard, SourceUnavailable> {
        tracing::debug!(?options, "Channel source subscribed");
        let token = CancellationToken::new();
        self.subscribers.lock().push((events, token.clone()));
        Ok(SourceGuard::new(token))
    }
}

/// A platform without location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSource;

impl LocationSource for UnsupportedSource {
    fn name(&self) -> &str {
        "unsupported"
    }

    fn subscribe(
        &self,
        _options: WatchOptions,
        _events: mpsc::Sender<LocationEvent>,
    ) -> Result<SourceGuard, SourceUnavailable> {
        Err(SourceUnavailable::unsupported())
    }
}
