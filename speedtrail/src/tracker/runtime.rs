//! Tracker - the single control path from source to alerts and view.
//!
//! ```text
//! LocationSource ──mpsc──► tracker loop ──► SampleProcessor ──► AlertDispatcher
//!                                 │
//!                                 ├──watch──► latest TrackView (presentation)
//!                                 └──mpsc───► every TrackView (optional)
//! ```
//!
//! The loop owns the [`TrackState`] outright and processes one event to
//! completion before receiving the next. Readers only ever see immutable
//! [`TrackView`] snapshots. The `watch` channel keeps only the latest one;
//! a reader that needs every update takes [`Tracker::updates`] before
//! starting.
//!
//! # Teardown
//!
//! [`TrackerHandle::shutdown`] (or dropping the handle) cancels the tracker.
//! The loop stops before touching any further event, releases the source
//! subscription, and pending permission requests stop short of showing
//! anything.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::alert::AlertThresholds;
use super::dispatcher::{AlertDispatcher, NotificationService};
use super::processor::SampleProcessor;
use super::sample::LocationEvent;
use super::source::{LocationSource, SourceGuard, WatchOptions};
use super::state::{CurrentLocation, TrackState, TrackView};

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Speed limit and brake threshold.
    pub thresholds: AlertThresholds,

    /// Options passed to the location source.
    pub watch: WatchOptions,

    /// Capacity of the channel between source and tracker loop.
    pub event_buffer: usize,

    /// Capacity of the per-event update channel, see [`Tracker::updates`].
    pub update_buffer: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            thresholds: AlertThresholds::default(),
            watch: WatchOptions::default(),
            event_buffer: 64,
            update_buffer: 64,
        }
    }
}

/// Counters reported when the tracker loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackSummary {
    /// Successful samples processed.
    pub samples: usize,
    /// Source errors processed.
    pub errors: usize,
    /// Alerts handed to the dispatcher.
    pub alerts: usize,
}

/// A configured, not yet started tracker.
pub struct Tracker {
    config: TrackerConfig,
    source: Arc<dyn LocationSource>,
    notifier: Arc<dyn NotificationService>,
    updates: Option<mpsc::Sender<TrackView>>,
}

impl Tracker {
    /// Create a tracker with default configuration.
    pub fn new(source: Arc<dyn LocationSource>, notifier: Arc<dyn NotificationService>) -> Self {
        Self::with_config(source, notifier, TrackerConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(
        source: Arc<dyn LocationSource>,
        notifier: Arc<dyn NotificationService>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            updates: None,
        }
    }

    /// Receive a snapshot for every processed event, in order.
    ///
    /// Unlike [`TrackerHandle::subscribe`] nothing is coalesced: the loop
    /// waits for a slow reader, which in turn slows the source. Dropping the
    /// receiver detaches it. Only the most recent call stays attached.
    pub fn updates(&mut self) -> mpsc::Receiver<TrackView> {
        let (tx, rx) = mpsc::channel(self.config.update_buffer.max(1));
        self.updates = Some(tx);
        rx
    }

    /// Subscribe to the source and spawn the tracker loop.
    ///
    /// A source without location capability is not an error here: the
    /// returned handle carries a persistent error view instead.
    pub fn start(self) -> TrackerHandle {
        let cancellation = CancellationToken::new();
        let (view_tx, view_rx) = watch::channel(TrackView::default());
        let (events_tx, events_rx) = mpsc::channel(self.config.event_buffer.max(1));

        let guard = match self.source.subscribe(self.config.watch, events_tx) {
            Ok(guard) => guard,
            Err(unavailable) => {
                tracing::warn!(
                    source = self.source.name(),
                    reason = %unavailable,
                    "Location source unavailable"
                );
                let mut state = TrackState::new();
                state.current_location = CurrentLocation::Error(unavailable.reason);
                view_tx.send_replace(state.view());
                return TrackerHandle {
                    view_rx,
                    cancellation,
                    task: None,
                };
            }
        };

        tracing::info!(
            source = self.source.name(),
            speed_limit_kmh = self.config.thresholds.speed_limit_kmh,
            brake_threshold = self.config.thresholds.brake_threshold_kmh_per_s,
            "Tracker started"
        );

        let tracker_loop = TrackerLoop {
            events: events_rx,
            guard,
            processor: SampleProcessor::new(self.config.thresholds),
            dispatcher: AlertDispatcher::new(self.notifier, cancellation.clone()),
            view_tx,
            updates: self.updates,
            cancellation: cancellation.clone(),
        };

        TrackerHandle {
            view_rx,
            cancellation,
            task: Some(tokio::spawn(tracker_loop.run())),
        }
    }
}

/// Everything the spawned loop owns.
struct TrackerLoop {
    events: mpsc::Receiver<LocationEvent>,
    guard: SourceGuard,
    processor: SampleProcessor,
    dispatcher: AlertDispatcher,
    view_tx: watch::Sender<TrackView>,
    updates: Option<mpsc::Sender<TrackView>>,
    cancellation: CancellationToken,
}

impl TrackerLoop {
    async fn run(mut self) -> TrackSummary {
        let mut state = TrackState::new();
        let mut summary = TrackSummary::default();

        loop {
            let event = tokio::select! {
                // Teardown wins over any event already queued
                biased;
                _ = self.cancellation.cancelled() => {
                    tracing::debug!("Tracker cancelled");
                    break;
                }
                event = self.events.recv() => match event {
                    Some(event) => event,
                    None => {
                        tracing::debug!("Location stream ended");
                        break;
                    }
                },
            };

            match &event {
                LocationEvent::Fix(_) => summary.samples += 1,
                LocationEvent::Error(_) => summary.errors += 1,
            }

            let alerts = self.processor.process_event(&mut state, &event);
            let view = state.view();

            summary.alerts += alerts.len();
            for alert in alerts {
                self.dispatcher.dispatch(alert);
            }

            if let Some(updates) = self.updates.clone() {
                tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => {
                        self.view_tx.send_replace(view);
                        tracing::debug!("Tracker cancelled");
                        break;
                    }
                    sent = updates.send(view.clone()) => {
                        if sent.is_err() {
                            tracing::debug!("Update receiver dropped");
                            self.updates = None;
                        }
                    }
                }
            }
            self.view_tx.send_replace(view);
        }

        // Release the subscription before reporting
        drop(self.guard);

        tracing::info!(
            samples = summary.samples,
            errors = summary.errors,
            alerts = summary.alerts,
            path_len = state.path().len(),
            "Tracker stopped"
        );
        summary
    }
}

/// Handle to a running tracker.
///
/// Dropping the handle tears the tracker down.
pub struct TrackerHandle {
    view_rx: watch::Receiver<TrackView>,
    cancellation: CancellationToken,
    task: Option<JoinHandle<TrackSummary>>,
}

impl TrackerHandle {
    /// Latest snapshot.
    pub fn view(&self) -> TrackView {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified after every processed event.
    pub fn subscribe(&self) -> watch::Receiver<TrackView> {
        self.view_rx.clone()
    }

    /// Token cancelled on teardown, for tasks that should stop with the tracker.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Whether the tracker loop is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait for the source to end its stream.
    pub async fn join(mut self) -> TrackSummary {
        self.wait().await
    }

    /// Tear down and wait for the loop to stop.
    pub async fn shutdown(mut self) -> TrackSummary {
        self.cancellation.cancel();
        self.wait().await
    }

    async fn wait(&mut self) -> TrackSummary {
        let Some(task) = self.task.take() else {
            return TrackSummary::default();
        };
        match task.await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Tracker loop failed");
                TrackSummary::default()
            }
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
