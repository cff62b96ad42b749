//! Integration tests for the live tracker.
//!
//! These tests drive the complete flow through the public API:
//! - Source → Tracker loop → TrackView snapshots
//! - Sample Processor → Alert Dispatcher → NotificationService
//! - Teardown: subscription release and stale events
//!
//! Run with: `cargo test --test tracker_integration`

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;

use speedtrail::coord::{GeoPoint, EARTH_RADIUS_M};
use speedtrail::tracker::{
    parse_track, BoxFuture, ChannelSource, CurrentLocation, LocationError, LocationEvent,
    LocationSource, NotificationService, Permission, ReplaySource, Sample, TrackSummary,
    TrackView, Tracker, TrackerConfig, TrackerHandle,
};

// ============================================================================
// Test Helpers
// ============================================================================

const HAMBURG_LAT: f64 = 53.630278;
const HAMBURG_LON: f64 = 9.988333;

/// Notification service that records what it showed.
struct RecordingNotifier {
    permission: Mutex<Permission>,
    answer: Permission,
    shown: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn new(permission: Permission, answer: Permission) -> Arc<Self> {
        Arc::new(Self {
            permission: Mutex::new(permission),
            answer,
            shown: Mutex::new(Vec::new()),
        })
    }

    fn granted() -> Arc<Self> {
        Self::new(Permission::Granted, Permission::Granted)
    }

    fn shown(&self) -> Vec<String> {
        self.shown.lock().clone()
    }
}

impl NotificationService for RecordingNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock()
    }

    fn request_permission(&self) -> BoxFuture<'_, Permission> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            *self.permission.lock() = self.answer;
            self.answer
        })
    }

    fn show(&self, message: &str) {
        self.shown.lock().push(message.to_string());
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn sample_at(ms: i64, lat: f64, raw_speed: Option<f64>) -> Sample {
    Sample::new(
        lat,
        HAMBURG_LON,
        raw_speed,
        t0() + chrono::Duration::milliseconds(ms),
    )
}

fn lat_offset(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

fn start(
    source: Arc<dyn LocationSource>,
    notifier: Arc<dyn NotificationService>,
) -> (TrackerHandle, watch::Receiver<TrackView>) {
    let handle = Tracker::with_config(source, notifier, TrackerConfig::default()).start();
    let views = handle.subscribe();
    (handle, views)
}

/// Push an event and wait until the tracker has published the result.
async fn push(
    source: &ChannelSource,
    views: &mut watch::Receiver<TrackView>,
    event: impl Into<LocationEvent>,
) {
    assert_eq!(source.push(event).await, 1, "tracker should be subscribed");
    views.changed().await.expect("tracker should publish a view");
}

// ============================================================================
// Trail and view
// ============================================================================

#[tokio::test]
async fn test_path_grows_one_point_per_sample() {
    let source = Arc::new(ChannelSource::new());
    let (handle, mut views) = start(source.clone(), RecordingNotifier::granted());

    for i in 0..10 {
        let lat = HAMBURG_LAT + lat_offset(i as f64 * 5.0);
        push(&source, &mut views, sample_at(i * 1000, lat, Some(5.0))).await;
        assert_eq!(views.borrow().path.len(), i as usize + 1);
    }

    let view = handle.view();
    assert_eq!(view.polyline().map(|p| p.len()), Some(10));
    assert_eq!(view.map_center, *view.path.last().unwrap());
    assert_eq!(view.zoom, 15);

    let summary = handle.shutdown().await;
    assert_eq!(summary.samples, 10);
    assert_eq!(summary.alerts, 0);
}

#[tokio::test]
async fn test_source_error_replaces_location_and_stream_continues() {
    let source = Arc::new(ChannelSource::new());
    let (handle, mut views) = start(source.clone(), RecordingNotifier::granted());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(10.0))).await;
    push(
        &source,
        &mut views,
        LocationError::permission_denied("User denied Geolocation"),
    )
    .await;

    {
        let view = views.borrow();
        assert_eq!(view.status_line(), "Error: User denied Geolocation");
        assert_eq!(view.path.len(), 1);
        assert_eq!(view.map_center, GeoPoint::new(HAMBURG_LAT, HAMBURG_LON));
    }

    push(&source, &mut views, sample_at(1000, HAMBURG_LAT, Some(10.0))).await;
    assert!(matches!(
        views.borrow().current_location,
        CurrentLocation::Fix { .. }
    ));
    assert_eq!(views.borrow().path.len(), 2);

    let summary = handle.shutdown().await;
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.samples, 2);
}

// ============================================================================
// Alerts
// ============================================================================

#[tokio::test]
async fn test_speed_limit_alert_is_shown() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::granted();
    let (handle, mut views) = start(source.clone(), notifier.clone());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(25.0))).await;
    assert!(views.borrow().speed_exceeded);

    // Back under the limit, standing still
    push(&source, &mut views, sample_at(10_000, HAMBURG_LAT, Some(50.0 / 3.6))).await;
    assert!(!views.borrow().speed_exceeded);

    assert_eq!(
        notifier.shown(),
        vec!["⚠ Exceeding speed limit! Current: 90 km/h".to_string()]
    );
    handle.shutdown().await;
}

#[tokio::test]
async fn test_hard_braking_alert_is_shown() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::granted();
    let (handle, mut views) = start(source.clone(), notifier.clone());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(100.0 / 3.6))).await;
    let next_lat = HAMBURG_LAT + lat_offset(70.0 / 3.6);
    push(&source, &mut views, sample_at(1000, next_lat, None)).await;

    // The first sample is also over the limit
    let shown = notifier.shown();
    assert_eq!(shown.len(), 2);
    assert!(shown[0].starts_with("⚠ Exceeding speed limit!"));
    assert!(shown[1].starts_with("⚠ HARD BRAKING DETECTED!"));
    assert!(shown[1].contains("30.0"));

    assert_eq!(handle.shutdown().await.alerts, 2);
}

#[tokio::test]
async fn test_identical_timestamps_do_not_alert() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::granted();
    let (handle, mut views) = start(source.clone(), notifier.clone());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(20.0))).await;
    let next_lat = HAMBURG_LAT + lat_offset(1.0);
    push(&source, &mut views, sample_at(0, next_lat, Some(0.0))).await;

    assert!(notifier.shown().is_empty());
    assert_eq!(
        views.borrow().path.last().copied(),
        Some(GeoPoint::new(next_lat, HAMBURG_LON))
    );
    handle.shutdown().await;
}

#[tokio::test]
async fn test_undetermined_permission_is_requested_then_shown() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::new(Permission::Undetermined, Permission::Granted);
    let (handle, mut views) = start(source.clone(), notifier.clone());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(25.0))).await;

    // Processing did not wait for the prompt
    assert!(notifier.shown().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(notifier.shown().len(), 1);
    assert_eq!(notifier.permission(), Permission::Granted);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_denied_permission_drops_alerts() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::new(Permission::Denied, Permission::Granted);
    let (handle, mut views) = start(source.clone(), notifier.clone());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(40.0))).await;

    assert!(views.borrow().speed_exceeded);
    assert!(notifier.shown().is_empty());
    assert_eq!(handle.shutdown().await.alerts, 1);
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test]
async fn test_shutdown_releases_subscription() {
    let source = Arc::new(ChannelSource::new());
    let (handle, _views) = start(source.clone(), RecordingNotifier::granted());
    assert_eq!(source.subscriber_count(), 1);

    handle.shutdown().await;

    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(source.push(sample_at(0, HAMBURG_LAT, Some(30.0))).await, 0);
}

#[tokio::test]
async fn test_dropping_handle_releases_subscription() {
    let source = Arc::new(ChannelSource::new());
    let (handle, mut views) = start(source.clone(), RecordingNotifier::granted());

    drop(handle);

    // The loop closes the view channel once it has stopped
    while views.changed().await.is_ok() {}
    assert_eq!(source.subscriber_count(), 0);
}

#[tokio::test]
async fn test_event_queued_at_teardown_is_ignored() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::granted();
    let (handle, views) = start(source.clone(), notifier.clone());

    // Let the loop park on the event channel
    tokio::task::yield_now().await;

    // Delivered to the channel but not yet processed when teardown starts
    assert_eq!(source.push(sample_at(0, HAMBURG_LAT, Some(40.0))).await, 1);
    let summary = handle.shutdown().await;

    assert_eq!(summary, TrackSummary::default());
    assert_eq!(*views.borrow(), TrackView::default());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(notifier.shown().is_empty());
}

#[tokio::test]
async fn test_event_after_teardown_is_rejected() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::granted();
    let (handle, views) = start(source.clone(), notifier.clone());

    handle.shutdown().await;

    assert_eq!(source.push(sample_at(0, HAMBURG_LAT, Some(40.0))).await, 0);
    assert!(notifier.shown().is_empty());
    assert_eq!(*views.borrow(), TrackView::default());
}

#[tokio::test]
async fn test_pending_prompt_does_not_show_after_teardown() {
    let source = Arc::new(ChannelSource::new());
    let notifier = RecordingNotifier::new(Permission::Undetermined, Permission::Granted);
    let (handle, mut views) = start(source.clone(), notifier.clone());

    push(&source, &mut views, sample_at(0, HAMBURG_LAT, Some(40.0))).await;
    handle.shutdown().await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(notifier.shown().is_empty());
}

// ============================================================================
// Replay
// ============================================================================

#[tokio::test]
async fn test_replay_runs_to_completion() {
    let track = "\
# braking from 100 km/h to a standstill
1717243200000,53.630278,9.988333,27.78
1717243201000,53.630528,9.988333,20.0
1717243202000,53.630528,9.988333,0
";
    let samples = parse_track(track).unwrap();
    let notifier = RecordingNotifier::granted();

    let handle = Tracker::new(
        Arc::new(ReplaySource::new(samples).with_speed_factor(0.0)),
        notifier.clone(),
    )
    .start();
    let summary = handle.join().await;

    assert_eq!(summary.samples, 3);
    assert!(notifier
        .shown()
        .iter()
        .any(|m| m.starts_with("⚠ HARD BRAKING DETECTED!")));
    assert!(notifier
        .shown()
        .iter()
        .any(|m| m == "⚠ Exceeding speed limit! Current: 100.01 km/h"));
}

#[tokio::test]
async fn test_replay_publishes_every_update() {
    let samples: Vec<Sample> = (0..200)
        .map(|i| {
            let lat = HAMBURG_LAT + lat_offset(i as f64 * 10.0);
            sample_at(i * 1000, lat, Some(10.0))
        })
        .collect();

    let mut tracker = Tracker::new(
        Arc::new(ReplaySource::new(samples).with_speed_factor(0.0)),
        RecordingNotifier::granted(),
    );
    let mut updates = tracker.updates();
    let handle = tracker.start();

    let mut path_lengths = Vec::new();
    while let Some(view) = updates.recv().await {
        path_lengths.push(view.path.len());
    }

    assert_eq!(path_lengths, (1..=200).collect::<Vec<_>>());
    assert_eq!(handle.join().await.samples, 200);
}
