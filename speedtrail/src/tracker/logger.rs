//! Periodic track logging daemon.
//!
//! Logs the latest [`TrackView`] at regular intervals, useful for reviewing a
//! drive afterwards from the log file.
//!
//! # Usage
//!
//! ```ignore
//! use speedtrail::tracker::{spawn_track_logger, DEFAULT_LOG_INTERVAL};
//!
//! let handle = tracker.start();
//! if tracing::enabled!(tracing::Level::DEBUG) {
//!     spawn_track_logger(handle.subscribe(), handle.cancellation_token(), DEFAULT_LOG_INTERVAL);
//! }
//! ```
//!
//! # Output Format
//!
//! Logs are emitted at DEBUG level with structured fields:
//! - `lat`, `lon` - Current fix in decimal degrees
//! - `speed_kmh` - Device-reported speed
//! - `path_len` - Number of points in the trail
//! - `over_limit` - Whether the speed limit is exceeded
//! - `trail_km` - Length of the trail along its points

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::state::{CurrentLocation, TrackView};
use crate::coord::GeoPoint;

/// Default logging interval (20 seconds).
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(20);

/// Spawns a background task that periodically logs the track.
///
/// Stops when `cancellation` fires or the tracker's view channel closes.
pub fn spawn_track_logger(
    views: watch::Receiver<TrackView>,
    cancellation: CancellationToken,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if views.has_changed().is_err() {
                        tracing::debug!("Track logger stopped (tracker gone)");
                        break;
                    }
                    log_track(&views.borrow());
                }
                _ = cancellation.cancelled() => {
                    tracing::debug!("Track logger stopped");
                    break;
                }
            }
        }
    })
}

fn log_track(view: &TrackView) {
    match &view.current_location {
        CurrentLocation::Fix {
            latitude,
            longitude,
            speed_kmh,
        } => {
            tracing::debug!(
                lat = format!("{:.5}", latitude),
                lon = format!("{:.5}", longitude),
                speed_kmh = format!("{:.1}", speed_kmh),
                path_len = view.path.len(),
                over_limit = view.speed_exceeded,
                trail_km = format!("{:.2}", trail_length_m(&view.path) / 1000.0),
                "Track update"
            );
        }
        CurrentLocation::Error(message) => {
            tracing::debug!(error = %message, path_len = view.path.len(), "Track update (source error)");
        }
        CurrentLocation::Pending => {
            tracing::debug!("Track update (no position data)");
        }
    }
}

/// Total great-circle length of a trail in meters.
fn trail_length_m(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}
