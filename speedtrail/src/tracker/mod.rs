//! Live Tracking Module
//!
//! Follows a live stream of geolocation samples, keeps the trail of visited
//! points, and raises alerts when the speed limit or the hard braking
//! threshold is crossed.
//!
//! # Architecture
//!
//! One control path, driven by the location source:
//!
//! - **Location Source** → pushes [`LocationEvent`]s until unsubscribed
//! - **Sample Processor** → updates the [`TrackState`] and decides on alerts
//! - **Alert Dispatcher** → forwards alerts to the [`NotificationService`]
//! - **Presentation** → reads [`TrackView`] snapshots, never writes back
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use speedtrail::tracker::{ChannelSource, LogNotifier, Sample, Tracker};
//!
//! let source = Arc::new(ChannelSource::new());
//! let handle = Tracker::new(source.clone(), Arc::new(LogNotifier::granted())).start();
//!
//! source.push(Sample::now(53.63, 9.99, Some(12.0))).await;
//!
//! let mut views = handle.subscribe();
//! while views.changed().await.is_ok() {
//!     println!("{}", views.borrow().status_line());
//! }
//! ```
//!
//! # Components
//!
//! - [`sample`] - `Sample`, `LocationError`, `LocationEvent`
//! - [`state`] - `TrackState`, `CurrentLocation`, `TrackView`
//! - [`alert`] - `AlertEvent`, `AlertKind`, `AlertThresholds`
//! - [`processor`] - `SampleProcessor` with the kinematics
//! - [`dispatcher`] - `AlertDispatcher`, `NotificationService`, `LogNotifier`
//! - [`source`] - `LocationSource` and the built-in sources
//! - [`runtime`] - `Tracker` and `TrackerHandle`
//! - [`logger`] - periodic track logging at DEBUG level

mod alert;
mod dispatcher;
mod logger;
mod processor;
mod runtime;
mod sample;
mod source;
mod state;

pub use alert::{
    AlertEvent, AlertKind, AlertThresholds, DEFAULT_BRAKE_THRESHOLD_KMH_PER_S,
    DEFAULT_SPEED_LIMIT_KMH,
};
pub use dispatcher::{AlertDispatcher, BoxFuture, LogNotifier, NotificationService, Permission};
pub use processor::{to_kmh, SampleProcessor};
pub use runtime::{TrackSummary, Tracker, TrackerConfig, TrackerHandle};
pub use sample::{LocationError, LocationErrorKind, LocationEvent, Sample};
pub use source::{
    load_track, parse_track, ChannelSource, LocationSource, ReplaySource, SourceGuard,
    SourceUnavailable, TrackFileError, UnsupportedSource, WatchOptions, UNSUPPORTED_MESSAGE,
};
pub use state::{CurrentLocation, TrackState, TrackView, MAP_ZOOM};

// Track logger for drive analysis (DEBUG level only)
pub use logger::{spawn_track_logger, DEFAULT_LOG_INTERVAL};
