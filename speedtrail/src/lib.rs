//! speedtrail - live position tracking with speed and braking alerts
//!
//! Follows a continuous stream of geolocation samples, keeps the trail of
//! visited points, derives speed and deceleration between consecutive fixes,
//! and raises local notifications when the speed limit or the hard braking
//! threshold is crossed.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use speedtrail::config::ConfigFile;
//! use speedtrail::tracker::{load_track, LogNotifier, ReplaySource, Tracker};
//!
//! let config = ConfigFile::load()?;
//! let source = ReplaySource::new(load_track(path)?);
//! let handle = Tracker::with_config(
//!     Arc::new(source),
//!     Arc::new(LogNotifier::granted()),
//!     config.tracker_config(),
//! )
//! .start();
//!
//! let summary = handle.join().await;
//! ```

pub mod config;
pub mod coord;
pub mod logging;
pub mod tracker;

/// Version of the speedtrail library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
