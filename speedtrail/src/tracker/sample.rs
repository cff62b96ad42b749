//! Location events delivered by a [`LocationSource`](super::LocationSource).
//!
//! - [`Sample`] - One position/speed/time reading
//! - [`LocationError`] - One failed reading (the stream keeps going)
//! - [`LocationEvent`] - Either of the two, as pushed by a source

use chrono::{DateTime, Utc};

use crate::coord::GeoPoint;

/// One position reading from the location source.
///
/// Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Instantaneous speed in meters per second, if the device reports one.
    pub raw_speed: Option<f64>,

    /// When the reading was taken.
    ///
    /// Elapsed time between consecutive samples is measured on this clock.
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// Create a sample with an explicit timestamp.
    pub fn new(
        latitude: f64,
        longitude: f64,
        raw_speed: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            raw_speed,
            timestamp,
        }
    }

    /// Create a sample stamped with the current wall-clock time.
    pub fn now(latitude: f64, longitude: f64, raw_speed: Option<f64>) -> Self {
        Self::new(latitude, longitude, raw_speed, Utc::now())
    }

    /// Position of this sample.
    #[inline]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Why a single location reading failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    /// The user or platform refused access to location.
    PermissionDenied,
    /// No position could be determined.
    PositionUnavailable,
    /// The source did not produce a position within its timeout.
    Timeout,
}

impl std::fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::PositionUnavailable => write!(f, "position unavailable"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// A failed reading reported by the source.
///
/// The message is the platform-provided text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub message: String,
}

impl LocationError {
    pub fn new(kind: LocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(LocationErrorKind::PermissionDenied, message)
    }

    pub fn position_unavailable(message: impl Into<String>) -> Self {
        Self::new(LocationErrorKind::PositionUnavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(LocationErrorKind::Timeout, message)
    }
}

/// One event pushed by a location source.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A successful reading.
    Fix(Sample),
    /// A failed reading.
    Error(LocationError),
}

impl From<Sample> for LocationEvent {
    fn from(sample: Sample) -> Self {
        Self::Fix(sample)
    }
}

impl From<LocationError> for LocationEvent {
    fn from(error: LocationError) -> Self {
        Self::Error(error)
    }
}
