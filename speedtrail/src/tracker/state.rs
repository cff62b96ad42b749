//! Track state and the read-only view published to presentation.
//!
//! - [`TrackState`] - Kinematic memory and trail, owned by one tracker
//! - [`CurrentLocation`] - What the status line shows right now
//! - [`TrackView`] - Immutable snapshot for a map widget

use chrono::{DateTime, Utc};

use crate::coord::GeoPoint;

/// Zoom level a map widget should use for the live view.
pub const MAP_ZOOM: u8 = 15;

/// Latest location as presented to the user.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CurrentLocation {
    /// Nothing received yet.
    #[default]
    Pending,
    /// Last successful reading, speed in km/h.
    Fix {
        latitude: f64,
        longitude: f64,
        speed_kmh: f64,
    },
    /// The source reported an error; the message replaces the location.
    Error(String),
}

impl CurrentLocation {
    /// Position of the current fix, if there is one.
    pub fn position(&self) -> Option<GeoPoint> {
        match self {
            Self::Fix {
                latitude,
                longitude,
                ..
            } => Some(GeoPoint::new(*latitude, *longitude)),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Per-tracker state threaded through every processing step.
///
/// `previous_speed`, `previous_position` and `previous_timestamp` are
/// always all set or all unset. `path` only ever grows, by one point per
/// successful sample.
#[derive(Debug, Clone, Default)]
pub struct TrackState {
    pub(super) previous_speed: Option<f64>,
    pub(super) previous_position: Option<GeoPoint>,
    pub(super) previous_timestamp: Option<DateTime<Utc>>,
    pub(super) path: Vec<GeoPoint>,
    pub(super) current_location: CurrentLocation,
    pub(super) speed_exceeded: bool,
}

impl TrackState {
    /// Create an empty state (no fix, empty trail).
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed remembered from the previous sample (km/h).
    ///
    /// Device-reported for the first sample, derived from positions after.
    pub fn previous_speed(&self) -> Option<f64> {
        self.previous_speed
    }

    pub fn previous_position(&self) -> Option<GeoPoint> {
        self.previous_position
    }

    pub fn previous_timestamp(&self) -> Option<DateTime<Utc>> {
        self.previous_timestamp
    }

    /// Trail of visited points, oldest first.
    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    pub fn current_location(&self) -> &CurrentLocation {
        &self.current_location
    }

    /// Whether the last sample was above the speed limit.
    pub fn speed_exceeded(&self) -> bool {
        self.speed_exceeded
    }

    /// Snapshot this state for presentation.
    pub fn view(&self) -> TrackView {
        TrackView {
            current_location: self.current_location.clone(),
            path: self.path.clone(),
            speed_exceeded: self.speed_exceeded,
            map_center: self.path.last().copied().unwrap_or(GeoPoint::ORIGIN),
            zoom: MAP_ZOOM,
        }
    }
}

/// Read-only snapshot of a tracker, published after every event.
///
/// This is everything a map widget needs: center, zoom, marker and trail.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackView {
    pub current_location: CurrentLocation,
    pub path: Vec<GeoPoint>,
    pub speed_exceeded: bool,

    /// Last fix, or 0°N 0°E before the first one. Errors do not move it.
    pub map_center: GeoPoint,

    pub zoom: u8,
}

impl Default for TrackView {
    fn default() -> Self {
        TrackState::new().view()
    }
}

impl TrackView {
    /// One-line status text.
    pub fn status_line(&self) -> String {
        match &self.current_location {
            CurrentLocation::Pending => "Waiting for location...".to_string(),
            CurrentLocation::Fix {
                latitude,
                longitude,
                speed_kmh,
            } => format!(
                "Latitude: {}, Longitude: {}, Speed: {} km/h",
                latitude, longitude, speed_kmh
            ),
            CurrentLocation::Error(message) => format!("Error: {}", message),
        }
    }

    /// Marker position (the current fix).
    pub fn marker(&self) -> Option<GeoPoint> {
        self.current_location.position()
    }

    /// Trail to draw, only once it has at least two points.
    pub fn polyline(&self) -> Option<&[GeoPoint]> {
        (self.path.len() > 1).then_some(self.path.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = TrackState::new();

        assert!(state.path().is_empty());
        assert!(state.previous_speed().is_none());
        assert!(state.previous_position().is_none());
        assert!(state.previous_timestamp().is_none());
        assert_eq!(state.current_location(), &CurrentLocation::Pending);
        assert!(!state.speed_exceeded());
    }

    #[test]
    fn test_pending_view() {
        let view = TrackView::default();

        assert_eq!(view.status_line(), "Waiting for location...");
        assert_eq!(view.map_center, GeoPoint::ORIGIN);
        assert_eq!(view.zoom, MAP_ZOOM);
        assert!(view.marker().is_none());
        assert!(view.polyline().is_none());
    }

    #[test]
    fn test_fix_status_line() {
        let mut state = TrackState::new();
        state.current_location = CurrentLocation::Fix {
            latitude: 53.5,
            longitude: 10.25,
            speed_kmh: 36.0,
        };

        assert_eq!(
            state.view().status_line(),
            "Latitude: 53.5, Longitude: 10.25, Speed: 36 km/h"
        );
    }

    #[test]
    fn test_error_keeps_map_center() {
        let mut state = TrackState::new();
        state.path.push(GeoPoint::new(43.6, 1.4));
        state.current_location = CurrentLocation::Error("Timeout expired".to_string());

        let view = state.view();
        assert_eq!(view.status_line(), "Error: Timeout expired");
        assert_eq!(view.map_center, GeoPoint::new(43.6, 1.4));
        assert!(view.marker().is_none());
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut state = TrackState::new();
        state.path.push(GeoPoint::new(43.6, 1.4));
        assert!(state.view().polyline().is_none());

        state.path.push(GeoPoint::new(43.7, 1.5));
        assert_eq!(state.view().polyline().map(|p| p.len()), Some(2));
    }
}
