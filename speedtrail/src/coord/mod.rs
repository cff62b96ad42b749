//! Geographic coordinate helpers
//!
//! Provides the [`GeoPoint`] type shared by the tracker and the great-circle
//! distance used to derive speed between consecutive fixes.

mod types;


pub use types::{CoordError, GeoPoint, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Great-circle distance between two points in meters (haversine formula).
///
/// Uses a spherical earth of radius [`EARTH_RADIUS_M`]. Accurate at every
/// latitude, including near the poles and across the antimeridian.
#[inline]
pub fn haversine_distance_m(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let dphi = (to.latitude - from.latitude).to_radians();
    let dlambda = (to.longitude - from.longitude).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal points
    let a = ((dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}
