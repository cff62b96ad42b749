//! Sample Processor - derives speed and deceleration from consecutive fixes.
//!
//! Each sample is processed to completion against an exclusively owned
//! [`TrackState`]:
//!
//! 1. Device speed (m/s) is converted to km/h, rounded to 2 decimals
//! 2. The fix becomes the current location and is appended to the trail
//! 3. With a previous fix, speed is derived from the great-circle distance
//!    and elapsed time; a deceleration above the brake threshold raises
//!    [`AlertKind::HardBraking`](super::AlertKind::HardBraking)
//! 4. The device speed is compared against the speed limit and raises
//!    [`AlertKind::SpeedExceeded`](super::AlertKind::SpeedExceeded)
//!
//! # Speed sources
//!
//! The over-speed check uses the *device-reported* speed while the braking
//! check uses the *derived* speed. The two are deliberately not unified.

use super::alert::{AlertEvent, AlertThresholds};
use super::sample::{LocationError, LocationEvent, Sample};
use super::state::{CurrentLocation, TrackState};

/// Meters per second to kilometers per hour.
const MPS_TO_KMH: f64 = 3.6;

/// Convert a speed in m/s to km/h, rounded to two decimals.
#[inline]
pub fn to_kmh(speed_mps: f64) -> f64 {
    (speed_mps * MPS_TO_KMH * 100.0).round() / 100.0
}

/// Applies location events to a [`TrackState`] and decides on alerts.
#[derive(Debug, Clone, Default)]
pub struct SampleProcessor {
    thresholds: AlertThresholds,
}

impl SampleProcessor {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    /// Apply any location event, returning the alerts it raised.
    pub fn process_event(&self, state: &mut TrackState, event: &LocationEvent) -> Vec<AlertEvent> {
        match event {
            LocationEvent::Fix(sample) => self.process_sample(state, sample),
            LocationEvent::Error(error) => {
                self.process_error(state, error);
                Vec::new()
            }
        }
    }

    /// Apply a successful reading.
    pub fn process_sample(&self, state: &mut TrackState, sample: &Sample) -> Vec<AlertEvent> {
        let mut alerts = Vec::new();
        let position = sample.position();
        let speed = to_kmh(sample.raw_speed.unwrap_or(0.0));

        state.current_location = CurrentLocation::Fix {
            latitude: sample.latitude,
            longitude: sample.longitude,
            speed_kmh: speed,
        };
        state.path.push(position);

        match (
            state.previous_speed,
            state.previous_position,
            state.previous_timestamp,
        ) {
            (Some(previous_speed), Some(previous_position), Some(previous_timestamp)) => {
                // Out-of-order or duplicate timestamps leave the kinematics untouched.
                match (sample.timestamp - previous_timestamp).to_std() {
                    Ok(elapsed) if !elapsed.is_zero() => {
                        let time_diff = elapsed.as_secs_f64();
                        let distance = previous_position.distance_to(&position);
                        let current_speed = distance / time_diff * MPS_TO_KMH;
                        let deceleration = (previous_speed - current_speed) / time_diff;

                        tracing::trace!(
                            distance_m = format!("{:.2}", distance),
                            time_diff_s = time_diff,
                            derived_kmh = format!("{:.2}", current_speed),
                            deceleration = format!("{:.2}", deceleration),
                            "Derived kinematics"
                        );

                        if deceleration > self.thresholds.brake_threshold_kmh_per_s {
                            tracing::info!(
                                deceleration = format!("{:.1}", deceleration),
                                threshold = self.thresholds.brake_threshold_kmh_per_s,
                                "Hard braking detected"
                            );
                            alerts.push(AlertEvent::hard_braking(deceleration));
                        }

                        state.previous_speed = Some(current_speed);
                    }
                    _ => {
                        tracing::debug!(
                            previous = %previous_timestamp,
                            current = %sample.timestamp,
                            "Non-increasing sample timestamp, skipping kinematics"
                        );
                    }
                }
            }
            _ => {
                state.previous_speed = Some(speed);
            }
        }

        state.previous_position = Some(position);
        state.previous_timestamp = Some(sample.timestamp);

        if speed > self.thresholds.speed_limit_kmh {
            if !state.speed_exceeded {
                tracing::info!(
                    speed_kmh = speed,
                    limit_kmh = self.thresholds.speed_limit_kmh,
                    "Speed limit exceeded"
                );
            }
            alerts.push(AlertEvent::speed_exceeded(speed));
            state.speed_exceeded = true;
        } else {
            state.speed_exceeded = false;
        }

        alerts
    }

    /// Apply a failed reading. Only the current location changes.
    pub fn process_error(&self, state: &mut TrackState, error: &LocationError) {
        tracing::warn!(kind = %error.kind, message = %error.message, "Location source error");
        state.current_location = CurrentLocation::Error(error.message.clone());
    }
}
