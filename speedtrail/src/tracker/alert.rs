//! Alert events and the thresholds that trigger them.

/// Default speed limit in km/h.
pub const DEFAULT_SPEED_LIMIT_KMH: f64 = 80.0;

/// Default hard braking threshold in km/h per second.
pub const DEFAULT_BRAKE_THRESHOLD_KMH_PER_S: f64 = 20.0;

/// Which condition raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Device-reported speed is above the speed limit.
    SpeedExceeded,
    /// Derived deceleration is above the brake threshold.
    HardBraking,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpeedExceeded => write!(f, "SpeedExceeded"),
            Self::HardBraking => write!(f, "HardBraking"),
        }
    }
}

/// An alert ready to be shown to the user.
///
/// Alerts are not stored; they are handed to the dispatcher and forgotten.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub message: String,
}

impl AlertEvent {
    /// Over-speed alert for a device-reported speed in km/h.
    ///
    /// The speed is printed in its shortest decimal form (`90`, `90.5`).
    pub fn speed_exceeded(speed_kmh: f64) -> Self {
        Self {
            kind: AlertKind::SpeedExceeded,
            message: format!("⚠ Exceeding speed limit! Current: {} km/h", speed_kmh),
        }
    }

    /// Hard braking alert for a deceleration in km/h per second.
    pub fn hard_braking(deceleration: f64) -> Self {
        Self {
            kind: AlertKind::HardBraking,
            message: format!(
                "⚠ HARD BRAKING DETECTED! Deceleration: {:.1} km/h/s",
                deceleration
            ),
        }
    }
}

/// Alert thresholds applied by the sample processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Speed (km/h) above which an over-speed alert fires.
    pub speed_limit_kmh: f64,

    /// Deceleration (km/h per second) above which a hard braking alert fires.
    pub brake_threshold_kmh_per_s: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            speed_limit_kmh: DEFAULT_SPEED_LIMIT_KMH,
            brake_threshold_kmh_per_s: DEFAULT_BRAKE_THRESHOLD_KMH_PER_S,
        }
    }
}
