//! Replay of recorded tracks.
//!
//! # Track file format
//!
//! UTF-8 text, one sample per line:
//!
//! ```text
//! # timestamp_ms,latitude,longitude[,speed_mps]
//! 1717243200000,53.630278,9.988333,12.5
//! 1717243201000,53.630390,9.988333,
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. An empty or missing
//! speed column means the device reported no speed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{LocationSource, SourceGuard, SourceUnavailable, WatchOptions};
use crate::coord::GeoPoint;
use crate::tracker::sample::{LocationEvent, Sample};

/// Errors reading a track file.
#[derive(Debug, thiserror::Error)]
pub enum TrackFileError {
    /// The file could not be read.
    #[error("Failed to read track file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be parsed.
    #[error("Line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl TrackFileError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Parse track file contents into samples, in file order.
pub fn parse_track(input: &str) -> Result<Vec<Sample>, TrackFileError> {
    let mut samples = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(TrackFileError::malformed(
                line_no,
                format!("expected 3 or 4 fields, found {}", fields.len()),
            ));
        }

        let millis: i64 = fields[0].parse().map_err(|_| {
            TrackFileError::malformed(line_no, format!("invalid timestamp '{}'", fields[0]))
        })?;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            TrackFileError::malformed(line_no, format!("timestamp {} out of range", millis))
        })?;

        let latitude = parse_number(fields[1], "latitude", line_no)?;
        let longitude = parse_number(fields[2], "longitude", line_no)?;
        let position = GeoPoint::try_new(latitude, longitude)
            .map_err(|e| TrackFileError::malformed(line_no, e.to_string()))?;

        let raw_speed = match fields.get(3) {
            Some(v) if !v.is_empty() => Some(parse_number(v, "speed", line_no)?),
            _ => None,
        };

        samples.push(Sample::new(
            position.latitude,
            position.longitude,
            raw_speed,
            timestamp,
        ));
    }

    Ok(samples)
}

fn parse_number(value: &str, field: &str, line: usize) -> Result<f64, TrackFileError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TrackFileError::malformed(line, format!("invalid {} '{}'", field, value)))
}

/// Load and parse a track file.
pub fn load_track(path: &Path) -> Result<Vec<Sample>, TrackFileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| TrackFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_track(&contents)
}

/// Plays back recorded samples with their original spacing.
///
/// Samples keep their recorded timestamps, so kinematics reflect the
/// recording even when played back faster than real time.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    samples: Vec<Sample>,
    speed_factor: f64,
}

impl ReplaySource {
    /// Replay in real time.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            speed_factor: 1.0,
        }
    }

    /// Divide recorded gaps by `factor`. Zero or negative plays without delay.
    pub fn with_speed_factor(mut self, factor: f64) -> Self {
        self.speed_factor = factor;
        self
    }

    fn delay_between(&self, previous: &Sample, next: &Sample) -> Duration {
        if self.speed_factor <= 0.0 || !self.speed_factor.is_finite() {
            return Duration::ZERO;
        }
        (next.timestamp - previous.timestamp)
            .to_std()
            .map(|gap| gap.div_f64(self.speed_factor))
            .unwrap_or(Duration::ZERO)
    }
}

impl LocationSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn subscribe(
        &self,
        options: WatchOptions,
        events: mpsc::Sender<LocationEvent>,
    ) -> Result<SourceGuard, SourceUnavailable> {
        tracing::info!(
            samples = self.samples.len(),
            speed_factor = self.speed_factor,
            high_accuracy = options.high_accuracy,
            "Replay source started"
        );

        let cancellation = CancellationToken::new();
        let token = cancellation.clone();
        let source = self.clone();

        let task = tokio::spawn(async move {
            let mut previous: Option<&Sample> = None;

            for sample in &source.samples {
                if let Some(prev) = previous {
                    let delay = source.delay_between(prev, sample);
                    if !delay.is_zero() {
                        tokio::select! {
                            _ = token.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }

                tokio::select! {
                    _ = token.cancelled() => break,
                    sent = events.send(LocationEvent::Fix(sample.clone())) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
                previous = Some(sample);
            }

            tracing::debug!("Replay source finished");
        });

        Ok(SourceGuard::with_task(cancellation, task))
    }
}
