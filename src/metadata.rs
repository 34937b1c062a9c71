//! Source metadata.
//!
//! [`SourceMetadata`] is resolved once when a source is opened and is what
//! the Metadata Probe hands to the sampler. Only `duration` is required by
//! the uniform schedule; `duration_in_frames` and `frames_per_second` drive
//! the frame-indexed schedule used by the batched preset.

use std::time::Duration;

use crate::error::MinyError;

/// Metadata for a decodable video source.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SourceMetadata {
    /// Total playable duration. Zero when the container did not report one.
    pub duration: Duration,
    /// Estimated number of frames (`duration × frames_per_second`).
    pub duration_in_frames: u64,
    /// Average frame rate (approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Native frame width in pixels.
    pub width: u32,
    /// Native frame height in pixels.
    pub height: u32,
    /// Video codec name (e.g. `"h264"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
}

impl SourceMetadata {
    /// Metadata for a source that only knows its duration and frame rate.
    pub fn from_duration(duration: Duration, frames_per_second: f64) -> Self {
        Self {
            duration,
            duration_in_frames: (duration.as_secs_f64() * frames_per_second) as u64,
            frames_per_second,
            width: 0,
            height: 0,
            codec: "unknown".to_string(),
            format: "unknown".to_string(),
        }
    }

    /// The duration in seconds, or a metadata error when it is zero or not
    /// finite.
    ///
    /// A degenerate duration is never turned into a schedule.
    pub fn resolved_duration(&self, source: &str) -> Result<f64, MinyError> {
        let seconds = self.duration.as_secs_f64();
        if seconds > 0.0 && seconds.is_finite() {
            Ok(seconds)
        } else {
            Err(MinyError::Metadata {
                path: source.to_string(),
                reason: "duration could not be resolved".to_string(),
            })
        }
    }
}
