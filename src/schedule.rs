//! Sample schedules.
//!
//! A [`SampleSchedule`] is the fixed list of timestamps a run reads frames
//! at. It is computed once from the source duration and never changes while
//! the run is in flight.

use std::time::Duration;

use crate::error::MinyError;
use crate::metadata::SourceMetadata;

/// How timestamps are spread across the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleMode {
    /// `t_i = i · duration / n`. Used by every canvas layout.
    #[default]
    Uniform,
    /// Timestamps snapped to whole frames: `n` is capped at the source's
    /// frame count and `t_i = ⌊i / n · frames⌋ / fps`. Used by the batched
    /// strip preset.
    FrameIndexed,
}

/// Ordered timestamps at which frames are sampled.
///
/// Invariants: non-empty, first entry zero, non-decreasing, every entry
/// strictly below the source duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSchedule {
    timestamps: Vec<Duration>,
    duration: Duration,
}

impl SampleSchedule {
    /// `frame_count` evenly spaced timestamps over `duration_seconds`.
    ///
    /// # Errors
    ///
    /// - [`MinyError::InvalidOptions`] if `frame_count` is zero.
    /// - [`MinyError::Metadata`] if the duration is negative, not finite, or
    ///   shorter than one nanosecond per sample.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use miny::SampleSchedule;
    ///
    /// let schedule = SampleSchedule::uniform(10.0, 5)?;
    /// let seconds: Vec<u64> = schedule.iter().map(|t| t.as_secs()).collect();
    /// assert_eq!(seconds, vec![0, 2, 4, 6, 8]);
    /// # Ok::<(), miny::MinyError>(())
    /// ```
    pub fn uniform(duration_seconds: f64, frame_count: usize) -> Result<Self, MinyError> {
        if frame_count == 0 {
            return Err(MinyError::InvalidOptions(
                "frame count must be greater than zero".to_string(),
            ));
        }
        let duration = Duration::try_from_secs_f64(duration_seconds)
            .ok()
            .filter(|duration| duration.as_nanos() >= frame_count as u128)
            .ok_or_else(|| MinyError::Metadata {
                path: "schedule".to_string(),
                reason: format!(
                    "cannot schedule {frame_count} samples over a duration of {duration_seconds}s"
                ),
            })?;

        // ⌊i · d / n⌋ in whole nanoseconds keeps every entry below `d`.
        let total_nanos = duration.as_nanos();
        let timestamps = (0..frame_count)
            .map(|index| {
                let nanos = index as u128 * total_nanos / frame_count as u128;
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            })
            .collect();

        Ok(Self {
            timestamps,
            duration,
        })
    }

    /// Timestamps snapped to frame boundaries.
    ///
    /// The sample count is `min(max_samples, duration_in_frames)`; with an
    /// unknown frame count or frame rate this falls back to
    /// [`uniform`](SampleSchedule::uniform).
    ///
    /// # Errors
    ///
    /// Same as [`uniform`](SampleSchedule::uniform).
    pub fn frame_indexed(
        metadata: &SourceMetadata,
        max_samples: usize,
    ) -> Result<Self, MinyError> {
        let duration_seconds = metadata.duration.as_secs_f64();
        let total_frames = metadata.duration_in_frames;
        let fps = metadata.frames_per_second;

        if total_frames == 0 || !(fps > 0.0) {
            return Self::uniform(duration_seconds, max_samples);
        }

        let frame_count = max_samples.min(usize::try_from(total_frames).unwrap_or(usize::MAX));
        let mut schedule = Self::uniform(duration_seconds, frame_count)?;
        let last_frame = (duration_seconds * fps).ceil().max(1.0) - 1.0;

        for (index, timestamp) in schedule.timestamps.iter_mut().enumerate() {
            // ⌊i / n · frames⌋ in integers.
            let frame = (index as u128 * total_frames as u128 / frame_count as u128) as f64;
            *timestamp = Duration::from_secs_f64(frame.min(last_frame) / fps);
        }
        Ok(schedule)
    }

    /// Build the schedule `mode` asks for from resolved metadata.
    pub(crate) fn for_mode(
        mode: ScheduleMode,
        metadata: &SourceMetadata,
        duration_seconds: f64,
        frame_count: usize,
    ) -> Result<Self, MinyError> {
        match mode {
            ScheduleMode::Uniform => Self::uniform(duration_seconds, frame_count),
            ScheduleMode::FrameIndexed => Self::frame_indexed(metadata, frame_count),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always `false`; a schedule holds at least one timestamp.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The duration the schedule spans.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Timestamp of sample `index`.
    pub fn get(&self, index: usize) -> Option<Duration> {
        self.timestamps.get(index).copied()
    }

    /// All timestamps in schedule order.
    pub fn timestamps(&self) -> &[Duration] {
        &self.timestamps
    }

    /// Iterate over the timestamps in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = Duration> + '_ {
        self.timestamps.iter().copied()
    }

    /// Consecutive runs of at most `batch_size` timestamps, with the index of
    /// each run's first sample.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = (usize, &[Duration])> + '_ {
        let batch_size = batch_size.max(1);
        self.timestamps
            .chunks(batch_size)
            .enumerate()
            .map(move |(chunk, timestamps)| (chunk * batch_size, timestamps))
    }
}
