//! Progress reporting and cancellation support.
//!
//! This module provides [`RunObserver`] for receiving a run's progress,
//! error and lifecycle notifications, [`CancellationToken`] for cooperative
//! cancellation, and [`ProgressInfo`] for progress snapshots.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use miny::{
//!     BarcodeOptions, ColorSample, ProgressInfo, RunObserver, Session, SyntheticSource,
//! };
//!
//! struct PrintProgress;
//!
//! impl RunObserver for PrintProgress {
//!     fn on_progress(&self, colors: &[ColorSample], info: &ProgressInfo) {
//!         println!("{} colours, {:.1}% complete", colors.len(), info.percentage);
//!     }
//! }
//!
//! let session = Session::new();
//! let source = SyntheticSource::new(Duration::from_secs(4), |_| ColorSample::new(9, 9, 9));
//! let barcode = session.run(source, &BarcodeOptions::linear(), &PrintProgress);
//! assert!(barcode.is_some());
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use crate::color::ColorSample;

/// A snapshot of run progress, delivered after every sample or batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Samples completed and painted so far.
    pub completed: usize,
    /// Samples in the schedule.
    pub total: usize,
    /// Completion percentage, `0.0 ..= 100.0`.
    pub percentage: f64,
    /// Wall-clock time since sampling started.
    pub elapsed: Duration,
    /// Remaining-time estimate from the throughput so far; `None` until a
    /// rate can be measured.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    /// The remaining-time estimate in seconds.
    pub fn estimated_seconds_remaining(&self) -> Option<f64> {
        self.estimated_remaining.map(|remaining| remaining.as_secs_f64())
    }

    /// `true` once every scheduled sample has been painted.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Receiver for a run's observable updates.
///
/// Implementations must be [`Send`] and [`Sync`]; async and threaded
/// consumers drive runs from worker threads.
///
/// Callbacks are infallible. A run that is cancelled invokes neither
/// [`on_error`](RunObserver::on_error) nor a final 100 % progress report.
pub trait RunObserver: Send + Sync {
    /// Called after every completed sample or batch with all colours so far.
    fn on_progress(&self, colors: &[ColorSample], info: &ProgressInfo) {
        let _ = (colors, info);
    }

    /// Called at most once per run, for genuine failures only.
    fn on_error(&self, message: &str) {
        let _ = message;
    }

    /// `true` when the run starts, `false` when it completes, fails or is
    /// cancelled.
    fn on_processing_change(&self, processing: bool) {
        let _ = processing;
    }
}

/// An observer that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RunObserver for NoOpObserver {}

impl<O: RunObserver + ?Sized> RunObserver for Arc<O> {
    fn on_progress(&self, colors: &[ColorSample], info: &ProgressInfo) {
        (**self).on_progress(colors, info);
    }

    fn on_error(&self, message: &str) {
        (**self).on_error(message);
    }

    fn on_processing_change(&self, processing: bool) {
        (**self).on_processing_change(processing);
    }
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state. The sampler checks the token before every sample or
/// batch; a run cannot be interrupted mid-seek.
///
/// # Example
///
/// ```
/// use miny::CancellationToken;
///
/// let token = CancellationToken::new();
/// let clone = token.clone();
/// token.cancel();
/// assert!(clone.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether `self` and `other` are clones of the same token.
    pub fn same_as(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks sampling throughput and produces [`ProgressInfo`] snapshots.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    total: usize,
    completed: usize,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            start_time: Instant::now(),
        }
    }

    /// Record `samples` more completed samples and snapshot progress.
    pub(crate) fn advance(&mut self, samples: usize) -> ProgressInfo {
        self.completed = (self.completed + samples).min(self.total);
        self.snapshot(self.start_time.elapsed())
    }

    /// Progress as of `elapsed` since the start.
    pub(crate) fn snapshot(&self, elapsed: Duration) -> ProgressInfo {
        let percentage = if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        };

        ProgressInfo {
            completed: self.completed,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining: estimate_remaining(self.completed, self.total, elapsed),
        }
    }
}

/// `(total - done) / (done / elapsed)`, or `None` while the rate is not
/// positive.
pub(crate) fn estimate_remaining(done: usize, total: usize, elapsed: Duration) -> Option<Duration> {
    let seconds = elapsed.as_secs_f64();
    if done == 0 || seconds <= 0.0 {
        return None;
    }
    let rate = done as f64 / seconds;
    let remaining = total.saturating_sub(done) as f64 / rate;
    Duration::try_from_secs_f64(remaining).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_needs_a_measured_rate() {
        assert_eq!(estimate_remaining(0, 10, Duration::from_secs(1)), None);
        assert_eq!(estimate_remaining(3, 10, Duration::ZERO), None);
    }

    #[test]
    fn estimate_extrapolates_throughput() {
        // 5 samples in 2 s is 2.5 samples/s; 15 left takes 6 s.
        let remaining = estimate_remaining(5, 20, Duration::from_secs(2)).unwrap();
        assert!((remaining.as_secs_f64() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_reports_exact_percentages() {
        let mut tracker = ProgressTracker::new(4);
        tracker.completed = 1;
        let info = tracker.snapshot(Duration::from_secs(1));
        assert_eq!(info.percentage, 25.0);
        assert_eq!(info.estimated_seconds_remaining(), Some(3.0));
        assert!(!info.is_complete());
    }

    #[test]
    fn advance_saturates_at_total() {
        let mut tracker = ProgressTracker::new(3);
        tracker.advance(2);
        let info = tracker.advance(5);
        assert_eq!(info.completed, 3);
        assert_eq!(info.percentage, 100.0);
        assert!(info.is_complete());
    }
}
