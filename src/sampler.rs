//! The sampling loop.
//!
//! [`FrameSampler`] walks a [`SampleSchedule`] batch by batch: check the
//! cancellation token, fetch the batch from the source, reduce each frame to
//! a colour, paint it, report progress. Colours are appended and painted in
//! schedule order whatever the source does internally.

use crate::color::{ColorSample, average_color};
use crate::error::MinyError;
use crate::layout::Layout;
use crate::progress::ProgressTracker;
use crate::raster::Raster;
use crate::run::RunContext;
use crate::schedule::SampleSchedule;
use crate::source::{FrameSource, ThumbnailSize};

/// Drives one pass over a schedule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameSampler<'a> {
    schedule: &'a SampleSchedule,
    thumbnail: ThumbnailSize,
    batch_size: usize,
}

impl<'a> FrameSampler<'a> {
    pub(crate) fn new(schedule: &'a SampleSchedule, thumbnail: ThumbnailSize, batch_size: usize) -> Self {
        Self {
            schedule,
            thumbnail,
            batch_size: batch_size.max(1),
        }
    }

    /// Sample every scheduled timestamp, painting each colour into `raster`
    /// through `layout` as soon as its batch completes.
    ///
    /// Returns [`MinyError::Cancelled`] as soon as the context's token is
    /// seen cancelled; anything already painted stays painted.
    pub(crate) fn run<S, L>(
        &self,
        source: &mut S,
        layout: &L,
        raster: &mut Raster,
        ctx: &mut RunContext<'_>,
    ) -> Result<Vec<ColorSample>, MinyError>
    where
        S: FrameSource + ?Sized,
        L: Layout + ?Sized,
    {
        let mut tracker = ProgressTracker::new(self.schedule.len());
        let mut colors = Vec::with_capacity(self.schedule.len());

        for (start, timestamps) in self.schedule.batches(self.batch_size) {
            ctx.checkpoint()?;

            log::debug!(
                "Sampling {} frame(s) from index {start} of {}",
                timestamps.len(),
                self.schedule.len()
            );
            let frames = source.frames_at(timestamps, self.thumbnail)?;
            if frames.len() != timestamps.len() {
                return Err(MinyError::Decode(format!(
                    "source returned {} frame(s) for a batch of {}",
                    frames.len(),
                    timestamps.len()
                )));
            }

            // A batch that finished after cancellation is discarded unpainted.
            ctx.checkpoint()?;

            for (offset, frame) in frames.iter().enumerate() {
                let color = average_color(frame);
                layout.paint(raster, start + offset, color);
                colors.push(color);
            }

            let info = tracker.advance(frames.len());
            ctx.report_progress(&colors, &info);
        }

        Ok(colors)
    }
}
