//! Deterministic in-memory frame source.
//!
//! [`SyntheticSource`] renders every frame as a single flat colour chosen by
//! a caller-supplied function of the timestamp. It needs no FFmpeg, records
//! every timestamp it was asked for, and can be told to fail at a given read,
//! which makes it the workhorse of the test-suite and the benches.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use image::{Rgba, RgbaImage};

use crate::color::ColorSample;
use crate::error::MinyError;
use crate::metadata::SourceMetadata;
use crate::source::{FrameSource, ThumbnailSize};

type ColorFn = Box<dyn Fn(Duration) -> ColorSample + Send>;
type ReadHook = Box<dyn FnMut(usize) + Send>;

/// A frame source whose frames are flat colours computed from time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use miny::{ColorSample, FrameSource, SyntheticSource, ThumbnailSize};
///
/// let mut source = SyntheticSource::new(Duration::from_secs(10), |t| {
///     ColorSample::new((t.as_secs() * 20) as u8, 0, 0)
/// });
/// let frame = source.frame_at(Duration::from_secs(2), ThumbnailSize::SMALL).unwrap();
/// assert_eq!(frame.get_pixel(0, 0).0, [40, 0, 0, 255]);
/// assert_eq!(source.requested(), &[Duration::from_secs(2)]);
/// ```
pub struct SyntheticSource {
    metadata: SourceMetadata,
    color: ColorFn,
    requested: Vec<Duration>,
    fail_at: Option<usize>,
    on_read: Option<ReadHook>,
}

impl Debug for SyntheticSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SyntheticSource")
            .field("metadata", &self.metadata)
            .field("requested", &self.requested.len())
            .field("fail_at", &self.fail_at)
            .finish_non_exhaustive()
    }
}

impl SyntheticSource {
    /// A 30 fps source of the given duration.
    pub fn new<F>(duration: Duration, color: F) -> Self
    where
        F: Fn(Duration) -> ColorSample + Send + 'static,
    {
        Self::with_metadata(SourceMetadata::from_duration(duration, 30.0), color)
    }

    /// A source reporting arbitrary metadata.
    pub fn with_metadata<F>(metadata: SourceMetadata, color: F) -> Self
    where
        F: Fn(Duration) -> ColorSample + Send + 'static,
    {
        Self {
            metadata,
            color: Box::new(color),
            requested: Vec::new(),
            fail_at: None,
            on_read: None,
        }
    }

    /// Fail the `read_index`-th frame read (0-based) with a decode error.
    #[must_use]
    pub fn failing_at(mut self, read_index: usize) -> Self {
        self.fail_at = Some(read_index);
        self
    }

    /// Call `hook` with the read index before every frame read.
    ///
    /// Tests use this to cancel a run or tear down its consumer at a precise
    /// point in the schedule.
    #[must_use]
    pub fn on_read<H>(mut self, hook: H) -> Self
    where
        H: FnMut(usize) + Send + 'static,
    {
        self.on_read = Some(Box::new(hook));
        self
    }

    /// Every timestamp read so far, in request order.
    pub fn requested(&self) -> &[Duration] {
        &self.requested
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn frame_at(
        &mut self,
        timestamp: Duration,
        size: ThumbnailSize,
    ) -> Result<RgbaImage, MinyError> {
        let read_index = self.requested.len();
        if let Some(hook) = self.on_read.as_mut() {
            hook(read_index);
        }
        self.requested.push(timestamp);

        if self.fail_at == Some(read_index) {
            return Err(MinyError::Decode(format!(
                "synthetic failure at read {read_index}"
            )));
        }

        let color = (self.color)(timestamp);
        Ok(RgbaImage::from_pixel(
            size.width,
            size.height,
            Rgba([color.r, color.g, color.b, 255]),
        ))
    }
}
