//! The frame-source seam.
//!
//! A [`FrameSource`] is anything the sampler can probe for metadata and ask
//! for a decoded frame at a timestamp. [`VideoFile`](crate::VideoFile) is the
//! FFmpeg implementation; [`SyntheticSource`](crate::SyntheticSource) is an
//! in-memory one used by tests and demos.

use std::time::Duration;

use image::RgbaImage;

use crate::error::MinyError;
use crate::metadata::SourceMetadata;

/// Dimensions frames are scaled to before colour reduction.
///
/// Shrinking first makes reduction cost proportional to the thumbnail, not
/// to the native frame size; the average colour barely changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailSize {
    /// Width in pixels (at least 1).
    pub width: u32,
    /// Height in pixels (at least 1).
    pub height: u32,
}

impl ThumbnailSize {
    /// 32×32, used by the linear presets.
    pub const SMALL: ThumbnailSize = ThumbnailSize::square(32);
    /// 64×64, used by the hexagonal ring preset.
    pub const LARGE: ThumbnailSize = ThumbnailSize::square(64);

    /// A square thumbnail of `side` pixels.
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Number of pixels in one thumbnail.
    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A video resource the sampler can read frames from.
///
/// Implementations must only return a frame once the seek to `timestamp`
/// has fully settled; the sampler never reads a frame early.
pub trait FrameSource {
    /// Human-readable identifier (path or URL) used in errors and logs.
    fn name(&self) -> &str;

    /// Metadata resolved when the source was opened.
    fn metadata(&self) -> &SourceMetadata;

    /// Decode the frame visible at `timestamp`, scaled to `size`.
    fn frame_at(&mut self, timestamp: Duration, size: ThumbnailSize)
    -> Result<RgbaImage, MinyError>;

    /// Decode one frame per timestamp, returned in the order requested.
    ///
    /// The default decodes sequentially; implementations may keep several
    /// decodes in flight as long as the output order matches the input.
    fn frames_at(
        &mut self,
        timestamps: &[Duration],
        size: ThumbnailSize,
    ) -> Result<Vec<RgbaImage>, MinyError> {
        timestamps
            .iter()
            .map(|&timestamp| self.frame_at(timestamp, size))
            .collect()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn metadata(&self) -> &SourceMetadata {
        (**self).metadata()
    }

    fn frame_at(
        &mut self,
        timestamp: Duration,
        size: ThumbnailSize,
    ) -> Result<RgbaImage, MinyError> {
        (**self).frame_at(timestamp, size)
    }

    fn frames_at(
        &mut self,
        timestamps: &[Duration],
        size: ThumbnailSize,
    ) -> Result<Vec<RgbaImage>, MinyError> {
        (**self).frames_at(timestamps, size)
    }
}
