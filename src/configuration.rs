//! Barcode configuration.
//!
//! [`BarcodeOptions`] is a builder that fixes everything a run needs before
//! it starts: layout, sample count, schedule mode, thumbnail size, batch
//! size and raster geometry. Nothing in it is negotiated at runtime.
//!
//! # Example
//!
//! ```
//! use miny::{BarcodeOptions, LayoutKind};
//!
//! let options = BarcodeOptions::hexagonal()
//!     .with_frame_count(37)
//!     .with_raster_size(600, 600);
//! assert_eq!(options.layout(), LayoutKind::HexRing);
//! assert_eq!(options.frame_count(), 37);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::color::ColorSample;
use crate::error::MinyError;
use crate::layout::{HexGridLayout, HexRingLayout, Layout, LayoutKind, LinearLayout};
use crate::raster::DEFAULT_BACKGROUND;
use crate::schedule::ScheduleMode;
use crate::source::ThumbnailSize;

/// Settings for one barcode run.
///
/// Start from a preset ([`hexagonal`](BarcodeOptions::hexagonal),
/// [`linear`](BarcodeOptions::linear), [`strip`](BarcodeOptions::strip),
/// [`hex_grid`](BarcodeOptions::hex_grid)) and adjust with the `with_*`
/// methods.
#[derive(Clone, PartialEq)]
#[must_use]
pub struct BarcodeOptions {
    pub(crate) layout: LayoutKind,
    pub(crate) frame_count: usize,
    pub(crate) schedule_mode: ScheduleMode,
    pub(crate) thumbnail: ThumbnailSize,
    pub(crate) batch_size: usize,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) hex_radius: Option<f64>,
    pub(crate) background: ColorSample,
}

impl Debug for BarcodeOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BarcodeOptions")
            .field("layout", &self.layout)
            .field("frame_count", &self.frame_count)
            .field("schedule_mode", &self.schedule_mode)
            .field(
                "thumbnail",
                &format_args!("{}x{}", self.thumbnail.width, self.thumbnail.height),
            )
            .field("batch_size", &self.batch_size)
            .field("raster", &format_args!("{}x{}", self.width, self.height))
            .field("hex_radius", &self.hex_radius)
            .field("background", &format_args!("{}", self.background))
            .finish()
    }
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self::hexagonal()
    }
}

impl BarcodeOptions {
    /// Ring-walk mosaic: 91 samples on a 1200×1200 raster, 64×64
    /// thumbnails, hexagon radius `1200 / 24`.
    pub fn hexagonal() -> Self {
        Self {
            layout: LayoutKind::HexRing,
            frame_count: 91,
            schedule_mode: ScheduleMode::Uniform,
            thumbnail: ThumbnailSize::LARGE,
            batch_size: 1,
            width: 1200,
            height: 1200,
            hex_radius: None,
            background: DEFAULT_BACKGROUND,
        }
    }

    /// Bar strip: 200 samples on a 1000×200 raster, 32×32 thumbnails.
    pub fn linear() -> Self {
        Self {
            layout: LayoutKind::Linear,
            frame_count: 200,
            thumbnail: ThumbnailSize::SMALL,
            width: 1000,
            height: 200,
            ..Self::hexagonal()
        }
    }

    /// Batched bar strip: up to 300 frame-aligned samples (never more than
    /// the source has frames), fetched five at a time.
    pub fn strip() -> Self {
        Self {
            frame_count: 300,
            schedule_mode: ScheduleMode::FrameIndexed,
            batch_size: 5,
            ..Self::linear()
        }
    }

    /// Offset-grid preview: 800×400 raster, radius 20, one sample per grid
    /// cell.
    pub fn hex_grid() -> Self {
        let (width, height) = (800, 400);
        let radius = HexGridLayout::DEFAULT_RADIUS;
        Self {
            layout: LayoutKind::HexGrid,
            frame_count: HexGridLayout::capacity(width, height, radius),
            thumbnail: ThumbnailSize::square(50),
            width,
            height,
            hex_radius: Some(radius),
            ..Self::hexagonal()
        }
    }

    /// The preset for `layout`.
    pub fn for_layout(layout: LayoutKind) -> Self {
        match layout {
            LayoutKind::Linear => Self::linear(),
            LayoutKind::HexRing => Self::hexagonal(),
            LayoutKind::HexGrid => Self::hex_grid(),
        }
    }

    /// Number of samples (and layout slots).
    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    /// How timestamps are spread over the source.
    pub fn with_schedule_mode(mut self, mode: ScheduleMode) -> Self {
        self.schedule_mode = mode;
        self
    }

    /// Size frames are scaled to before reduction.
    pub fn with_thumbnail(mut self, thumbnail: ThumbnailSize) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    /// Samples fetched per batch. Clamped to a minimum of 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Output raster dimensions.
    pub fn with_raster_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Hexagon circumradius. `None` derives it from the raster size.
    pub fn with_hex_radius(mut self, radius: Option<f64>) -> Self {
        self.hex_radius = radius;
        self
    }

    /// Colour the raster is cleared to.
    pub fn with_background(mut self, background: ColorSample) -> Self {
        self.background = background;
        self
    }

    /// Selected layout.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Requested sample count.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Selected schedule mode.
    pub fn schedule_mode(&self) -> ScheduleMode {
        self.schedule_mode
    }

    /// Thumbnail size.
    pub fn thumbnail(&self) -> ThumbnailSize {
        self.thumbnail
    }

    /// Samples per batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Raster `(width, height)`.
    pub fn raster_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Background colour.
    pub fn background(&self) -> ColorSample {
        self.background
    }

    /// Reject options no run could honour.
    ///
    /// # Errors
    ///
    /// Returns [`MinyError::InvalidOptions`] describing the first problem.
    pub fn validate(&self) -> Result<(), MinyError> {
        if self.frame_count == 0 {
            return Err(MinyError::InvalidOptions(
                "frame count must be greater than zero".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(MinyError::InvalidOptions(format!(
                "raster must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.thumbnail.width == 0 || self.thumbnail.height == 0 {
            return Err(MinyError::InvalidOptions(format!(
                "thumbnail must be non-empty, got {}x{}",
                self.thumbnail.width, self.thumbnail.height
            )));
        }
        if let Some(radius) = self.hex_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(MinyError::InvalidOptions(format!(
                    "hexagon radius must be positive, got {radius}"
                )));
            }
        }
        Ok(())
    }

    /// Build the layout for `frame_count` slots.
    pub(crate) fn build_layout(&self, frame_count: usize) -> Box<dyn Layout + Send + Sync> {
        match self.layout {
            LayoutKind::Linear => Box::new(LinearLayout::new(frame_count, self.width, self.height)),
            LayoutKind::HexRing => Box::new(HexRingLayout::new(
                frame_count,
                self.width,
                self.height,
                self.hex_radius,
            )),
            LayoutKind::HexGrid => Box::new(HexGridLayout::new(
                frame_count,
                self.width,
                self.height,
                self.hex_radius.unwrap_or(HexGridLayout::DEFAULT_RADIUS),
            )),
        }
    }
}
