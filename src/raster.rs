//! The output drawing surface.
//!
//! [`Raster`] wraps a [`tiny_skia::Pixmap`]. The pipeline only ever fills
//! shapes into it; reading pixels back and exporting to an image format is
//! left to the caller via [`Raster::to_image`] and [`Raster::save`].

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;

use image::RgbaImage;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::color::ColorSample;
use crate::error::MinyError;

/// Background the raster is cleared to before painting (`#1a1a1a`).
pub const DEFAULT_BACKGROUND: ColorSample = ColorSample::new(0x1a, 0x1a, 0x1a);

/// An opaque RGBA drawing surface.
#[derive(Clone)]
pub struct Raster {
    pixmap: Pixmap,
}

impl Debug for Raster {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Raster")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl Raster {
    /// Allocate a surface filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns [`MinyError::UnsupportedEnvironment`] if a surface of this
    /// size cannot be allocated (zero or oversized dimensions).
    pub fn new(width: u32, height: u32, background: ColorSample) -> Result<Self, MinyError> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            MinyError::UnsupportedEnvironment(format!("{width}x{height} drawing surface"))
        })?;
        pixmap.fill(tiny_skia::Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            255,
        ));
        Ok(Self { pixmap })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the axis-aligned rectangle at `(x, y)` of size `width × height`.
    ///
    /// Edges are not anti-aliased so adjacent bars never bleed into one
    /// another. Degenerate rectangles are ignored.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: ColorSample) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = solid_paint(color, false);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Fill the closed polygon through `vertices`.
    ///
    /// Fewer than three vertices draw nothing.
    pub fn fill_polygon(&mut self, vertices: &[(f32, f32)], color: ColorSample) {
        let [(first_x, first_y), rest @ ..] = vertices else {
            return;
        };
        if rest.len() < 2 {
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(*first_x, *first_y);
        for &(x, y) in rest {
            builder.line_to(x, y);
        }
        builder.close();

        if let Some(path) = builder.finish() {
            let paint = solid_paint(color, true);
            self.pixmap.fill_path(
                &path,
                &paint,
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Colour of the pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<ColorSample> {
        self.pixmap
            .pixel(x, y)
            .map(|pixel| ColorSample::new(pixel.red(), pixel.green(), pixel.blue()))
    }

    /// Copy the surface into an [`image::RgbaImage`].
    ///
    /// The surface is always opaque, so premultiplied and straight alpha
    /// coincide.
    pub fn to_image(&self) -> Result<RgbaImage, MinyError> {
        RgbaImage::from_raw(self.width(), self.height(), self.pixmap.data().to_vec())
            .ok_or_else(|| MinyError::Decode("raster buffer has the wrong size".to_string()))
    }

    /// Save the surface; the format is inferred from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`MinyError::Image`] if the file cannot be encoded or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MinyError> {
        let path = path.as_ref();
        log::debug!("Saving {}x{} raster to {}", self.width(), self.height(), path.display());
        self.to_image()?.save(path)?;
        Ok(())
    }
}

fn solid_paint(color: ColorSample, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = anti_alias;
    paint
}
