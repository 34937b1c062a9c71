//! Layout engine.
//!
//! A layout assigns every schedule index a fixed place on the raster before
//! any colour is known, then paints one region per completed sample. Three
//! geometries are available:
//!
//! - [`LinearLayout`]: equal-width vertical bars, left to right.
//! - [`HexRingLayout`]: hexagons walked outward in rings from the centre.
//!   This is the canonical mosaic.
//! - [`HexGridLayout`]: hexagons on an offset brick grid, row-major. A
//!   secondary preview mode.

mod hex_grid;
mod hex_ring;
mod linear;

use std::f64::consts::PI;

pub use hex_grid::HexGridLayout;
pub use hex_ring::{HexRingLayout, RING_SPACING, RingWalk};
pub use linear::LinearLayout;

use crate::color::ColorSample;
use crate::raster::Raster;

/// A point on the raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal position, growing rightwards.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
}

impl Point {
    /// Build a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which geometry a run paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutKind {
    /// Equal-width vertical bars.
    Linear,
    /// Ring-walk hexagon mosaic.
    #[default]
    HexRing,
    /// Offset-grid hexagon mosaic.
    HexGrid,
}

impl LayoutKind {
    /// Parse a layout name as used on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "linear" | "bars" | "strip" => Some(LayoutKind::Linear),
            "hex" | "hexagonal" | "ring" | "miny" => Some(LayoutKind::HexRing),
            "grid" | "hex-grid" => Some(LayoutKind::HexGrid),
            _ => None,
        }
    }
}

/// A placement strategy for an ordered colour sequence.
///
/// Positions depend only on the slot count and raster size; `paint` must
/// fill exactly one region for `index`.
pub trait Layout {
    /// Number of slots the layout was built for.
    fn slot_count(&self) -> usize;

    /// Paint `color` into the region reserved for schedule index `index`.
    ///
    /// Indices beyond [`slot_count`](Layout::slot_count) are ignored.
    fn paint(&self, raster: &mut Raster, index: usize, color: ColorSample);
}

/// The six corners of a regular hexagon, the first at `rotation` radians.
pub fn hexagon_vertices(center: Point, radius: f64, rotation: f64) -> [(f32, f32); 6] {
    let step = 2.0 * PI / 6.0;
    std::array::from_fn(|corner| {
        let angle = corner as f64 * step + rotation;
        (
            (center.x + radius * angle.cos()) as f32,
            (center.y + radius * angle.sin()) as f32,
        )
    })
}
