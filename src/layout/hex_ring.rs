use std::f64::consts::TAU;

use crate::color::ColorSample;
use crate::layout::{Layout, Point, hexagon_vertices};
use crate::raster::Raster;

/// Distance between consecutive rings, as a multiple of the hexagon radius.
pub const RING_SPACING: f64 = 1.8;

/// Flat-top orientation: corners start 30° off the x axis.
const HEXAGON_ROTATION: f64 = TAU / 12.0;

/// Endless sequence of ring-walk positions.
///
/// Ring 0 is the centre. Ring `k ≥ 1` holds `6k` slots at distance
/// `k · radius · RING_SPACING`, each `2π / 6k` apart. The angle cursor is
/// never reset between rings, so each ring starts where the previous one's
/// walk left off.
///
/// Any prefix of the walk is the position list for that many samples, so
/// growing the sample count never moves an existing slot.
#[derive(Debug, Clone)]
pub struct RingWalk {
    center: Point,
    radius: f64,
    ring: usize,
    slot_in_ring: usize,
    angle: f64,
}

impl RingWalk {
    /// Start a walk around `center` for hexagons of circumradius `radius`.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            ring: 0,
            slot_in_ring: 0,
            angle: 0.0,
        }
    }
}

impl Iterator for RingWalk {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.ring == 0 {
            self.ring = 1;
            return Some(self.center);
        }

        let ring_slots = self.ring * 6;
        let distance = self.ring as f64 * self.radius * RING_SPACING;
        let point = Point::new(
            self.center.x + distance * self.angle.cos(),
            self.center.y + distance * self.angle.sin(),
        );

        self.angle += TAU / ring_slots as f64;
        self.slot_in_ring += 1;
        if self.slot_in_ring == ring_slots {
            self.ring += 1;
            self.slot_in_ring = 0;
        }

        Some(point)
    }
}

/// Hexagons walked outward in rings from the raster centre.
#[derive(Debug, Clone, PartialEq)]
pub struct HexRingLayout {
    positions: Vec<Point>,
    radius: f64,
}

impl HexRingLayout {
    /// Precompute `frame_count` ring-walk slots for a `width × height`
    /// raster.
    ///
    /// `radius` defaults to `min(width, height) / 24`.
    pub fn new(frame_count: usize, width: u32, height: u32, radius: Option<f64>) -> Self {
        let radius = radius.unwrap_or_else(|| Self::default_radius(width, height));
        let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);
        let positions = RingWalk::new(center, radius).take(frame_count).collect();

        log::debug!("Ring-walk layout: {frame_count} slots, radius {radius:.2}");

        Self { positions, radius }
    }

    /// `min(width, height) / 24`.
    pub fn default_radius(width: u32, height: u32) -> f64 {
        width.min(height) as f64 / 24.0
    }

    /// Hexagon circumradius in pixels.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Slot centres in schedule order.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Ring that slot `index` belongs to.
    pub fn ring_of(index: usize) -> usize {
        // Rings 0..=k hold 1 + 3k(k+1) slots.
        let mut ring = 0;
        while 1 + 3 * ring * (ring + 1) <= index {
            ring += 1;
        }
        ring
    }
}

impl Layout for HexRingLayout {
    fn slot_count(&self) -> usize {
        self.positions.len()
    }

    fn paint(&self, raster: &mut Raster, index: usize, color: ColorSample) {
        if let Some(&center) = self.positions.get(index) {
            raster.fill_polygon(
                &hexagon_vertices(center, self.radius, HEXAGON_ROTATION),
                color,
            );
        }
    }
}
