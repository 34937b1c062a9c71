use crate::color::ColorSample;
use crate::layout::{Layout, Point, hexagon_vertices};
use crate::raster::Raster;

/// Hexagons on an offset brick grid, filled row by row.
///
/// Columns sit `1.5r` apart; odd columns drop by half a hexagon height.
/// Hexagons are drawn with a corner on the x axis (no rotation). Slots past
/// the grid's capacity continue on further rows and are clipped by the
/// raster.
#[derive(Debug, Clone, PartialEq)]
pub struct HexGridLayout {
    positions: Vec<Point>,
    radius: f64,
    columns: usize,
}

impl HexGridLayout {
    /// Radius of the preview grid.
    pub const DEFAULT_RADIUS: f64 = 20.0;

    /// Precompute `frame_count` grid slots for a `width × height` raster.
    pub fn new(frame_count: usize, width: u32, height: u32, radius: f64) -> Self {
        let (columns, _) = Self::dimensions(width, height, radius);
        let columns = columns.max(1);
        let hex_height = Self::hex_height(radius);

        let positions = (0..frame_count)
            .map(|slot| {
                let row = slot / columns;
                let column = slot % columns;
                Point::new(
                    column as f64 * radius * 1.5,
                    row as f64 * hex_height + (column % 2) as f64 * hex_height / 2.0,
                )
            })
            .collect();

        log::debug!("Offset-grid layout: {frame_count} slots in {columns} columns");

        Self {
            positions,
            radius,
            columns,
        }
    }

    /// Height of one hexagon, `r·√3`.
    pub fn hex_height(radius: f64) -> f64 {
        radius * 3f64.sqrt()
    }

    /// `(columns, rows)` that fit on the raster.
    ///
    /// Rows are always an even number.
    pub fn dimensions(width: u32, height: u32, radius: f64) -> (usize, usize) {
        if !(radius > 0.0) {
            return (0, 0);
        }
        let columns = (width as f64 / (radius * 1.5)).floor() as usize;
        let rows = (height as f64 / (Self::hex_height(radius) * 2.0)).floor() as usize * 2;
        (columns, rows)
    }

    /// Number of slots that fit on the raster.
    pub fn capacity(width: u32, height: u32, radius: f64) -> usize {
        let (columns, rows) = Self::dimensions(width, height, radius);
        columns * rows
    }

    /// Number of columns per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Slot centres in schedule order.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }
}

impl Layout for HexGridLayout {
    fn slot_count(&self) -> usize {
        self.positions.len()
    }

    fn paint(&self, raster: &mut Raster, index: usize, color: ColorSample) {
        if let Some(&center) = self.positions.get(index) {
            raster.fill_polygon(&hexagon_vertices(center, self.radius, 0.0), color);
        }
    }
}
