use crate::color::ColorSample;
use crate::layout::Layout;
use crate::raster::Raster;

/// Equal-width vertical bars spanning the full raster height.
///
/// Slot `i` covers `x ∈ [i·W/n, (i+1)·W/n)`.
///
/// # Example
///
/// ```
/// use miny::LinearLayout;
///
/// let layout = LinearLayout::new(5, 1000, 200);
/// assert_eq!(layout.bar_bounds(1), (200.0, 400.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLayout {
    frame_count: usize,
    width: u32,
    height: u32,
}

impl LinearLayout {
    /// A layout of `frame_count` bars over a `width × height` raster.
    pub fn new(frame_count: usize, width: u32, height: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            width,
            height,
        }
    }

    /// Width of one bar in pixels (fractional when `W` is not a multiple of
    /// the bar count).
    pub fn bar_width(&self) -> f64 {
        self.width as f64 / self.frame_count as f64
    }

    /// Left (inclusive) and right (exclusive) edge of bar `index`.
    pub fn bar_bounds(&self, index: usize) -> (f64, f64) {
        let bar_width = self.bar_width();
        (index as f64 * bar_width, (index + 1) as f64 * bar_width)
    }

    /// Pixel columns `[left, right)` painted for bar `index`.
    ///
    /// Both edges are rounded to the nearest whole pixel, so neighbouring
    /// bars share an edge and together they cover `[0, W)` without gaps.
    ///
    /// ```
    /// use miny::LinearLayout;
    ///
    /// let layout = LinearLayout::new(300, 1000, 200);
    /// assert_eq!(layout.pixel_bounds(2), (7, 10));
    /// assert_eq!(layout.pixel_bounds(3), (10, 13));
    /// ```
    pub fn pixel_bounds(&self, index: usize) -> (u32, u32) {
        let (left, right) = self.bar_bounds(index);
        let snap = |edge: f64| edge.round().clamp(0.0, self.width as f64) as u32;
        (snap(left), snap(right))
    }

    /// Every bar boundary from `0` to `W`, `n + 1` values in total.
    pub fn boundaries(&self) -> Vec<f64> {
        (0..=self.frame_count)
            .map(|index| index as f64 * self.bar_width())
            .collect()
    }
}

impl Layout for LinearLayout {
    fn slot_count(&self) -> usize {
        self.frame_count
    }

    fn paint(&self, raster: &mut Raster, index: usize, color: ColorSample) {
        if index >= self.frame_count {
            return;
        }
        let (left, right) = self.pixel_bounds(index);
        raster.fill_rect(
            left as f32,
            0.0,
            (right - left) as f32,
            self.height as f32,
            color,
        );
    }
}
