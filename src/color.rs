//! Colour reduction.
//!
//! A frame collapses to one [`ColorSample`]: the per-channel arithmetic mean
//! of its pixels, rounded half up, alpha ignored. No colour-space conversion
//! or clustering is involved.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use image::RgbaImage;

/// One reduced colour, associated with one schedule index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSample {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl ColorSample {
    /// Build a sample from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array.
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Formats as `rgb(r, g, b)`.
impl Display for ColorSample {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Parses `rgb(r, g, b)` (whitespace-insensitive) and `#rrggbb`.
impl FromStr for ColorSample {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 {
                return Err(format!("expected #rrggbb, got {trimmed}"));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|error| error.to_string())
            };
            return Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let inner = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("expected rgb(r, g, b), got {trimmed}"))?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|error| error.to_string()))
            .collect::<Result<_, _>>()?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(format!("expected three channels, got {}", channels.len())),
        }
    }
}

/// Average colour of an RGBA image.
///
/// Callers guarantee a non-empty image; an empty one yields black.
pub fn average_color(image: &RgbaImage) -> ColorSample {
    average_rgba(image.as_raw())
}

/// Average colour of a packed RGBA byte buffer (4 bytes per pixel).
///
/// Trailing bytes that do not form a whole pixel are ignored.
///
/// # Example
///
/// ```
/// use miny::{ColorSample, average_rgba};
///
/// let pixels = [255, 0, 0, 255, 0, 0, 0, 255];
/// assert_eq!(average_rgba(&pixels), ColorSample::new(128, 0, 0));
/// ```
pub fn average_rgba(pixels: &[u8]) -> ColorSample {
    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for pixel in pixels.chunks_exact(4) {
        sums[0] += pixel[0] as u64;
        sums[1] += pixel[1] as u64;
        sums[2] += pixel[2] as u64;
        count += 1;
    }

    if count == 0 {
        return ColorSample::default();
    }

    let [r, g, b] = sums.map(|sum| rounded_mean(sum, count));
    ColorSample::new(r, g, b)
}

/// `sum / count` rounded half up, in integer arithmetic.
fn rounded_mean(sum: u64, count: u64) -> u8 {
    ((2 * sum + count) / (2 * count)) as u8
}
