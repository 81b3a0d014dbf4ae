//! Borrowed, dimension-checked view over a row-major pixel buffer.

use crate::color::Color;
use crate::error::ColorError;

/// A `width * height` grid of colors in row-major order.
///
/// The sample borrows its pixels; decoding an image into `Color`s is the
/// caller's concern.
#[derive(Debug, Clone, Copy)]
pub struct PixelSample<'a> {
    width: usize,
    height: usize,
    pixels: &'a [Color],
}

impl<'a> PixelSample<'a> {
    /// Wraps `pixels` as a `width` by `height` grid.
    ///
    /// Returns `ColorError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`, and
    /// `ColorError::DimensionMismatch` if `pixels` holds a different count.
    pub fn new(width: usize, height: usize, pixels: &'a [Color]) -> Result<Self, ColorError> {
        if width == 0 || height == 0 {
            return Err(ColorError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .ok_or(ColorError::InvalidDimensions)?;
        if pixels.len() != expected {
            return Err(ColorError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Treats a flat list of colors as a single row.
    pub fn from_row(pixels: &'a [Color]) -> Result<Self, ColorError> {
        Self::new(pixels.len(), 1, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &'a [Color] {
        self.pixels
    }

    /// Pixel at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Iterates the rows top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'a, Color> {
        self.pixels.chunks(self.width)
    }
}
