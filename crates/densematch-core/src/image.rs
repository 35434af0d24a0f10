//! Multi-channel floating-point image grid.

use crate::math::Real;

/// A row-major grid of pixels, each pixel a fixed-length vector of `f32`
/// channel intensities (typically normalized to `[0, 1]`).
///
/// Images are built once and treated as immutable afterwards. Out-of-bounds
/// bilinear samples are NaN per channel, which is the engine-wide marker for
/// "no evidence here" rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Image {
    /// Zero-filled image.
    pub fn zeros(width: usize, height: usize, channels: usize) -> Self {
        assert!(channels >= 1, "image needs at least one channel");
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    /// Zero-filled image with the shape and channel count of `other`.
    pub fn zeros_like(other: &Image) -> Self {
        Self::zeros(other.width, other.height, other.channels)
    }

    /// Build an image from a per-pixel-channel function `(row, col, ch)`.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let mut img = Self::zeros(width, height, channels);
        for r in 0..height {
            for c in 0..width {
                for ch in 0..channels {
                    let v = f(r, c, ch);
                    img.data[(r * width + c) * channels + ch] = v;
                }
            }
        }
        img
    }

    /// Single-channel image from a per-pixel function `(row, col)`.
    pub fn gray_from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        Self::from_fn(width, height, 1, |r, c, _| f(r, c))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(height, width)` for quick shape comparisons.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn same_shape(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Channel slice of the pixel at `(row, col)`.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[f32] {
        let base = (row * self.width + col) * self.channels;
        &self.data[base..base + self.channels]
    }

    #[inline]
    pub(crate) fn pixel_mut(&mut self, row: usize, col: usize) -> &mut [f32] {
        let base = (row * self.width + col) * self.channels;
        &mut self.data[base..base + self.channels]
    }

    /// Flat channel-interleaved pixel data, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Bilinearly sample all channels at fractional `(x, y)` = `(col, row)`.
    ///
    /// Writes NaN into `out` when the sample point lies outside the image
    /// (a normal, expected outcome) or when `x`/`y` are not finite.
    pub fn bilinear(&self, x: Real, y: Real, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.channels);
        if self.width == 0 || self.height == 0 {
            out.fill(f32::NAN);
            return;
        }
        let max_x = (self.width - 1) as Real;
        let max_y = (self.height - 1) as Real;
        if !(x >= 0.0 && x <= max_x && y >= 0.0 && y <= max_y) {
            out.fill(f32::NAN);
            return;
        }

        let x0 = x.floor();
        let y0 = y.floor();
        let c0 = x0 as usize;
        let r0 = y0 as usize;
        let c1 = (c0 + 1).min(self.width - 1);
        let r1 = (r0 + 1).min(self.height - 1);
        let fx = (x - x0) as f32;
        let fy = (y - y0) as f32;

        let p00 = self.pixel(r0, c0);
        let p01 = self.pixel(r0, c1);
        let p10 = self.pixel(r1, c0);
        let p11 = self.pixel(r1, c1);

        for ch in 0..self.channels {
            let top = p00[ch] * (1.0 - fx) + p01[ch] * fx;
            let bot = p10[ch] * (1.0 - fx) + p11[ch] * fx;
            out[ch] = top * (1.0 - fy) + bot * fy;
        }
    }

    /// Write `values` into the pixel at `(row, col)`.
    pub fn set_pixel(&mut self, row: usize, col: usize, values: &[f32]) {
        self.pixel_mut(row, col).copy_from_slice(values);
    }
}
