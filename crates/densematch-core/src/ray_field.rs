//! Per-pixel back-projected ray directions for a reference camera.

use crate::lens::LensModel;
use crate::math::{Real, Vec2, Vec3};

/// A 2-D grid of z = 1 ray directions, one per reference pixel.
///
/// Each direction is `undistort(normalize(pixel))` with a unit depth
/// component appended, so `dir * depth` is the camera-frame point at that
/// depth along the pixel's line of sight. Computed once per reference lens
/// and reused across all hypotheses.
#[derive(Debug, Clone)]
pub struct RayField {
    width: usize,
    height: usize,
    dirs: Vec<Vec3>,
}

impl RayField {
    /// Back-project every pixel center of a `width x height` grid.
    pub fn from_lens<L: LensModel>(lens: &L, width: usize, height: usize) -> Self {
        let mut dirs = Vec::with_capacity(width * height);
        for r in 0..height {
            for c in 0..width {
                let px = Vec2::new(c as Real, r as Real);
                dirs.push(lens.backproject_pixel(&px));
            }
        }
        Self {
            width,
            height,
            dirs,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Ray direction at `(row, col)`.
    #[inline]
    pub fn dir(&self, row: usize, col: usize) -> &Vec3 {
        &self.dirs[row * self.width + col]
    }

    /// Camera-frame point at `depth` along the pixel's ray.
    #[inline]
    pub fn point_at(&self, row: usize, col: usize, depth: Real) -> Vec3 {
        self.dir(row, col) * depth
    }
}
