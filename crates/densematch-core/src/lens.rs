//! Lens models consumed by the matching engine.
//!
//! The engine only needs the [`LensModel`] capability: move between pixel
//! and normalized coordinates, apply/remove distortion, and the two derived
//! operations `project_point` / `backproject_pixel`. A standard pinhole
//! camera with Brown-Conrady distortion is provided; anything else (fisheye,
//! tilted sensors, lookup tables) can plug in through the trait.

use serde::{Deserialize, Serialize};

use crate::math::{Real, Vec2, Vec3};

/// Camera lens capability: pixel normalization and distortion.
///
/// `normalize`/`denormalize` move between pixel and normalized (z = 1 plane)
/// coordinates; `distort`/`undistort` act in normalized space.
pub trait LensModel {
    /// Pixel coordinates to normalized coordinates (inverse intrinsics).
    fn normalize(&self, pixel: &Vec2) -> Vec2;
    /// Normalized coordinates to pixel coordinates (intrinsics).
    fn denormalize(&self, normalized: &Vec2) -> Vec2;
    /// Apply lens distortion in normalized space.
    fn distort(&self, normalized: &Vec2) -> Vec2;
    /// Remove lens distortion in normalized space.
    fn undistort(&self, normalized: &Vec2) -> Vec2;

    /// Forward-project a camera-frame point to pixel coordinates.
    ///
    /// Returns `None` for points at or behind the camera plane (z <= 0).
    fn project_point(&self, p_c: &Vec3) -> Option<Vec2> {
        if p_c.z <= 0.0 {
            return None;
        }
        let n = Vec2::new(p_c.x / p_c.z, p_c.y / p_c.z);
        Some(self.denormalize(&self.distort(&n)))
    }

    /// Back-project a pixel to a z = 1 ray direction in the camera frame.
    ///
    /// Points along the line of sight are `dir * depth`, so the z component
    /// of the scaled point equals the depth.
    fn backproject_pixel(&self, pixel: &Vec2) -> Vec3 {
        let n = self.undistort(&self.normalize(pixel));
        Vec3::new(n.x, n.y, 1.0)
    }
}

/// Brown-Conrady radial-tangential distortion (k1, k2, k3, p1, p2).
///
/// `undistort` is the usual fixed-point iteration; `iters == 0` falls back
/// to 8 iterations. All-zero coefficients make both directions identity.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BrownConrady {
    pub k1: Real,
    pub k2: Real,
    pub k3: Real,
    pub p1: Real,
    pub p2: Real,
    pub iters: u32,
}

impl BrownConrady {
    fn distort_impl(&self, x: Real, y: Real) -> (Real, Real) {
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;

        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;

        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;

        (x * radial + x_tan, y * radial + y_tan)
    }

    fn undistort_impl(&self, n_dist: &Vec2) -> Vec2 {
        let mut x = n_dist.x;
        let mut y = n_dist.y;

        let iters = if self.iters == 0 { 8 } else { self.iters };
        for _ in 0..iters {
            let (xd, yd) = self.distort_impl(x, y);
            x -= xd - n_dist.x;
            y -= yd - n_dist.y;
        }
        Vec2::new(x, y)
    }
}

/// Pinhole lens: fx/fy/cx/cy/skew intrinsics plus Brown-Conrady distortion.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PinholeLens {
    /// Focal length in pixels along X.
    pub fx: Real,
    /// Focal length in pixels along Y.
    pub fy: Real,
    /// Principal point X coordinate in pixels.
    pub cx: Real,
    /// Principal point Y coordinate in pixels.
    pub cy: Real,
    /// Skew term (typically 0).
    pub skew: Real,
    /// Distortion coefficients (all-zero = none).
    pub distortion: BrownConrady,
}

impl PinholeLens {
    /// Distortion-free pinhole lens.
    pub fn new(fx: Real, fy: Real, cx: Real, cy: Real) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            skew: 0.0,
            distortion: BrownConrady::default(),
        }
    }

    pub fn with_distortion(mut self, distortion: BrownConrady) -> Self {
        self.distortion = distortion;
        self
    }
}

impl LensModel for PinholeLens {
    fn normalize(&self, pixel: &Vec2) -> Vec2 {
        let ny = (pixel.y - self.cy) / self.fy;
        let nx = (pixel.x - self.cx - self.skew * ny) / self.fx;
        Vec2::new(nx, ny)
    }

    fn denormalize(&self, normalized: &Vec2) -> Vec2 {
        let u = self.fx * normalized.x + self.skew * normalized.y + self.cx;
        let v = self.fy * normalized.y + self.cy;
        Vec2::new(u, v)
    }

    fn distort(&self, normalized: &Vec2) -> Vec2 {
        let (xd, yd) = self.distortion.distort_impl(normalized.x, normalized.y);
        Vec2::new(xd, yd)
    }

    fn undistort(&self, normalized: &Vec2) -> Vec2 {
        self.distortion.undistort_impl(normalized)
    }
}
