//! Deterministic synthetic scenes for tests and examples.
//!
//! This module builds small, reusable inputs for exercising the matching
//! engine:
//! - a smooth procedural texture with no repeating structure inside typical
//!   search ranges,
//! - horizontally shifted image pairs for disparity search,
//! - a fronto-parallel textured plane rendered into translated cameras for
//!   plane-sweep search,
//! - deterministic pixel noise that avoids RNG-crate version drift.
//!
//! Everything here is deterministic (explicit seeds, analytic textures) so
//! synthetic expectations stay stable across platforms. The module is public
//! for use by workspace test suites, not intended for production use.

use crate::image::Image;
use crate::lens::LensModel;
use crate::math::{Real, Vec2, Vec3};

/// Smooth scalar texture in `[0, 1]`, defined for all of the plane.
///
/// Low spatial frequencies keep windowed costs near-quadratic around their
/// minimum, which is what the sub-pixel accuracy expectations assume.
pub fn texture(x: Real, y: Real) -> f32 {
    let v = 0.5
        + 0.22 * (x * std::f64::consts::TAU / 23.0).sin()
        + 0.14 * ((x + y) * std::f64::consts::TAU / 31.0).sin()
        + 0.09 * (y * std::f64::consts::TAU / 17.0).cos();
    v as f32
}

/// Single-channel image of [`texture`] sampled at pixel centers.
pub fn texture_image(width: usize, height: usize) -> Image {
    Image::gray_from_fn(width, height, |r, c| texture(c as Real, r as Real))
}

/// Shift an image so that `out(r, c) = img(r, c + shift)`.
///
/// With `secondary = shift_columns(reference, d)` the true disparity of
/// every pixel is exactly `d`: the reference pixel `c` appears in the
/// secondary image at column `c - d`. Fractional shifts resample
/// bilinearly; columns shifted from outside the source are NaN.
pub fn shift_columns(img: &Image, shift: Real) -> Image {
    let mut out = Image::zeros_like(img);
    let mut sample = vec![0.0f32; img.channels()];
    for r in 0..img.height() {
        for c in 0..img.width() {
            img.bilinear(c as Real + shift, r as Real, &mut sample);
            out.set_pixel(r, c, &sample);
        }
    }
    out
}

/// Render the view of a fronto-parallel textured plane from a translated
/// camera.
///
/// The plane sits at `z = depth` in the reference frame and carries
/// [`texture`] parameterized by reference pixel coordinates, so the
/// reference camera sees exactly [`texture_image`]. The secondary camera
/// shares the lens model and is translated by `t` in the reference frame
/// (identity rotation). Pixels whose plane point falls behind the secondary
/// camera are NaN.
pub fn translated_plane_view<L: LensModel>(
    lens: &L,
    t: &Vec3,
    depth: Real,
    width: usize,
    height: usize,
) -> Image {
    let z_sec = depth - t.z;
    Image::gray_from_fn(width, height, |r, c| {
        if z_sec <= 0.0 {
            return f32::NAN;
        }
        let px = Vec2::new(c as Real, r as Real);
        let p_sec = lens.backproject_pixel(&px) * z_sec;
        let p_ref = p_sec + t;
        match lens.project_point(&p_ref) {
            Some(ref_px) => texture(ref_px.x, ref_px.y),
            None => f32::NAN,
        }
    })
}

/// Deterministic uniform per-pixel noise in `[-max_abs, +max_abs]`.
///
/// Keyed by `(seed, row, col, channel)` through a SplitMix64 mix, so noisy
/// datasets are stable across platforms and crate versions.
pub fn add_uniform_noise(img: &Image, seed: u64, max_abs: f32) -> Image {
    let channels = img.channels();
    Image::from_fn(img.width(), img.height(), channels, |r, c, ch| {
        let key = seed
            ^ (r as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (c as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9)
            ^ (ch as u64).wrapping_mul(0x94D0_49BB_1331_11EB);
        let u = u64_to_unit_f64(splitmix64(key)) as f32;
        img.pixel(r, c)[ch] + (u - 0.5) * 2.0 * max_abs
    })
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn u64_to_unit_f64(x: u64) -> Real {
    // Top 53 bits to a double in [0, 1), platform-independent.
    let mantissa = x >> 11;
    (mantissa as Real) * (1.0 / ((1u64 << 53) as Real))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::PinholeLens;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_shift_reproduces_the_image() {
        let img = texture_image(32, 16);
        let shifted = shift_columns(&img, 0.0);
        assert_eq!(img, shifted);
    }

    #[test]
    fn integer_shift_moves_columns() {
        let img = texture_image(32, 16);
        let shifted = shift_columns(&img, 3.0);
        assert_eq!(shifted.pixel(5, 10)[0], img.pixel(5, 13)[0]);
        // Columns shifted in from outside the source are invalid.
        assert!(shifted.pixel(5, 31)[0].is_nan());
    }

    #[test]
    fn plane_view_with_zero_baseline_matches_reference() {
        let lens = PinholeLens::new(100.0, 100.0, 16.0, 8.0);
        let reference = texture_image(32, 16);
        let view = translated_plane_view(&lens, &Vec3::zeros(), 1.5, 32, 16);
        for r in 0..16 {
            for c in 0..32 {
                let a = reference.pixel(r, c)[0];
                let b = view.pixel(r, c)[0];
                assert_abs_diff_eq!(a, b, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn noise_is_deterministic_and_bounded() {
        let img = texture_image(16, 8);
        let a = add_uniform_noise(&img, 7, 0.02);
        let b = add_uniform_noise(&img, 7, 0.02);
        let c = add_uniform_noise(&img, 8, 0.02);
        assert_eq!(a, b);
        assert_ne!(a, c);
        for r in 0..8 {
            for col in 0..16 {
                let d = (a.pixel(r, col)[0] - img.pixel(r, col)[0]).abs();
                assert!(d <= 0.02 + 1e-6);
            }
        }
    }
}
