//! NaN-aware post-filtering of correspondence and point maps.
//!
//! Unlike cost aggregation, the filters here do not propagate NaN: each
//! output is the weighted mean of the valid neighbors only, renormalized by
//! the weight that actually contributed. Invalidity appears in the output
//! only where no neighbor carries evidence at all.

use densematch_core::{CorrespondenceMap, PointMap, Real};
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};

/// Square 2-D smoothing kernel with explicit weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Uniform (box) kernel.
    pub fn mean(size: usize) -> MatchResult<Self> {
        Self::check_size(size)?;
        Ok(Self {
            size,
            weights: vec![1.0; size * size],
        })
    }

    /// Gaussian kernel; weights are normalized to sum to 1.
    pub fn gaussian(size: usize, sigma: Real) -> MatchResult<Self> {
        Self::check_size(size)?;
        if sigma <= 0.0 {
            return Err(MatchError::InvalidConfiguration(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        let half = (size / 2) as i64;
        let mut weights = Vec::with_capacity(size * size);
        for dy in -half..=half {
            for dx in -half..=half {
                let r2 = (dx * dx + dy * dy) as Real;
                weights.push((-r2 / (2.0 * sigma * sigma)).exp() as f32);
            }
        }
        let total: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Ok(Self { size, weights })
    }

    fn check_size(size: usize) -> MatchResult<()> {
        if size < 1 || size % 2 == 0 {
            return Err(MatchError::InvalidConfiguration(format!(
                "kernel size must be a positive odd integer, got {size}"
            )));
        }
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Smooth a map, averaging valid neighbors only.
///
/// Each output value is `sum(w_i v_i) / sum(w_i)` over the finite entries
/// under the kernel; a pixel with zero valid contributors is invalid.
pub fn smooth_nan_aware(map: &CorrespondenceMap, kernel: &Kernel) -> CorrespondenceMap {
    let (rows, cols) = map.shape();
    let half = (kernel.size / 2) as i64;

    let mut out = CorrespondenceMap::invalid(cols, rows);
    for r in 0..rows {
        for c in 0..cols {
            let mut acc = 0.0f32;
            let mut weight = 0.0f32;
            for dy in -half..=half {
                let rr = r as i64 + dy;
                if rr < 0 || rr >= rows as i64 {
                    continue;
                }
                for dx in -half..=half {
                    let cc = c as i64 + dx;
                    if cc < 0 || cc >= cols as i64 {
                        continue;
                    }
                    let v = map.get(rr as usize, cc as usize);
                    if !v.is_finite() {
                        continue;
                    }
                    let w = kernel.weights
                        [((dy + half) * kernel.size as i64 + (dx + half)) as usize];
                    acc += w * v;
                    weight += w;
                }
            }
            if weight > 0.0 {
                out.set(r, c, acc / weight);
            }
        }
    }
    out
}

/// Post-filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostFilterConfig {
    /// Kernel for the smoothing pass the outlier test compares against.
    pub smooth_kernel: Kernel,
    /// Absolute depth deviation beyond which a pixel is rejected.
    pub outlier_threshold: f32,
    /// Optional second smoothing pass producing the final depth.
    pub final_kernel: Option<Kernel>,
}

impl Default for PostFilterConfig {
    fn default() -> Self {
        Self {
            smooth_kernel: Kernel::mean(5).expect("odd size"),
            outlier_threshold: 0.5,
            final_kernel: None,
        }
    }
}

/// Smooth, reject outliers, and optionally re-smooth a point map's depth.
///
/// Outlier rejection invalidates any pixel whose raw depth deviates from
/// the smoothed depth by more than the threshold. When a final kernel is
/// configured, the re-smoothed depth rescales each 3-D point by
/// `new_depth / old_depth`, so the point stays on its original camera ray;
/// only the distance along the ray changes.
pub fn post_filter(points: &PointMap, config: &PostFilterConfig) -> PointMap {
    let (rows, cols) = points.shape();
    let mut out = points.clone();

    let depth = points.depth_map();
    let smoothed = smooth_nan_aware(&depth, &config.smooth_kernel);

    let mut accepted = CorrespondenceMap::invalid(cols, rows);
    for r in 0..rows {
        for c in 0..cols {
            let d = depth.get(r, c);
            if !d.is_finite() {
                continue;
            }
            let s = smoothed.get(r, c);
            if !s.is_finite() || (d - s).abs() > config.outlier_threshold {
                out.invalidate(r, c);
            } else {
                accepted.set(r, c, d);
            }
        }
    }

    let Some(final_kernel) = &config.final_kernel else {
        return out;
    };

    let final_depth = smooth_nan_aware(&accepted, final_kernel);
    for r in 0..rows {
        for c in 0..cols {
            if !out.is_valid(r, c) {
                continue;
            }
            let old = accepted.get(r, c) as Real;
            let new = final_depth.get(r, c) as Real;
            if !new.is_finite() || old == 0.0 {
                out.invalidate(r, c);
                continue;
            }
            let scaled = out.get(r, c) * (new / old);
            out.set(r, c, scaled);
        }
    }
    out
}
