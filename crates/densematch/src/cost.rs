//! Photometric dissimilarity and spatial window aggregation.

use std::str::FromStr;

use densematch_core::Image;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};

/// Selectable per-pixel dissimilarity over channels.
///
/// The variant is dispatched once per cost slice, not per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostFunction {
    /// Sum of absolute channel differences.
    SumOfAbsoluteDifference,
    /// Sum of squared channel differences.
    SumOfSquaredDifference,
}

impl FromStr for CostFunction {
    type Err = MatchError;

    fn from_str(s: &str) -> MatchResult<Self> {
        match s {
            "sad" | "sum_of_absolute_difference" => Ok(Self::SumOfAbsoluteDifference),
            "ssd" | "sum_of_squared_difference" => Ok(Self::SumOfSquaredDifference),
            other => Err(MatchError::InvalidCostFunction(other.to_string())),
        }
    }
}

/// Per-pixel dissimilarity between a reference image and a resampled
/// secondary image. NaN samples propagate per pixel.
pub(crate) fn dissimilarity(reference: &Image, resampled: &Image, cost: CostFunction) -> Vec<f32> {
    match cost {
        CostFunction::SumOfAbsoluteDifference => per_pixel(reference, resampled, |d| d.abs()),
        CostFunction::SumOfSquaredDifference => per_pixel(reference, resampled, |d| d * d),
    }
}

fn per_pixel<F: Fn(f32) -> f32>(reference: &Image, resampled: &Image, penalty: F) -> Vec<f32> {
    debug_assert!(reference.same_shape(resampled));
    debug_assert_eq!(reference.channels(), resampled.channels());
    reference
        .data()
        .chunks_exact(reference.channels())
        .zip(resampled.data().chunks_exact(resampled.channels()))
        .map(|(a, b)| {
            a.iter()
                .zip(b.iter())
                .map(|(x, y)| penalty(x - y))
                .sum::<f32>()
        })
        .collect()
}

pub(crate) fn check_window(window: usize) -> MatchResult<()> {
    if window < 1 || window % 2 == 0 {
        return Err(MatchError::InvalidConfiguration(format!(
            "window size must be a positive odd integer, got {window}"
        )));
    }
    Ok(())
}

/// Aggregate a per-pixel cost field over a `window x window` neighborhood
/// via two sequential 1-D averaging passes (rows, then columns).
///
/// Windows truncate at the image borders (mean over in-bounds taps). A NaN
/// anywhere in the window invalidates the aggregate there: insufficient
/// evidence must stay visible, so this filter intentionally propagates NaN
/// (the post-filter variant is the non-propagating one).
pub(crate) fn aggregate_window(costs: &[f32], rows: usize, cols: usize, window: usize) -> Vec<f32> {
    debug_assert_eq!(costs.len(), rows * cols);
    if window == 1 {
        return costs.to_vec();
    }
    let half = window / 2;

    let mut horiz = vec![0.0f32; rows * cols];
    for r in 0..rows {
        let row = &costs[r * cols..(r + 1) * cols];
        for c in 0..cols {
            let lo = c.saturating_sub(half);
            let hi = (c + half).min(cols - 1);
            let sum: f32 = row[lo..=hi].iter().sum();
            horiz[r * cols + c] = sum / (hi - lo + 1) as f32;
        }
    }

    let mut out = vec![0.0f32; rows * cols];
    for c in 0..cols {
        for r in 0..rows {
            let lo = r.saturating_sub(half);
            let hi = (r + half).min(rows - 1);
            let mut sum = 0.0f32;
            for rr in lo..=hi {
                sum += horiz[rr * cols + c];
            }
            out[r * cols + c] = sum / (hi - lo + 1) as f32;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use densematch_core::Image;

    #[test]
    fn parses_cost_function_names() {
        assert_eq!(
            "sad".parse::<CostFunction>().unwrap(),
            CostFunction::SumOfAbsoluteDifference
        );
        assert_eq!(
            "sum_of_squared_difference".parse::<CostFunction>().unwrap(),
            CostFunction::SumOfSquaredDifference
        );
        assert!(matches!(
            "census".parse::<CostFunction>(),
            Err(MatchError::InvalidCostFunction(s)) if s == "census"
        ));
    }

    #[test]
    fn sad_and_ssd_pixel_values() {
        let a = Image::from_fn(1, 1, 2, |_, _, ch| if ch == 0 { 0.5 } else { 0.25 });
        let b = Image::from_fn(1, 1, 2, |_, _, ch| if ch == 0 { 0.2 } else { 0.45 });

        let sad = dissimilarity(&a, &b, CostFunction::SumOfAbsoluteDifference);
        assert!((sad[0] - 0.5).abs() < 1e-6);

        let ssd = dissimilarity(&a, &b, CostFunction::SumOfSquaredDifference);
        assert!((ssd[0] - (0.09 + 0.04)).abs() < 1e-6);
    }

    #[test]
    fn nan_sample_invalidates_the_pixel_cost() {
        let a = Image::gray_from_fn(2, 1, |_, _| 1.0);
        let b = Image::gray_from_fn(2, 1, |_, c| if c == 0 { f32::NAN } else { 1.0 });
        let d = dissimilarity(&a, &b, CostFunction::SumOfAbsoluteDifference);
        assert!(d[0].is_nan());
        assert_eq!(d[1], 0.0);
    }

    #[test]
    fn window_one_is_identity() {
        let costs = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(aggregate_window(&costs, 2, 2, 1), costs);
    }

    #[test]
    fn window_mean_on_constant_field_is_constant() {
        let costs = vec![0.75f32; 7 * 5];
        let agg = aggregate_window(&costs, 5, 7, 3);
        for v in agg {
            assert!((v - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn interior_window_is_exact_box_mean() {
        // 5x5 field, 3x3 window at the center = mean of the 9 neighbors.
        let costs: Vec<f32> = (0..25).map(|i| i as f32).collect();
        let agg = aggregate_window(&costs, 5, 5, 3);
        let expected = (6 + 7 + 8 + 11 + 12 + 13 + 16 + 17 + 18) as f32 / 9.0;
        assert!((agg[2 * 5 + 2] - expected).abs() < 1e-5);
    }

    #[test]
    fn nan_contaminates_the_whole_window() {
        let mut costs = vec![1.0f32; 5 * 5];
        costs[2 * 5 + 2] = f32::NAN;
        let agg = aggregate_window(&costs, 5, 5, 3);
        for r in 0..5 {
            for c in 0..5 {
                let touches = (1..=3).contains(&r) && (1..=3).contains(&c);
                assert_eq!(agg[r * 5 + c].is_nan(), touches, "({r},{c})");
            }
        }
    }

    #[test]
    fn even_or_zero_windows_are_rejected() {
        assert!(check_window(0).is_err());
        assert!(check_window(4).is_err());
        assert!(check_window(1).is_ok());
        assert!(check_window(9).is_ok());
    }
}
