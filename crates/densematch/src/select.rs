//! Minimum-cost hypothesis selection and sub-pixel refinement.

use densematch_core::{CorrespondenceMap, Real};

use crate::volume::CostVolume;

/// Selection options.
///
/// `border_cols` columns on each horizontal edge are forced invalid; the
/// disparity entry points set it to the largest absolute disparity to mask
/// shift artifacts, plane-sweep callers pass 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectOptions {
    /// Refine the discrete winner with a parabola fit.
    pub subpixel: bool,
    /// Columns invalidated on each horizontal edge.
    pub border_cols: usize,
}

/// Per pixel, pick the minimum-cost hypothesis and optionally refine it.
///
/// - Ties break to the lowest index (first occurrence).
/// - NaN cost slices carry no evidence at that pixel and are skipped; a
///   pixel with no finite cost at any hypothesis is invalid.
/// - A winner at either axis end is invalid: the true optimum may lie
///   outside the searched range.
pub fn select_minimum(volume: &CostVolume, opts: SelectOptions) -> CorrespondenceMap {
    let rows = volume.rows();
    let cols = volume.cols();
    let n = volume.num_hypotheses();
    let axis = volume.axis();

    let mut map = CorrespondenceMap::invalid(cols, rows);
    let col_end = cols.saturating_sub(opts.border_cols);

    for r in 0..rows {
        for c in opts.border_cols..col_end {
            let mut best_cost = f32::INFINITY;
            let mut best_idx = None;
            for h in 0..n {
                let cost = volume.cost(h, r, c);
                if cost < best_cost {
                    best_cost = cost;
                    best_idx = Some(h);
                }
            }

            let Some(idx) = best_idx else {
                continue;
            };
            // Winner at an axis extremum is ambiguous.
            if idx == 0 || idx + 1 == n {
                continue;
            }

            let value = if opts.subpixel {
                refine_parabola(
                    volume.cost(idx - 1, r, c) as Real,
                    volume.cost(idx, r, c) as Real,
                    volume.cost(idx + 1, r, c) as Real,
                    axis.value(idx),
                    axis.local_step(idx),
                )
            } else {
                axis.value(idx)
            };
            map.set(r, c, value as f32);
        }
    }
    map
}

/// Closed-form parabola refinement through `(-1, f0), (0, f1), (1, f2)`.
///
/// `a = 0.5 (f0 + f2) - f1`, `b = 0.5 (f2 - f0)`, offset `delta = -b / 2a`.
/// The accept/reject thresholds are exact contracts, not tunables:
/// a degenerate fit (`a == 0`) and an extremum outside the sampled triple
/// (`|delta| > 1`) are both invalid. The accepted offset is mapped through
/// the actual axis spacing, not an assumed unit step.
fn refine_parabola(f0: Real, f1: Real, f2: Real, center: Real, step: Real) -> Real {
    let a = 0.5 * (f0 + f2) - f1;
    let b = 0.5 * (f2 - f0);
    if a == 0.0 {
        return Real::NAN;
    }
    let delta = -b / (2.0 * a);
    // The negated comparison also rejects NaN deltas from NaN neighbors.
    if !(delta.abs() <= 1.0) {
        return Real::NAN;
    }
    center + delta * step
}
