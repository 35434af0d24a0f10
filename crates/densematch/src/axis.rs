//! Hypothesis axis: the ordered sequence of disparities or depths to test.

use densematch_core::Real;

use crate::error::{MatchError, MatchResult};

/// Strictly monotonic sequence of hypothesis values, at least 3 entries.
///
/// Three entries is the hard floor because the sub-pixel fit needs a left
/// and a right neighbor around any selectable index. The axis may increase
/// or decrease; values are disparities in pixels or depths in scene units.
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisAxis {
    values: Vec<Real>,
}

impl HypothesisAxis {
    /// Axis from explicit values; validates length and strict monotonicity.
    pub fn from_values(values: Vec<Real>) -> MatchResult<Self> {
        if values.len() < 3 {
            return Err(MatchError::InvalidConfiguration(format!(
                "hypothesis axis needs at least 3 values, got {}",
                values.len()
            )));
        }
        let increasing = values[1] > values[0];
        for w in values.windows(2) {
            let ok = if increasing { w[1] > w[0] } else { w[1] < w[0] };
            if !ok || !w[0].is_finite() || !w[1].is_finite() {
                return Err(MatchError::InvalidConfiguration(
                    "hypothesis axis must be strictly monotonic and finite".into(),
                ));
            }
        }
        Ok(Self { values })
    }

    /// `count` evenly spaced values over `[start, end]` inclusive.
    pub fn linspace(start: Real, end: Real, count: usize) -> MatchResult<Self> {
        if count < 3 {
            return Err(MatchError::InvalidConfiguration(format!(
                "hypothesis axis needs at least 3 values, got {count}"
            )));
        }
        let step = (end - start) / (count - 1) as Real;
        let values = (0..count).map(|i| start + step * i as Real).collect();
        Self::from_values(values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    #[inline]
    pub fn value(&self, index: usize) -> Real {
        self.values[index]
    }

    /// Largest absolute hypothesis magnitude; sets the disparity-mode
    /// border-invalidation margin.
    pub fn max_abs(&self) -> Real {
        self.values.iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    /// Mean local spacing around an interior index, used to map a sub-pixel
    /// offset in index units onto the axis. Equals the exact step on evenly
    /// spaced axes.
    #[inline]
    pub fn local_step(&self, index: usize) -> Real {
        debug_assert!(index >= 1 && index + 1 < self.values.len());
        0.5 * (self.values[index + 1] - self.values[index - 1])
    }
}
