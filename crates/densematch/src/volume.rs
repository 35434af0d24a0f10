//! Cost volume construction.

use densematch_core::Image;
use rayon::prelude::*;

use crate::axis::HypothesisAxis;
use crate::cost::{aggregate_window, check_window, dissimilarity, CostFunction};
use crate::error::{MatchError, MatchResult};
use crate::sampler::HypothesisSampler;

/// Aggregated matching cost per `(hypothesis, row, col)`.
///
/// Slice-major layout: one contiguous `rows x cols` cost map per hypothesis,
/// in axis order. Volumes are per-call scratch; they are built, reduced to a
/// correspondence map, and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CostVolume {
    rows: usize,
    cols: usize,
    axis: HypothesisAxis,
    data: Vec<f32>,
}

impl CostVolume {
    /// Assemble a volume from per-hypothesis slices (exposed so callers can
    /// run custom fusion or selection strategies on raw volumes).
    pub fn from_slices(
        axis: HypothesisAxis,
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    ) -> MatchResult<Self> {
        if data.len() != axis.len() * rows * cols {
            return Err(MatchError::InvalidConfiguration(format!(
                "volume data length {} does not match {} x {rows} x {cols}",
                data.len(),
                axis.len(),
            )));
        }
        Ok(Self {
            rows,
            cols,
            axis,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn axis(&self) -> &HypothesisAxis {
        &self.axis
    }

    pub fn num_hypotheses(&self) -> usize {
        self.axis.len()
    }

    #[inline]
    pub fn cost(&self, hypothesis: usize, row: usize, col: usize) -> f32 {
        self.data[(hypothesis * self.rows + row) * self.cols + col]
    }

    /// Contiguous cost map of one hypothesis slice.
    pub fn slice(&self, hypothesis: usize) -> &[f32] {
        let len = self.rows * self.cols;
        &self.data[hypothesis * len..(hypothesis + 1) * len]
    }

    /// Element-wise accumulate another volume into this one.
    ///
    /// Both volumes must share the hypothesis axis and spatial shape. NaN
    /// entries propagate into the sum.
    pub fn accumulate(&mut self, other: &CostVolume) -> MatchResult<()> {
        if self.axis != other.axis {
            return Err(MatchError::InvalidConfiguration(
                "cannot accumulate volumes over different hypothesis axes".into(),
            ));
        }
        crate::error::check_same_shape((self.rows, self.cols), (other.rows, other.cols))?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(())
    }
}

/// Build the cost volume for one reference image and one sampler.
///
/// Iterates the hypothesis axis in order; for each value, resamples the
/// secondary image through `sampler`, computes the per-pixel dissimilarity,
/// aggregates it over the window, and stacks the result as one slice.
/// Slices are computed in parallel and collected in axis order, so the
/// result is deterministic for identical inputs.
pub fn build_cost_volume<S: HypothesisSampler>(
    reference: &Image,
    sampler: &S,
    axis: &HypothesisAxis,
    window: usize,
    cost: CostFunction,
) -> MatchResult<CostVolume> {
    check_window(window)?;
    if reference.channels() != sampler.channels() {
        return Err(MatchError::InvalidConfiguration(format!(
            "reference has {} channels but the sampler yields {}",
            reference.channels(),
            sampler.channels()
        )));
    }

    let rows = reference.height();
    let cols = reference.width();

    let slices: Vec<Vec<f32>> = axis
        .values()
        .par_iter()
        .map(|&h| {
            let mut resampled = Image::zeros_like(reference);
            sampler.resample(h, &mut resampled);
            let costs = dissimilarity(reference, &resampled, cost);
            aggregate_window(&costs, rows, cols, window)
        })
        .collect();

    let mut data = Vec::with_capacity(axis.len() * rows * cols);
    for slice in slices {
        data.extend_from_slice(&slice);
    }

    tracing::debug!(
        hypotheses = axis.len(),
        rows,
        cols,
        window,
        ?cost,
        "cost volume built"
    );

    CostVolume::from_slices(axis.clone(), rows, cols, data)
}
