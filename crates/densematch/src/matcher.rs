//! High-level matching entry points.

use densematch_core::{CorrespondenceMap, Image, Iso3, LensModel, RayField};
use serde::{Deserialize, Serialize};

use crate::axis::HypothesisAxis;
use crate::cost::CostFunction;
use crate::error::{check_same_shape, MatchError, MatchResult};
use crate::fuse::fuse_volumes;
use crate::sampler::{HorizontalShift, PlaneSweep};
use crate::select::{select_minimum, SelectOptions};
use crate::volume::{build_cost_volume, CostVolume};

/// Matching configuration shared by all entry points.
///
/// All configuration is explicit per call; nothing is read from global or
/// environment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Odd aggregation window size; 1 disables spatial aggregation.
    pub window_size: usize,
    /// Photometric dissimilarity.
    pub cost_function: CostFunction,
    /// Parabola sub-pixel refinement of the discrete winner.
    pub subpixel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            cost_function: CostFunction::SumOfAbsoluteDifference,
            subpixel: true,
        }
    }
}

/// One secondary camera of a rig: image, lens, and pose in the reference
/// frame. The rig is read-only input; all secondaries must express their
/// pose relative to the same reference frame.
pub struct SecondaryView<'a, L: LensModel> {
    pub image: &'a Image,
    pub lens: &'a L,
    /// Pose of this camera expressed in the reference frame.
    pub pose_in_reference: Iso3,
}

/// Two-view disparity search with assumed horizontal-only camera motion.
///
/// Columns within `ceil(max |disparity|)` of either horizontal edge are
/// forced invalid to mask shift artifacts.
pub fn match_disparity(
    reference: &Image,
    secondary: &Image,
    axis: &HypothesisAxis,
    config: &MatchConfig,
) -> MatchResult<CorrespondenceMap> {
    check_same_shape(reference.shape(), secondary.shape())?;
    check_channels(reference, secondary)?;

    let sampler = HorizontalShift::new(secondary);
    let volume = build_cost_volume(
        reference,
        &sampler,
        axis,
        config.window_size,
        config.cost_function,
    )?;
    let opts = SelectOptions {
        subpixel: config.subpixel,
        border_cols: axis.max_abs().ceil() as usize,
    };
    tracing::debug!(border_cols = opts.border_cols, "disparity selection");
    Ok(select_minimum(&volume, opts))
}

/// Two-view plane-sweep depth search over a reference ray field.
pub fn match_depth<L: LensModel + Sync>(
    reference: &Image,
    rays: &RayField,
    view: &SecondaryView<'_, L>,
    axis: &HypothesisAxis,
    config: &MatchConfig,
) -> MatchResult<CorrespondenceMap> {
    let volume = depth_volume(reference, rays, view, axis, config)?;
    Ok(select_minimum(
        &volume,
        SelectOptions {
            subpixel: config.subpixel,
            border_cols: 0,
        },
    ))
}

/// N-view plane-sweep depth search.
///
/// Builds one cost volume per secondary camera over the shared axis and
/// ray field, accumulates them into a single fused volume, and runs the
/// unchanged selector on the sum. With one secondary camera this is
/// identical to [`match_depth`].
pub fn match_multi_view<L: LensModel + Sync>(
    reference: &Image,
    rays: &RayField,
    views: &[SecondaryView<'_, L>],
    axis: &HypothesisAxis,
    config: &MatchConfig,
) -> MatchResult<CorrespondenceMap> {
    if views.is_empty() {
        return Err(MatchError::InvalidConfiguration(
            "multi-view matching needs at least one secondary camera".into(),
        ));
    }

    let volumes = views
        .iter()
        .map(|view| depth_volume(reference, rays, view, axis, config))
        .collect::<MatchResult<Vec<_>>>()?;
    let fused = fuse_volumes(&volumes)?;
    tracing::debug!(cameras = views.len(), "fused multi-view volume");

    Ok(select_minimum(
        &fused,
        SelectOptions {
            subpixel: config.subpixel,
            border_cols: 0,
        },
    ))
}

fn depth_volume<L: LensModel + Sync>(
    reference: &Image,
    rays: &RayField,
    view: &SecondaryView<'_, L>,
    axis: &HypothesisAxis,
    config: &MatchConfig,
) -> MatchResult<CostVolume> {
    check_same_shape(reference.shape(), rays.shape())?;
    check_same_shape(reference.shape(), view.image.shape())?;
    check_channels(reference, view.image)?;

    let sampler = PlaneSweep::new(rays, view.image, view.lens, &view.pose_in_reference)?;
    build_cost_volume(
        reference,
        &sampler,
        axis,
        config.window_size,
        config.cost_function,
    )
}

fn check_channels(reference: &Image, secondary: &Image) -> MatchResult<()> {
    if reference.channels() != secondary.channels() {
        return Err(MatchError::InvalidConfiguration(format!(
            "reference has {} channels, secondary has {}",
            reference.channels(),
            secondary.channels()
        )));
    }
    Ok(())
}
