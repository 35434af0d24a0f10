//! Dense stereo and multi-view correspondence by cost-volume search.
//!
//! Given a reference image, one or more secondary images, per-camera lens
//! models, and known rigid transforms between camera frames, the engine
//! estimates per-pixel disparity or depth: it exhaustively scores a
//! hypothesis axis with a windowed photometric cost, picks the per-pixel
//! minimum, and refines it to sub-unit precision with a closed-form
//! parabola fit.
//!
//! # Quick start
//! ```
//! use densematch::{match_disparity, HypothesisAxis, MatchConfig};
//! use densematch_core::synthetic;
//!
//! let reference = synthetic::texture_image(64, 32);
//! let secondary = synthetic::shift_columns(&reference, 3.0);
//!
//! let axis = HypothesisAxis::linspace(0.0, 8.0, 9)?;
//! let map = match_disparity(&reference, &secondary, &axis, &MatchConfig::default())?;
//! assert!(map.valid_count() > 0);
//! # Ok::<(), densematch::MatchError>(())
//! ```
//!
//! # Concepts
//! - Disparity search and plane-sweep depth search share one pipeline;
//!   only the [`HypothesisSampler`] differs (horizontal shift vs. full
//!   reprojection through a lens and rigid transform).
//! - Multi-view matching sums per-camera cost volumes over one shared
//!   reference ray field before the unchanged selection step.
//! - Invalid estimates are NaN map entries, never errors; configuration
//!   problems fail eagerly with [`MatchError`].
//!
//! Core data types (images, lens models, ray fields, maps) live in
//! `densematch-core`.

mod axis;
mod cost;
mod error;
mod fuse;
mod matcher;
mod postfilter;
mod sampler;
mod select;
mod volume;

pub use axis::HypothesisAxis;
pub use cost::CostFunction;
pub use error::{MatchError, MatchResult};
pub use fuse::fuse_volumes;
pub use matcher::{match_depth, match_disparity, match_multi_view, MatchConfig, SecondaryView};
pub use postfilter::{post_filter, smooth_nan_aware, Kernel, PostFilterConfig};
pub use sampler::{HorizontalShift, HypothesisSampler, PlaneSweep};
pub use select::{select_minimum, SelectOptions};
pub use volume::{build_cost_volume, CostVolume};
