//! Multi-view cost fusion.

use crate::error::{MatchError, MatchResult};
use crate::volume::CostVolume;

/// Sum cost volumes from several secondary cameras element-wise.
///
/// All volumes must be built over the same hypothesis axis and reference
/// ray field, so selection logic is unchanged afterwards. The sum is not
/// renormalized by the number of cameras, and a pixel without evidence in
/// one camera (NaN aggregate) makes the fused cost NaN at that hypothesis
/// rather than silently biasing the sum; callers wanting valid-count
/// weighting must combine raw volumes themselves.
pub fn fuse_volumes(volumes: &[CostVolume]) -> MatchResult<CostVolume> {
    let Some((first, rest)) = volumes.split_first() else {
        return Err(MatchError::InvalidConfiguration(
            "multi-view fusion needs at least one volume".into(),
        ));
    };
    let mut fused = first.clone();
    for v in rest {
        fused.accumulate(v)?;
    }
    Ok(fused)
}
