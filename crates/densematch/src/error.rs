use thiserror::Error;

/// Errors raised eagerly for bad call configuration.
///
/// Per-pixel numerical degeneracies (out-of-bounds projection, degenerate
/// sub-pixel fit, empty filter neighborhood) are never errors; they surface
/// as NaN entries in the output maps.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("unknown cost function `{0}`")]
    InvalidCostFunction(String),
    #[error("shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
}

pub type MatchResult<T> = Result<T, MatchError>;

pub(crate) fn check_same_shape(
    expected: (usize, usize),
    got: (usize, usize),
) -> MatchResult<()> {
    if expected != got {
        return Err(MatchError::ShapeMismatch {
            expected_rows: expected.0,
            expected_cols: expected.1,
            rows: got.0,
            cols: got.1,
        });
    }
    Ok(())
}
