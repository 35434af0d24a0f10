//! Two-view disparity search on synthetic shifted pairs.

use approx::assert_abs_diff_eq;
use densematch::{match_disparity, CostFunction, HypothesisAxis, MatchConfig, MatchError};
use densematch_core::synthetic;

#[test]
fn integer_shift_is_recovered_exactly() -> anyhow::Result<()> {
    let reference = synthetic::texture_image(80, 24);
    let secondary = synthetic::shift_columns(&reference, 10.0);
    let axis = HypothesisAxis::linspace(0.0, 20.0, 21)?;
    let config = MatchConfig {
        window_size: 5,
        cost_function: CostFunction::SumOfAbsoluteDifference,
        subpixel: false,
    };

    let map = match_disparity(&reference, &secondary, &axis, &config)?;

    // Interior = outside the 20-column border-invalidation zone.
    for r in 0..24 {
        for c in 20..60 {
            assert!(map.is_valid(r, c), "({r},{c}) invalid");
            assert_eq!(map.get(r, c), 10.0, "({r},{c})");
        }
    }
    Ok(())
}

#[test]
fn both_cost_functions_recover_the_shift() {
    let reference = synthetic::texture_image(64, 16);
    let secondary = synthetic::shift_columns(&reference, 4.0);
    let axis = HypothesisAxis::linspace(0.0, 8.0, 9).unwrap();

    for cost_function in [
        CostFunction::SumOfAbsoluteDifference,
        CostFunction::SumOfSquaredDifference,
    ] {
        let config = MatchConfig {
            window_size: 5,
            cost_function,
            subpixel: false,
        };
        let map = match_disparity(&reference, &secondary, &axis, &config).unwrap();
        for r in 0..16 {
            for c in 8..56 {
                assert_eq!(map.get(r, c), 4.0, "{cost_function:?} ({r},{c})");
            }
        }
    }
}

#[test]
fn fractional_shift_is_recovered_to_subpixel_accuracy() -> anyhow::Result<()> {
    let true_disparity = 7.3;
    let reference = synthetic::texture_image(100, 20);
    let secondary = synthetic::shift_columns(&reference, true_disparity);
    let axis = HypothesisAxis::linspace(0.0, 15.0, 16)?;
    let config = MatchConfig {
        window_size: 7,
        cost_function: CostFunction::SumOfSquaredDifference,
        subpixel: true,
    };

    let map = match_disparity(&reference, &secondary, &axis, &config)?;

    let mut checked = 0usize;
    for r in 0..20 {
        for c in 15..85 {
            if !map.is_valid(r, c) {
                continue;
            }
            assert_abs_diff_eq!(map.get(r, c), true_disparity as f32, epsilon = 0.05);
            checked += 1;
        }
    }
    // The interior should be almost entirely valid.
    assert!(checked > 20 * 70 * 9 / 10, "only {checked} pixels checked");
    Ok(())
}

#[test]
fn border_columns_are_invalid_for_symmetric_ranges() {
    let reference = synthetic::texture_image(40, 12);
    let secondary = synthetic::shift_columns(&reference, 2.0);
    let axis = HypothesisAxis::linspace(-5.0, 5.0, 11).unwrap();
    let config = MatchConfig {
        window_size: 3,
        cost_function: CostFunction::SumOfAbsoluteDifference,
        subpixel: false,
    };

    let map = match_disparity(&reference, &secondary, &axis, &config).unwrap();

    for r in 0..12 {
        for c in (0..5).chain(35..40) {
            assert!(!map.is_valid(r, c), "border ({r},{c}) should be invalid");
        }
    }
    assert!(map.valid_count() > 0);
}

#[test]
fn identical_runs_produce_identical_maps() {
    let reference = synthetic::texture_image(48, 16);
    let secondary = synthetic::shift_columns(&reference, 3.0);
    let axis = HypothesisAxis::linspace(0.0, 6.0, 7).unwrap();
    let config = MatchConfig::default();

    let a = match_disparity(&reference, &secondary, &axis, &config).unwrap();
    let b = match_disparity(&reference, &secondary, &axis, &config).unwrap();

    let bits_a: Vec<u32> = a.data().iter().map(|v| v.to_bits()).collect();
    let bits_b: Vec<u32> = b.data().iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits_a, bits_b);
}

#[test]
fn configuration_errors_are_fatal_and_eager() {
    let reference = synthetic::texture_image(32, 8);
    let secondary = synthetic::shift_columns(&reference, 1.0);
    let axis = HypothesisAxis::linspace(0.0, 4.0, 5).unwrap();

    let config = MatchConfig {
        window_size: 4,
        ..Default::default()
    };
    assert!(matches!(
        match_disparity(&reference, &secondary, &axis, &config),
        Err(MatchError::InvalidConfiguration(_))
    ));

    assert!(matches!(
        "zncc".parse::<CostFunction>(),
        Err(MatchError::InvalidCostFunction(_))
    ));
}
