//! Property checks over the dispersion → projection → extraction pipeline
//!
//! Run with: `cargo test --test field_properties`

mod common;

use approx::assert_relative_eq;
use plume_core::{
    compute_heat_points, concentration_at, max_weight, projection::inverse_rotate, wind_to_bearing,
    DispersionField, GeoProjector, GridConfig, HeatPointExtractor, PlumeConfig, PlumeGrid,
    PlumeModel, PlumeWarning, SourceSpec, SpreadCoefficients, MAX_GRID_CELLS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_source(rng: &mut StdRng) -> SourceSpec {
    SourceSpec::from_scalars(
        rng.random_range(-60.0..60.0),
        rng.random_range(-179.0..179.0),
        10f64.powf(rng.random_range(6.0..15.0)),
        rng.random_range(0.5..20.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..300.0),
    )
    .unwrap()
}

/// Weights lie in (0, 1] and the peak cell has weight 1.
#[test]
fn test_weights_bounded_with_unit_peak() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let model = PlumeModel::default();

    for _ in 0..25 {
        let source = random_source(&mut rng);
        let output = model.compute_heat_points(&source).unwrap();

        assert!(!output.points.is_empty(), "empty plume for {source}");
        assert!(output.points.len() <= 10_000);
        assert!(output
            .points
            .iter()
            .all(|p| p.weight > 0.0 && p.weight <= 1.0));

        assert_relative_eq!(max_weight(&output.points).unwrap(), 1.0, epsilon = 1e-12);
    }
}

/// With the grid reaching back to the source, no point maps to a cell
/// inside the 100 m exclusion zone.
#[test]
fn test_no_points_from_exclusion_zone() {
    let config = PlumeConfig {
        grid: GridConfig {
            x_min: 0.0,
            x_max: 2_000.0,
            nx: 81,
            y_min: -500.0,
            y_max: 500.0,
            ny: 41,
        },
        ..Default::default()
    };
    let model = PlumeModel::new(config).unwrap();

    for wind_from in [0.0, 90.0, 135.0, 180.0, 270.0] {
        let source = SourceSpec::from_scalars(37.421, 141.032, 1e13, 4.0, wind_from, 0.0).unwrap();

        let field = DispersionField::from_config(model.config())
            .evaluate(model.grid(), &source, 1.0)
            .unwrap();
        for (i, c) in field.values().iter().enumerate() {
            let (x, _) = model.grid().position(i);
            if x < 100.0 {
                assert_eq!(*c, 0.0);
            }
        }

        let output = model.compute_heat_points(&source).unwrap();
        assert!(!output.points.is_empty());
        let wind_to = wind_to_bearing(source.wind_from());
        for point in &output.points {
            let offset = output.origin.offset_to(point.coord(), 111_000.0);
            let (x, _) = inverse_rotate(offset, wind_to);
            assert!(x >= 100.0 - 1e-6, "point maps back to x={x}");
        }
    }
}

/// A configuration cannot shrink the exclusion zone below 100 m.
#[test]
fn test_config_cannot_disable_exclusion_zone() {
    let config = PlumeConfig {
        grid: GridConfig {
            x_min: 0.0,
            x_max: 2_000.0,
            nx: 41,
            ..Default::default()
        },
        exclusion_distance: 0.0,
        ..Default::default()
    };
    let err = PlumeModel::new(config).unwrap_err();
    assert_eq!(err.parameter(), "exclusion_distance");
}

/// However a configuration samples the grid, at most 10 000 points come back.
#[test]
fn test_config_cannot_exceed_point_limit() {
    let oversized = PlumeConfig {
        grid: GridConfig {
            nx: 200,
            ny: 200,
            ..Default::default()
        },
        relative_threshold: 0.0,
        ..Default::default()
    };
    assert!(PlumeModel::new(oversized).is_err());

    let at_limit = PlumeConfig {
        grid: GridConfig {
            nx: 50,
            ny: 200,
            ..Default::default()
        },
        relative_threshold: 0.0,
        ..Default::default()
    };
    let model = PlumeModel::new(at_limit).unwrap();
    let source = SourceSpec::from_scalars(37.421, 141.032, 1e13, 4.0, 135.0, 80.0).unwrap();
    let output = model.compute_heat_points(&source).unwrap();
    assert!(output.points.len() <= MAX_GRID_CELLS);
}

/// Beyond the peak, concentration strictly decreases with distance.
#[test]
fn test_monotonic_decay_beyond_peak() {
    let spread = SpreadCoefficients::default();
    let cases: [(f64, &[f64]); 2] = [
        // y = 0, H = 80: peak near x ≈ 940 m
        (0.0, &[2_000.0, 4_000.0, 8_000.0, 12_000.0, 15_000.0]),
        // y = 500: peak pushed out to x ≈ 4.5 km
        (500.0, &[6_000.0, 8_000.0, 10_000.0, 12_500.0, 15_000.0]),
    ];

    for (y, xs) in cases {
        let values: Vec<f64> = xs
            .iter()
            .map(|&x| concentration_at(x, y, 1e13, 4.0, 80.0, 1.0, &spread))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[1] < pair[0], "not decaying at y={y}: {values:?}");
        }
    }
}

/// Lowering the threshold never shrinks the point set, and every point
/// clears the threshold it was extracted with.
#[test]
fn test_threshold_monotonic() {
    let grid = PlumeGrid::standard();
    let source = SourceSpec::from_scalars(51.389, 30.099, 1e13, 4.0, 45.0, 80.0).unwrap();
    let field = DispersionField::default().evaluate(grid, &source, 1.0).unwrap();
    let coords = GeoProjector::default().project(grid, source.origin(), source.wind_from());

    let mut previous = 0;
    for threshold in [0.5, 0.1, 0.01, 0.001, 0.0001, 0.0] {
        let points = HeatPointExtractor::new(threshold)
            .unwrap()
            .extract(&field, &coords)
            .unwrap()
            .points;
        assert!(points.len() >= previous, "count fell at threshold {threshold}");
        assert!(points.iter().all(|p| p.weight > threshold));
        previous = points.len();
    }
    assert!(previous <= grid.len());
}

/// Extreme wind speed drives the field to zero; the result is empty, not NaN.
#[test]
fn test_vanishing_field_returns_empty() {
    let output = compute_heat_points(37.421, 141.032, 1e13, f64::MAX, 135.0, 80.0).unwrap();
    assert!(output.points.is_empty());
    assert!(output.is_degenerate());
    assert_eq!(output.peak_concentration, 0.0);
    assert_eq!(output.centroid(), None);
}

/// Overflowing concentrations are also treated as degenerate.
#[test]
fn test_overflowing_field_returns_empty() {
    let output = compute_heat_points(37.421, 141.032, f64::MAX, 1e-300, 135.0, 0.0).unwrap();
    assert!(output.points.is_empty());
    assert!(output
        .warnings
        .iter()
        .any(|w| matches!(w, PlumeWarning::DegenerateField { .. })));
}

/// Two evaluations of the same inputs are identical.
#[test]
fn test_evaluation_is_deterministic() {
    let a = compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0).unwrap();
    let b = compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0).unwrap();
    assert_eq!(a, b);
}
