//! End-to-end plume scenarios at the built-in case-study sites
//!
//! Run with: `cargo test --test case_study_scenarios`

mod common;

use approx::assert_abs_diff_eq;
use plume_core::{
    compute_animation_frames, compute_heat_points, AnimationConfig, CaseStudy, PlumeModel,
    PlumeWarning, SpreadCoefficients,
};

/// Fukushima Daiichi with wind from the south-east: wind-to is 315°, so the
/// plume must sit north-west of the plant.
#[test]
fn test_fukushima_plume_travels_northwest() {
    let output = compute_heat_points(37.421, 141.032, 1e13, 4.0, 135.0, 80.0).unwrap();
    assert!(!output.points.is_empty());
    assert!(output.warnings.is_empty());

    let centroid = output.centroid().unwrap();
    assert!(centroid.lat > output.origin.lat, "centroid {centroid} not north of origin");
    assert!(centroid.lon < output.origin.lon, "centroid {centroid} not west of origin");

    let bearing = output.origin.bearing_to(centroid);
    assert_abs_diff_eq!(bearing, 315.0, epsilon = 1.0);
}

/// Chernobyl with a north wind: wind-to is 180°, plume lies due south.
#[test]
fn test_chernobyl_plume_travels_south() {
    let output = compute_heat_points(51.389, 30.099, 1e13, 4.0, 0.0, 80.0).unwrap();
    let centroid = output.centroid().unwrap();

    assert!(centroid.lat < output.origin.lat);
    assert_abs_diff_eq!(centroid.lon, output.origin.lon, epsilon = 1e-3);
    assert_abs_diff_eq!(output.origin.bearing_to(centroid), 180.0, epsilon = 1.0);
}

/// Every cardinal wind-from bearing sends the plume the opposite way.
#[test]
fn test_plume_direction_for_each_case_and_bearing() {
    for case in CaseStudy::ALL {
        for (wind_from, expected_to) in [(0.0, 180.0), (90.0, 270.0), (180.0, 0.0), (270.0, 90.0)] {
            let source = common::case_source(case, wind_from);
            let output = PlumeModel::default().compute_heat_points(&source).unwrap();
            let bearing = output.origin.bearing_to(output.centroid().unwrap());

            // Circular difference so 359.9° and 0.1° compare as close
            let diff = (bearing - expected_to + 540.0).rem_euclid(360.0) - 180.0;
            assert!(
                diff.abs() < 1.0,
                "{case}: wind from {wind_from}° gave centroid bearing {bearing:.2}°"
            );
        }
    }
}

/// The plume centroid stays within the grid's reach (15 km downwind).
#[test]
fn test_centroid_within_grid_reach() {
    let source = CaseStudy::FukushimaDaiichi.default_source().unwrap();
    let output = PlumeModel::default().compute_heat_points(&source).unwrap();
    let offset = output
        .origin
        .offset_to(output.centroid().unwrap(), 111_000.0);
    assert!(offset.distance() > 100.0);
    assert!(offset.distance() < 15_000.0);
}

/// Twelve frames from 0.2 to 1.0 with strictly growing σy and σz.
#[test]
fn test_animation_spread_grows_every_frame() {
    let frames = compute_animation_frames(37.421, 141.032, 1e13, 4.0, 135.0, 80.0, 12).unwrap();
    assert_eq!(frames.len(), 12);
    assert_abs_diff_eq!(frames[0].spread_factor, 0.2, epsilon = 1e-12);
    assert_eq!(frames[11].spread_factor, 1.0);

    let spread = SpreadCoefficients::default();
    for pair in frames.windows(2) {
        let (sy0, sz0) = spread.sigmas(5_000.0, pair[0].spread_factor);
        let (sy1, sz1) = spread.sigmas(5_000.0, pair[1].spread_factor);
        assert!(sy1 > sy0 && sz1 > sz0);
        assert_eq!(pair[1].index, pair[0].index + 1);
    }

    for frame in &frames {
        assert_eq!(frame.emission_scale, 1.0);
        assert!(!frame.points.is_empty(), "frame {} empty", frame.index);
        assert!(frame.points.iter().all(|p| p.weight > 0.0 && p.weight <= 1.0));
    }
}

/// The last frame of the animation is the steady single-frame plume.
#[test]
fn test_final_frame_matches_single_frame() {
    let source = CaseStudy::Chernobyl.default_source().unwrap();
    let model = PlumeModel::default();
    let single = model.compute_heat_points(&source).unwrap();
    let frames = model
        .compute_animation_frames(&source, AnimationConfig::default())
        .unwrap();
    let last = frames.last().unwrap().clone();
    assert_eq!(last.points, single.points);
    assert_eq!(last.into_output(source), single);
}

/// A source near the pole still produces a plume, flagged as imprecise.
#[test]
fn test_polar_origin_reports_projection_limit() {
    let output = compute_heat_points(87.5, 10.0, 1e13, 4.0, 200.0, 80.0).unwrap();
    assert!(!output.points.is_empty());
    assert!(output
        .warnings
        .iter()
        .any(|w| matches!(w, PlumeWarning::ProjectionLimit { .. })));
}

/// A plume blown east across the antimeridian keeps every longitude in
/// [-180, 180) and still points east.
#[test]
fn test_plume_across_antimeridian_stays_in_range() {
    let output = compute_heat_points(-16.5, 179.95, 1e13, 4.0, 270.0, 80.0).unwrap();
    assert!(!output.points.is_empty());
    assert!(output
        .points
        .iter()
        .all(|p| (-180.0..180.0).contains(&p.lon)));
    assert!(output.points.iter().any(|p| p.lon < 0.0));

    let centroid = output.centroid().unwrap();
    assert_abs_diff_eq!(output.origin.bearing_to(centroid), 90.0, epsilon = 1.0);
}
