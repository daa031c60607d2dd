//! Hand-computed matching scenarios.

use approx::assert_abs_diff_eq;
use proxima_match::{Layout, MatchConfig, Metric, PointSet, Threshold, match_points};

fn rows(rows: &[[f64; 2]]) -> PointSet {
    PointSet::from_rows(rows, 2).unwrap()
}

/// Query next to the first of two well-separated reference points.
#[test]
fn closest_of_two() {
    let x = rows(&[[0.0, 0.0], [10.0, 0.0]]);
    let y = rows(&[[0.1, 0.0]]);
    let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
    let m = result.get(0).expect("query should match");
    assert_eq!(m.index, 0);
    assert_abs_diff_eq!(m.distance, 0.1, epsilon = 1e-12);
}

/// Query farther than the threshold from the only reference point.
#[test]
fn outside_threshold() {
    let x = rows(&[[0.0, 0.0]]);
    let y = rows(&[[5.0, 0.0]]);
    let result = match_points(&x, &y, &Threshold::Scalar(1.0), &MatchConfig::default()).unwrap();
    assert_eq!(result.get(0), None);
    assert!(result.distances()[0].is_nan());
    assert!(result.one_based_indices()[0].is_nan());
}

/// Coincident reference points where only the second admits the query.
#[test]
fn coincident_points_per_point_threshold() {
    let x = rows(&[[0.0, 0.0], [0.0, 0.0]]);
    let y = rows(&[[0.6, 0.0]]);
    let threshold = Threshold::PerPoint(vec![0.5, 100.0]);
    let result = match_points(&x, &y, &threshold, &MatchConfig::default()).unwrap();
    let m = result.get(0).expect("query should match");
    assert_eq!(m.index, 1);
    assert_abs_diff_eq!(m.distance, 0.6, epsilon = 1e-12);
}

/// Distance exactly at the threshold is accepted.
#[test]
fn distance_equal_to_threshold() {
    let x = rows(&[[0.0, 0.0]]);
    let y = rows(&[[3.0, 4.0]]);
    let result = match_points(&x, &y, &Threshold::Scalar(5.0), &MatchConfig::default()).unwrap();
    let m = result.get(0).expect("boundary distance should match");
    assert_abs_diff_eq!(m.distance, 5.0, epsilon = 1e-12);
}

/// City-block distance changes which reference point is nearest.
#[test]
fn cityblock_changes_winner() {
    // Euclidean: x0 at 5.0, x1 at 5.5. City-block: x0 at 7.0, x1 at 5.5.
    let x = rows(&[[3.0, 4.0], [5.5, 0.0]]);
    let y = rows(&[[0.0, 0.0]]);
    let threshold = Threshold::Scalar(10.0);

    let euclid = match_points(&x, &y, &threshold, &MatchConfig::default()).unwrap();
    assert_eq!(euclid.indices(), vec![Some(0)]);
    assert_abs_diff_eq!(euclid.distances()[0], 5.0, epsilon = 1e-12);

    let config = MatchConfig::new().with_metric(Metric::Cityblock);
    let cityblock = match_points(&x, &y, &threshold, &config).unwrap();
    assert_eq!(cityblock.indices(), vec![Some(1)]);
    assert_abs_diff_eq!(cityblock.distances()[0], 5.5, epsilon = 1e-12);
}

/// Column-major input, as handed over by a MATLAB host, gives the same answer.
#[test]
fn column_major_input() {
    // X = [(0,0), (10,0)], Y = [(0.1,0), (9,0.5)]
    let x = PointSet::new(vec![0.0, 10.0, 0.0, 0.0], 2, Layout::ColumnMajor).unwrap();
    let y = PointSet::new(vec![0.1, 9.0, 0.0, 0.5], 2, Layout::ColumnMajor).unwrap();
    let result = match_points(&x, &y, &Threshold::Scalar(2.0), &MatchConfig::default()).unwrap();
    assert_eq!(result.indices(), vec![Some(0), Some(1)]);
    assert_eq!(result.one_based_indices(), vec![1.0, 2.0]);
}

/// A smoothly moving query track walks along a line of reference points.
#[test]
fn smooth_query_track() {
    let x_rows: Vec<[f64; 2]> = (0..20).map(|i| [i as f64, 0.0]).collect();
    let x = rows(&x_rows);
    let y_rows: Vec<[f64; 2]> = (0..39).map(|i| [i as f64 * 0.5 + 0.1, 0.05]).collect();
    let y = rows(&y_rows);
    let result = match_points(&x, &y, &Threshold::Scalar(0.6), &MatchConfig::default()).unwrap();

    for (q, m) in result.iter().enumerate() {
        let qx = q as f64 * 0.5 + 0.1;
        let m = m.expect("every query is within 0.6 of a grid point");
        assert_eq!(m.index, qx.round() as usize);
    }
    // Once the track is under way most candidates are pruned.
    assert!(result.stats().pruned > result.stats().evaluated);
}

/// High-dimensional points.
#[test]
fn eight_dimensional() {
    let dims = 8;
    let x_data: Vec<f64> = (0..5 * dims).map(|i| (i / dims) as f64 * 10.0).collect();
    let x = PointSet::new(x_data, dims, Layout::RowMajor).unwrap();
    let y = PointSet::new(vec![21.0; dims], dims, Layout::RowMajor).unwrap();
    let result = match_points(&x, &y, &Threshold::Scalar(5.0), &MatchConfig::default()).unwrap();
    let m = result.get(0).expect("query should match");
    assert_eq!(m.index, 2);
    assert_abs_diff_eq!(m.distance, (dims as f64).sqrt(), epsilon = 1e-12);
}
