//! Integration tests for regional aggregation

use dosemap_compare::{aggregate, aggregate_all, radial_aggregate, rings, AggregateStatus, Error};
use dosemap_grid::{uniform_edges, Axis, Grid, Region, Side};
use rstest::{fixture, rstest};

#[fixture]
fn grid() -> Grid {
    let edges = uniform_edges(-2.0, 2.0, 4);
    let blank = Grid::filled(0.0, edges.clone(), edges).unwrap();
    blank.with_values((0..16).map(|v| v as f64).collect()).unwrap()
}

#[rstest]
fn whole_grid(grid: Grid) {
    let result = aggregate(&grid, &Region::everywhere("all"), None).unwrap();
    assert_eq!(result.sum, grid.sum());
    assert_eq!(result.count, grid.len());
    assert_eq!(result.mean, 7.5);
    assert_eq!(result.status, AggregateStatus::Ok);
    assert_eq!(result.reference_sum, None);
    assert_eq!(result.ratio, None);
}

#[rstest]
fn empty_region(grid: Grid) {
    let far = Region::rectangle("far", 10.0, 20.0, 10.0, 20.0);
    let result = aggregate(&grid, &far, Some(&grid)).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.count, 0);
    assert_eq!(result.sum, 0.0);
    assert!(result.mean.is_nan());
    assert_eq!(result.percent_change, Some(0.0));
    assert_eq!(result.ratio, Some(0.0));
}

#[rstest]
fn zero_reference_sum(grid: Grid) {
    let zero = grid.map(|_| 0.0);
    let result = aggregate(&grid, &Region::everywhere("all"), Some(&zero)).unwrap();
    assert_eq!(result.reference_sum, Some(0.0));
    assert_eq!(result.percent_change, Some(0.0));
    assert_eq!(result.ratio, Some(0.0));
}

#[rstest]
fn negative_reference_sum(grid: Grid) {
    let negative = grid.map(|_| -1.0);
    let result = aggregate(&grid, &Region::everywhere("all"), Some(&negative)).unwrap();
    assert_eq!(result.reference_sum, Some(-16.0));
    assert_eq!(result.ratio, Some(0.0));
    // only an exactly zero reference is a sentinel for the percent change
    assert_eq!(result.percent_change, Some(100.0 * (120.0 + 16.0) / -16.0));
}

#[rstest]
#[case(Side::Below, 0.0 + 1.0 + 2.0 + 3.0 + 4.0 + 5.0 + 6.0 + 7.0)]
#[case(Side::Above, 8.0 + 9.0 + 10.0 + 11.0 + 12.0 + 13.0 + 14.0 + 15.0)]
fn half_planes(grid: Grid, #[case] side: Side, #[case] expected: f64) {
    let region = Region::half_plane("half", Axis::X, 0.0, side);
    let result = aggregate(&grid, &region, None).unwrap();
    assert_eq!(result.count, 8);
    assert_eq!(result.sum, expected);
}

#[rstest]
fn rings_partition_grid(grid: Grid) {
    let results = radial_aggregate(&grid, 0.0, 0.0, &[0.0, 1.0, 2.0, 3.0], None).unwrap();
    assert_eq!(results.len(), 3);

    // centers are at r = 0.71, 1.58 and 2.12
    let counts: Vec<usize> = results.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![4, 8, 4]);
    assert_eq!(results.iter().map(|r| r.sum).sum::<f64>(), grid.sum());
}

#[rstest]
fn reference_ratio(grid: Grid) {
    let doubled = grid.scale(2.0);
    let results = aggregate_all(
        &doubled,
        &[Region::everywhere("all"), Region::disc("core", 0.0, 0.0, 1.0)],
        Some(&grid),
    )
    .unwrap();

    for result in &results {
        assert_eq!(result.ratio, Some(2.0));
        assert_eq!(result.percent_change, Some(100.0));
    }
}

#[rstest]
fn reference_shape_mismatch(grid: Grid) {
    let edges = uniform_edges(0.0, 1.0, 1);
    let other = Grid::filled(1.0, edges.clone(), edges).unwrap();
    assert_eq!(
        aggregate(&grid, &Region::everywhere("all"), Some(&other)),
        Err(Error::ShapeMismatch {
            expected: (4, 4),
            found: (1, 1)
        })
    );
}

#[test]
fn ring_names() {
    let regions = rings("shell", 1.0, 2.0, &[2.5, 5.0]).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].name, "shell 2.5-5 mm");
    assert!(rings("shell", 0.0, 0.0, &[1.0]).unwrap().is_empty());
}

#[rstest]
fn serialises_for_reports(grid: Grid) {
    let result = aggregate(&grid, &Region::everywhere("all"), None).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["region"], "all");
    assert_eq!(json["status"], "ok");
    assert!(json.get("ratio").is_none());
}
