//! Regional aggregation of dose fields

// crate modules
use crate::error::{Error, Result};

// dosemap modules
use dosemap_grid::{Grid, Region};
use dosemap_utils::{f, OptionExt, SliceExt, ValueExt};

// external crates
use itertools::izip;
use log::{trace, warn};
use serde::Serialize;

/// Outcome of aggregating a region
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    /// At least one voxel center fell inside the region
    Ok,
    /// No voxel center fell inside the region
    EmptyRegion,
}

/// Summary of a grid over one region, optionally against a reference grid
///
/// An empty region is not an error. It is reported with a status of
/// [AggregateStatus::EmptyRegion], a sum and count of zero, and a NaN mean.
///
/// With a reference grid the relative measures use these sentinels:
///
/// | Field            | Value                                       | Sentinel                      |
/// | ---------------- | ------------------------------------------- | ----------------------------- |
/// | `ratio`          | `sum / reference_sum`                       | `0.0` if `reference_sum <= 0` |
/// | `percent_change` | `100 (sum - reference_sum) / reference_sum` | `0.0` if `reference_sum == 0` |
///
/// The regional ratio differs from the voxel-wise [ratio()](crate::ratio),
/// which reads `1.0` where the reference is not positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAggregate {
    /// Name of the aggregated region
    pub region: String,
    pub sum: f64,
    pub mean: f64,
    /// Number of voxels in the region
    pub count: usize,
    pub status: AggregateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_sum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
}

impl RegionAggregate {
    /// True if the region selected no voxels
    pub fn is_empty(&self) -> bool {
        self.status == AggregateStatus::EmptyRegion
    }
}

impl std::fmt::Display for RegionAggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let none = || "none".to_string();
        let change = self.percent_change.map(|p| p.percent(2)).unwrap_or_else(none);
        let ratio = self.ratio.map(|r| f!("{r:.4}")).unwrap_or_else(none);

        write!(
            f,
            "{:<24} sum {:>11} | mean {:>11} | n={:<6} | ref {:>11} | ratio {:>7} | {change}",
            self.region,
            self.sum.sci(4, 2),
            self.mean.sci(4, 2),
            self.count,
            self.reference_sum.display_sci(4),
            ratio,
        )
    }
}

/// Boolean mask of the voxels whose centers fall inside a region
pub fn mask(grid: &Grid, region: &Region) -> Vec<bool> {
    region.mask(grid)
}

/// Aggregate a grid over a region, optionally against a reference
///
/// The reference must have the same shape as the grid, otherwise
/// [Error::ShapeMismatch] is returned.
///
/// ```rust
/// # use dosemap_compare::{aggregate, AggregateStatus};
/// # use dosemap_grid::{uniform_edges, Grid, Region};
/// let edges = uniform_edges(0.0, 4.0, 4);
/// let reference = Grid::filled(1.0, edges.clone(), edges).unwrap();
/// let grid = reference.scale(1.1);
///
/// let insert = Region::rectangle("insert", 2.0, 4.0, 0.0, 4.0);
/// let result = aggregate(&grid, &insert, Some(&reference)).unwrap();
///
/// assert_eq!(result.status, AggregateStatus::Ok);
/// assert_eq!(result.count, 8);
/// assert_eq!(result.reference_sum, Some(8.0));
/// assert!((result.percent_change.unwrap() - 10.0).abs() < 1e-9);
/// ```
pub fn aggregate(
    grid: &Grid,
    region: &Region,
    reference: Option<&Grid>,
) -> Result<RegionAggregate> {
    if let Some(reference) = reference {
        if !grid.same_shape(reference) {
            return Err(Error::ShapeMismatch {
                expected: grid.shape(),
                found: reference.shape(),
            });
        }
    }

    let selected = mask(grid, region);
    let values: Vec<f64> = grid
        .values()
        .iter()
        .zip(&selected)
        .filter(|(_, m)| **m)
        .map(|(v, _)| *v)
        .collect();

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let (mean, status) = if count == 0 {
        warn!("Region \"{}\" does not contain any voxel centers", region.name);
        (f64::NAN, AggregateStatus::EmptyRegion)
    } else {
        (sum / count as f64, AggregateStatus::Ok)
    };

    let reference_sum = reference.map(|reference| {
        izip!(reference.values(), &selected)
            .filter(|(_, m)| **m)
            .map(|(v, _)| *v)
            .sum::<f64>()
    });

    let ratio = reference_sum.map(|r| if r <= 0.0 { 0.0 } else { sum / r });
    let percent_change = reference_sum.map(|r| {
        if r == 0.0 {
            0.0
        } else {
            100.0 * (sum - r) / r
        }
    });

    trace!("Region \"{}\": {count} voxels, sum {sum:e}", region.name);

    Ok(RegionAggregate {
        region: region.name.clone(),
        sum,
        mean,
        count,
        status,
        reference_sum,
        ratio,
        percent_change,
    })
}

/// Aggregate a grid over every region in order
pub fn aggregate_all(
    grid: &Grid,
    regions: &[Region],
    reference: Option<&Grid>,
) -> Result<Vec<RegionAggregate>> {
    regions
        .iter()
        .map(|region| aggregate(grid, region, reference))
        .collect()
}

/// Consecutive annuli from a list of increasing radii
///
/// Each ring is named after its radii, e.g. "ring 5-10 mm". Rings are
/// half-open (`inner <= r < outer`) so no voxel belongs to two of them.
///
/// ```rust
/// # use dosemap_compare::rings;
/// let regions = rings("ring", 0.0, 0.0, &[0.0, 5.0, 10.0]).unwrap();
///
/// assert_eq!(regions.len(), 2);
/// assert_eq!(regions[1].name, "ring 5-10 mm");
/// assert!(rings("ring", 0.0, 0.0, &[5.0, 1.0]).is_err());
/// ```
pub fn rings(name: &str, x0: f64, y0: f64, radii: &[f64]) -> Result<Vec<Region>> {
    if !radii.is_strictly_increasing() || radii.first().is_some_and(|r| *r < 0.0) {
        return Err(Error::UnsortedRadii);
    }

    Ok(radii
        .windows(2)
        .map(|r| Region::annulus(&f!("{name} {}-{} mm", r[0], r[1]), x0, y0, r[0], r[1]))
        .collect())
}

/// Aggregate a grid over consecutive rings around (x0, y0)
///
/// A shorthand for [rings()] followed by [aggregate_all()].
pub fn radial_aggregate(
    grid: &Grid,
    x0: f64,
    y0: f64,
    radii: &[f64],
    reference: Option<&Grid>,
) -> Result<Vec<RegionAggregate>> {
    aggregate_all(grid, &rings("ring", x0, y0, radii)?, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dosemap_grid::uniform_edges;

    #[test]
    fn display_without_reference() {
        let edges = uniform_edges(0.0, 2.0, 2);
        let grid = Grid::filled(2.0, edges.clone(), edges).unwrap();
        let result = aggregate(&grid, &Region::everywhere("all"), None).unwrap();
        let text = result.to_string();
        assert!(text.contains("8.0000e+00"));
        assert!(text.contains("none"));
    }

    #[test]
    fn negative_radius_rejected() {
        assert_eq!(rings("r", 0.0, 0.0, &[-1.0, 2.0]), Err(Error::UnsortedRadii));
    }
}
