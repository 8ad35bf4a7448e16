//! Voxel-wise comparison of two dose fields

// crate modules
use crate::error::{Error, Result};

// dosemap modules
use dosemap_grid::Grid;
use dosemap_utils::{SliceExt, ValueExt};

// external crates
use serde::Serialize;

/// Difference and ratio fields of a comparison `b` against `a`
///
/// Both grids carry the geometry of `a`, the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// `b - a` in the unit of the inputs
    pub difference: Grid,
    /// `b / a`, with `1.0` wherever `a <= 0`
    pub ratio: Grid,
}

/// Voxel-wise `b - a`
///
/// ```rust
/// # use dosemap_compare::difference;
/// # use dosemap_grid::{uniform_edges, Grid};
/// let a = Grid::filled(2.0, uniform_edges(0.0, 2.0, 2), uniform_edges(0.0, 1.0, 1)).unwrap();
/// let b = a.with_values(vec![3.0, 1.0]).unwrap();
///
/// assert_eq!(difference(&a, &b).unwrap().values(), &[1.0, -1.0]);
/// ```
pub fn difference(a: &Grid, b: &Grid) -> Result<Grid> {
    check_shapes(a, b)?;
    Ok(a.zip_map(b, |a, b| b - a)?)
}

/// Voxel-wise `b / a`, exactly `1.0` wherever `a <= 0`
///
/// Voxels with a non-positive reference read as unchanged.
///
/// ```rust
/// # use dosemap_compare::ratio;
/// # use dosemap_grid::{uniform_edges, Grid};
/// let (x, y) = (uniform_edges(0.0, 1.0, 1), uniform_edges(0.0, 3.0, 3));
/// let a = Grid::new(vec![vec![2.0, 0.0, -1.0]], x, y).unwrap();
/// let b = a.with_values(vec![3.0, 5.0, 5.0]).unwrap();
///
/// assert_eq!(ratio(&a, &b).unwrap().values(), &[1.5, 1.0, 1.0]);
/// ```
pub fn ratio(a: &Grid, b: &Grid) -> Result<Grid> {
    check_shapes(a, b)?;
    Ok(a.zip_map(b, safe_ratio)?)
}

/// Both the difference and the ratio of `b` against `a`
pub fn compare(a: &Grid, b: &Grid) -> Result<ComparisonResult> {
    Ok(ComparisonResult {
        difference: difference(a, b)?,
        ratio: ratio(a, b)?,
    })
}

/// Voxel-wise `100 * (b - a) / a`, `0.0` wherever `a == 0`
///
/// ```rust
/// # use dosemap_compare::percent_difference;
/// # use dosemap_grid::{uniform_edges, Grid};
/// let (x, y) = (uniform_edges(0.0, 1.0, 1), uniform_edges(0.0, 2.0, 2));
/// let a = Grid::new(vec![vec![4.0, 0.0]], x, y).unwrap();
/// let b = a.with_values(vec![5.0, 1.0]).unwrap();
///
/// assert_eq!(percent_difference(&a, &b).unwrap().values(), &[25.0, 0.0]);
/// ```
pub fn percent_difference(a: &Grid, b: &Grid) -> Result<Grid> {
    check_shapes(a, b)?;
    Ok(a.zip_map(b, |a, b| if a == 0.0 { 0.0 } else { 100.0 * (b - a) / a })?)
}

/// Ratio with the `1.0` sentinel for a non-positive denominator
pub(crate) fn safe_ratio(denominator: f64, numerator: f64) -> f64 {
    if denominator <= 0.0 {
        1.0
    } else {
        numerator / denominator
    }
}

fn check_shapes(a: &Grid, b: &Grid) -> Result<()> {
    if a.same_shape(b) {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            expected: a.shape(),
            found: b.shape(),
        })
    }
}

/// Descriptive statistics of a field
///
/// Non-finite values are skipped. With nothing left to describe, every
/// statistic is NaN and the count is zero.
///
/// ```rust
/// # use dosemap_compare::FieldSummary;
/// let summary = FieldSummary::summarize(&[1.0, 2.0, 3.0, 4.0, f64::NAN]);
///
/// assert_eq!(summary.count, 4);
/// assert_eq!(summary.min, 1.0);
/// assert_eq!(summary.max, 4.0);
/// assert_eq!(summary.mean, 2.5);
/// assert!((summary.std - 1.25_f64.sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub count: usize,
}

impl FieldSummary {
    /// Summarise every voxel of a grid
    pub fn of(grid: &Grid) -> Self {
        Self::summarize(grid.values())
    }

    /// Summarise a collection of values
    pub fn summarize(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        if finite.is_empty() {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std: f64::NAN,
                count: 0,
            };
        }

        let (mean, std) = mean_std(&finite);
        Self {
            min: finite.try_min().unwrap_or(f64::NAN),
            max: finite.try_max().unwrap_or(f64::NAN),
            mean,
            std,
            count: finite.len(),
        }
    }
}

impl std::fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "min {} | max {} | mean {} | std {} | n={}",
            self.min.sci(4, 2),
            self.max.sci(4, 2),
            self.mean.sci(4, 2),
            self.std.sci(4, 2),
            self.count
        )
    }
}

/// Mean and population standard deviation, NaN for an empty slice
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
