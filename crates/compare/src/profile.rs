//! One dimensional cuts through a grid

// crate modules
use crate::error::{Error, Result};
use crate::field::{mean_std, safe_ratio};

// dosemap modules
use dosemap_grid::{Axis, Grid};
use dosemap_utils::{f, SliceExt, ValueExt};

// external crates
use log::warn;
use serde::Serialize;

/// A 1D cut through a grid as `(coordinate, value)` points
///
/// `axis` is the axis the profile runs along. A line profile also records the
/// bin of the other axis it was taken at, while integrated profiles have no
/// fixed bin.
///
/// Profiles own their points and can be iterated any number of times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub axis: Axis,
    /// Bin index on the other axis
    pub fixed_index: Option<usize>,
    /// Bin center on the other axis \[mm\]
    pub fixed_coordinate: Option<f64>,
    /// (coordinate \[mm\], value) pairs in increasing coordinate
    pub points: Vec<(f64, f64)>,
}

impl Profile {
    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the profile has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the `(coordinate, value)` points
    pub fn iter(&self) -> std::slice::Iter<'_, (f64, f64)> {
        self.points.iter()
    }

    /// Values in coordinate order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Coordinates in increasing order \[mm\]
    pub fn coordinates(&self) -> Vec<f64> {
        self.points.iter().map(|(c, _)| *c).collect()
    }

    /// The point closest to `coordinate`, lower coordinate on a tie
    ///
    /// ```rust
    /// # use dosemap_compare::line_profile;
    /// # use dosemap_grid::{uniform_edges, Axis, Grid};
    /// let grid = Grid::new(
    ///     vec![vec![1.0], vec![2.0], vec![3.0]],
    ///     uniform_edges(0.0, 3.0, 3),
    ///     uniform_edges(-1.0, 1.0, 1),
    /// )
    /// .unwrap();
    /// let profile = line_profile(&grid, Axis::X, 0.0).unwrap();
    ///
    /// assert_eq!(profile.nearest(1.2), Some((1.5, 2.0)));
    /// assert_eq!(profile.nearest(1.0), Some((0.5, 1.0)));
    /// ```
    pub fn nearest(&self, coordinate: f64) -> Option<(f64, f64)> {
        let idx = self.coordinates().find_nearest(coordinate).ok()?;
        self.points.get(idx).copied()
    }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = &'a (f64, f64);
    type IntoIter = std::slice::Iter<'a, (f64, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let at = match self.fixed_coordinate {
            Some(c) => f!("at {} = {c} mm", self.axis.other()),
            None => f!("integrated over {}", self.axis.other()),
        };
        writeln!(f, "{} profile {at}", self.axis.profile_name())?;
        for (c, v) in &self.points {
            writeln!(f, "{:>12} {:>12}", c.sci(4, 2), v.sci(4, 2))?;
        }
        Ok(())
    }
}

/// Profile along `axis` at the bin of the other axis nearest to a coordinate
///
/// The bin whose center is closest to `fixed_coordinate` is used, with ties
/// going to the lower index. Coordinates outside the grid are clamped to the
/// outermost bin and a warning is logged.
///
/// ```rust
/// # use dosemap_compare::line_profile;
/// # use dosemap_grid::{uniform_edges, Axis, Grid};
/// let grid = Grid::new(
///     vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
///     uniform_edges(-1.5, 1.5, 3),
///     uniform_edges(-1.0, 1.0, 2),
/// )
/// .unwrap();
///
/// // horizontal profile through the upper half (y center 0.5)
/// let profile = line_profile(&grid, Axis::X, 0.7).unwrap();
/// assert_eq!(profile.fixed_index, Some(1));
/// assert_eq!(profile.points, vec![(-1.0, 2.0), (0.0, 4.0), (1.0, 6.0)]);
/// ```
pub fn line_profile(grid: &Grid, axis: Axis, fixed_coordinate: f64) -> Result<Profile> {
    let other = axis.other();
    let (lower, upper) = grid.extent(other);

    if fixed_coordinate < lower || fixed_coordinate > upper {
        warn!(
            "{other} = {fixed_coordinate} mm is outside [{lower}, {upper}], using the nearest bin"
        );
    }

    let centers = grid.centers(other);
    let index = centers.find_nearest(fixed_coordinate)?;
    let values = grid.lane(axis, index).ok_or(Error::LaneOutOfRange { axis, index })?;

    Ok(Profile {
        axis,
        fixed_index: Some(index),
        fixed_coordinate: Some(centers[index]),
        points: grid.centers(axis).into_iter().zip(values).collect(),
    })
}

/// Profile along `axis` summed over every bin of the other axis
///
/// ```rust
/// # use dosemap_compare::integrated_profile;
/// # use dosemap_grid::{uniform_edges, Axis, Grid};
/// let grid = Grid::new(
///     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
///     uniform_edges(0.0, 2.0, 2),
///     uniform_edges(0.0, 2.0, 2),
/// )
/// .unwrap();
///
/// assert_eq!(integrated_profile(&grid, Axis::X).unwrap().values(), vec![3.0, 7.0]);
/// assert_eq!(integrated_profile(&grid, Axis::Y).unwrap().values(), vec![4.0, 6.0]);
/// ```
pub fn integrated_profile(grid: &Grid, axis: Axis) -> Result<Profile> {
    let other = axis.other();
    let points = grid
        .centers(axis)
        .into_iter()
        .enumerate()
        .map(|(k, c)| {
            grid.lane(other, k)
                .map(|lane| (c, lane.iter().sum()))
                .ok_or(Error::LaneOutOfRange { axis: other, index: k })
        })
        .collect::<Result<Vec<(f64, f64)>>>()?;

    Ok(Profile {
        axis,
        fixed_index: None,
        fixed_coordinate: None,
        points,
    })
}

/// Pointwise `other / reference`, `1.0` where the reference is not positive
///
/// The result keeps the coordinates and fixed bin of the reference.
pub fn profile_ratio(reference: &Profile, other: &Profile) -> Result<Profile> {
    if reference.len() != other.len() {
        return Err(Error::ProfileMismatch {
            expected: reference.len(),
            found: other.len(),
        });
    }

    Ok(Profile {
        points: reference
            .iter()
            .zip(other.iter())
            .map(|((c, r), (_, o))| (*c, safe_ratio(*r, *o)))
            .collect(),
        ..reference.clone()
    })
}

/// Comparison of the two halves of a profile mirrored around a center
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Symmetry {
    /// Coordinate of the mirror point \[mm\]
    pub center: f64,
    /// Number of mirrored pairs compared
    pub pairs: usize,
    pub left_mean: f64,
    pub right_mean: f64,
    pub left_std: f64,
    pub right_std: f64,
    /// `|L - R| / ((L + R) / 2)` on the half means, zero if the average is
    /// not positive
    pub asymmetry_ratio: f64,
    /// Pearson correlation of mirrored pairs, zero if either half is flat
    pub correlation: f64,
}

impl std::fmt::Display for Symmetry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "center {} mm ({} pairs) | L {} | R {} | asymmetry {} | r = {:.4}",
            self.center,
            self.pairs,
            self.left_mean.sci(4, 2),
            self.right_mean.sci(4, 2),
            (100.0 * self.asymmetry_ratio).percent(2),
            self.correlation
        )
    }
}

/// Mirror a profile around the point nearest to `center` and compare halves
///
/// The center point itself belongs to neither half. Points are paired by
/// distance from the center and the longer half is trimmed, so both halves
/// always have the same length. At least one pair is needed.
///
/// ```rust
/// # use dosemap_compare::{symmetry, Profile};
/// # use dosemap_grid::Axis;
/// let profile = Profile {
///     axis: Axis::X,
///     fixed_index: None,
///     fixed_coordinate: None,
///     points: vec![(-2.0, 1.0), (-1.0, 2.0), (0.0, 9.0), (1.0, 2.0), (2.0, 1.0), (3.0, 0.5)],
/// };
///
/// let result = symmetry(&profile, 0.0).unwrap();
/// assert_eq!(result.pairs, 2);
/// assert_eq!(result.asymmetry_ratio, 0.0);
/// assert!((result.correlation - 1.0).abs() < 1e-12);
/// ```
pub fn symmetry(profile: &Profile, center: f64) -> Result<Symmetry> {
    let values = profile.values();
    let middle = profile.coordinates().find_nearest(center)?;

    // both halves ordered outward from the center
    let left: Vec<f64> = values[..middle].iter().rev().copied().collect();
    let right: Vec<f64> = values[middle + 1..].to_vec();
    let pairs = left.len().min(right.len());

    if pairs == 0 {
        return Err(Error::UtilsError(
            dosemap_utils::Error::BelowMinimumSliceLength {
                length: values.len(),
                minimum_required: 3,
            },
        ));
    }

    let (left, right) = (&left[..pairs], &right[..pairs]);
    let (left_mean, left_std) = mean_std(left);
    let (right_mean, right_std) = mean_std(right);

    let average = 0.5 * (left_mean + right_mean);
    let asymmetry_ratio = if average > 0.0 {
        (left_mean - right_mean).abs() / average
    } else {
        0.0
    };

    Ok(Symmetry {
        center: profile.points[middle].0,
        pairs,
        left_mean,
        right_mean,
        left_std,
        right_std,
        asymmetry_ratio,
        correlation: pearson(left, right),
    })
}

/// Pearson correlation coefficient, zero when undefined
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, std_a) = mean_std(a);
    let (mean_b, std_b) = mean_std(b);

    if !(std_a > 0.0 && std_b > 0.0) {
        return 0.0;
    }

    let covariance = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / a.len() as f64;

    covariance / (std_a * std_b)
}
