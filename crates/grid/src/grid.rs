//! Module for grid-related data and implementations

// crate modules
use crate::axis::Axis;
use crate::error::{Error, Result};

// dosemap modules
use dosemap_utils::{f, SliceExt, ValueExt};

/// Anything that can provide a binned 2D histogram
///
/// The on-disk container is not a concern of this crate. Readers only need to
/// expose a flat row-major array of values (`[nx, ny]`, with `y` varying
/// fastest) and the bin edges of both axes.
///
/// ```rust
/// # use dosemap_grid::{Grid, HistogramSource};
/// struct Deposition {
///     values: Vec<f64>,
///     x: Vec<f64>,
///     y: Vec<f64>,
/// }
///
/// impl HistogramSource for Deposition {
///     fn shape(&self) -> (usize, usize) {
///         (self.x.len() - 1, self.y.len() - 1)
///     }
///     fn values(&self) -> &[f64] {
///         &self.values
///     }
///     fn x_edges(&self) -> &[f64] {
///         &self.x
///     }
///     fn y_edges(&self) -> &[f64] {
///         &self.y
///     }
/// }
///
/// let source = Deposition {
///     values: vec![1.0, 2.0, 3.0, 4.0],
///     x: vec![0.0, 1.0, 2.0],
///     y: vec![0.0, 1.0, 2.0],
/// };
/// let grid = Grid::from_source(&source).unwrap();
/// assert_eq!(grid.shape(), (2, 2));
/// ```
pub trait HistogramSource {
    /// Number of bins in (x, y)
    fn shape(&self) -> (usize, usize);
    /// Flat row-major bin contents
    fn values(&self) -> &[f64];
    /// Bin edges along x \[mm\]
    fn x_edges(&self) -> &[f64];
    /// Bin edges along y \[mm\]
    fn y_edges(&self) -> &[f64];
}

/// Immutable 2D scalar field with explicit bin edges
///
/// This is the common data carrier for everything in the toolkit. Energy
/// deposition, densities, doses, differences and ratios all share the same
/// layout, and every transformation returns a new [Grid] rather than
/// modifying one in place.
///
/// ## Layout
///
/// Values are stored flat in row-major order for a `[nx, ny]` array, so the
/// value for bin `(i, j)` lives at `i * ny + j`. See [Grid::index()].
///
/// Edges are in millimetres, strictly increasing, with `nx + 1` and `ny + 1`
/// entries. Bin centers are always derived from the edges and never stored.
///
/// ## Units
///
/// No unit is stored. The values are in whatever unit the source reported
/// (usually deposited energy). Absorbed dose is distinguished by type instead,
/// see [DoseGrid](crate::DoseGrid).
///
/// ## Examples
///
/// ```rust
/// # use dosemap_grid::{Axis, Grid};
/// let grid = Grid::new(
///     vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
///     vec![-1.0, 0.0, 1.0],
///     vec![0.0, 2.0, 4.0, 6.0],
/// )
/// .unwrap();
///
/// assert_eq!(grid.shape(), (2, 3));
/// assert_eq!(grid.get(1, 2), Some(6.0));
/// assert_eq!(grid.centers(Axis::X), vec![-0.5, 0.5]);
/// assert_eq!(grid.extent(Axis::Y), (0.0, 6.0));
/// assert_eq!(grid.sum(), 21.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Vec<f64>,
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
}

// Construction
impl Grid {
    /// Build a grid from nested rows, one row per x bin
    ///
    /// Fails with [Error::ShapeMismatch] if the array is not
    /// `[len(x_edges) - 1, len(y_edges) - 1]` (including ragged rows), and
    /// with [Error::NonMonotonicEdges] if either edge array is not strictly
    /// increasing.
    pub fn new(rows: Vec<Vec<f64>>, x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        let expected = validate_edges(&x_edges, &y_edges)?;

        // report the first row that disagrees, or the row count
        let width = rows.first().map_or(0, |r| r.len());
        let found = match rows.iter().find(|r| r.len() != expected.1) {
            Some(row) => (rows.len(), row.len()),
            None => (rows.len(), width),
        };

        if found != expected {
            return Err(Error::ShapeMismatch { expected, found });
        }

        Ok(Self {
            values: rows.into_iter().flatten().collect(),
            x_edges,
            y_edges,
        })
    }

    /// Build a grid from a flat row-major array and its declared shape
    ///
    /// The declared shape must agree with both the edges and the number of
    /// values, otherwise an [Error::ShapeMismatch] is returned.
    pub fn from_flat(
        shape: (usize, usize),
        values: Vec<f64>,
        x_edges: Vec<f64>,
        y_edges: Vec<f64>,
    ) -> Result<Self> {
        let expected = validate_edges(&x_edges, &y_edges)?;

        if shape != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: shape,
            });
        }

        if values.len() != shape.0 * shape.1 {
            return Err(Error::ShapeMismatch {
                expected,
                found: flat_shape(values.len(), shape.1),
            });
        }

        Ok(Self {
            values,
            x_edges,
            y_edges,
        })
    }

    /// Build a grid from anything implementing [HistogramSource]
    pub fn from_source<S: HistogramSource>(source: &S) -> Result<Self> {
        Self::from_flat(
            source.shape(),
            source.values().to_vec(),
            source.x_edges().to_vec(),
            source.y_edges().to_vec(),
        )
    }

    /// A grid with every bin set to `fill`
    ///
    /// ```rust
    /// # use dosemap_grid::{uniform_edges, Grid};
    /// let grid =
    ///     Grid::filled(10.0, uniform_edges(0.0, 4.0, 4), uniform_edges(0.0, 4.0, 4)).unwrap();
    /// assert_eq!(grid.len(), 16);
    /// assert_eq!(grid.sum(), 160.0);
    /// ```
    pub fn filled(fill: f64, x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        let (nx, ny) = validate_edges(&x_edges, &y_edges)?;
        Ok(Self {
            values: vec![fill; nx * ny],
            x_edges,
            y_edges,
        })
    }
}

// Geometry
impl Grid {
    /// Number of bins in (x, y)
    pub fn shape(&self) -> (usize, usize) {
        (self.nx(), self.ny())
    }

    /// Number of bins along x
    pub fn nx(&self) -> usize {
        self.x_edges.len() - 1
    }

    /// Number of bins along y
    pub fn ny(&self) -> usize {
        self.y_edges.len() - 1
    }

    /// Total number of bins
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed grid, provided for completeness
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bin edges along x \[mm\]
    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    /// Bin edges along y \[mm\]
    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    /// Bin edges for either axis \[mm\]
    pub fn edges(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x_edges,
            Axis::Y => &self.y_edges,
        }
    }

    /// Bin centers along x \[mm\]
    pub fn x_centers(&self) -> Vec<f64> {
        self.x_edges.midpoints()
    }

    /// Bin centers along y \[mm\]
    pub fn y_centers(&self) -> Vec<f64> {
        self.y_edges.midpoints()
    }

    /// Bin centers for either axis \[mm\]
    pub fn centers(&self, axis: Axis) -> Vec<f64> {
        self.edges(axis).midpoints()
    }

    /// Bin widths for either axis \[mm\]
    pub fn bin_widths(&self, axis: Axis) -> Vec<f64> {
        self.edges(axis).windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Lowest and highest edge of an axis \[mm\]
    pub fn extent(&self, axis: Axis) -> (f64, f64) {
        let edges = self.edges(axis);
        // at least two edges are guaranteed on construction
        (edges[0], edges[edges.len() - 1])
    }

    /// True if both grids have the same number of bins along each axis
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.shape() == other.shape()
    }

    /// True if both grids have identical bin edges
    pub fn same_geometry(&self, other: &Grid) -> bool {
        self.x_edges == other.x_edges && self.y_edges == other.y_edges
    }

    /// Volume of a single voxel in cm³ for a grid of constant bin pitch
    ///
    /// The grid is 2D, so the depth of the scoring slab is needed in
    /// millimetres. Grids with varying bin widths have no single voxel volume
    /// and return [Error::UnsupportedGeometry].
    ///
    /// ```rust
    /// # use dosemap_grid::{uniform_edges, Grid};
    /// // 1 x 1 mm bins in a 10 mm thick slab
    /// let edges = uniform_edges(-150.0, 150.0, 300);
    /// let grid = Grid::filled(0.0, edges.clone(), edges).unwrap();
    /// let volume = grid.uniform_voxel_volume_cm3(10.0).unwrap();
    /// assert!((volume - 0.01).abs() < 1e-12);
    /// ```
    pub fn uniform_voxel_volume_cm3(&self, depth_mm: f64) -> Result<f64> {
        let dx = uniform_width(&self.bin_widths(Axis::X)).ok_or_else(|| {
            Error::UnsupportedGeometry("x bins do not have a constant width".to_string())
        })?;
        let dy = uniform_width(&self.bin_widths(Axis::Y)).ok_or_else(|| {
            Error::UnsupportedGeometry("y bins do not have a constant width".to_string())
        })?;
        crate::dose::voxel_volume_cm3(dx, dy, depth_mm)
    }
}

// Values and indexing helpers
impl Grid {
    /// Flat row-major bin contents
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the grid, keeping only the flat values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Value of bin (i, j), or `None` if out of range
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.nx() && j < self.ny() {
            Some(self.values[self.index(i, j)])
        } else {
            None
        }
    }

    /// Find the flat index from (i, j) indices
    ///
    /// ```rust
    /// # use dosemap_grid::{uniform_edges, Grid};
    /// let grid =
    ///     Grid::filled(0.0, uniform_edges(0.0, 2.0, 2), uniform_edges(0.0, 3.0, 3)).unwrap();
    /// assert_eq!(grid.index(1, 2), 5);
    /// assert_eq!(grid.index_to_ij(5), (1, 2));
    /// ```
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.ny() + j
    }

    /// Find the (i, j) indices for a flat index
    ///
    /// The reverse of [index()](Grid::index).
    pub fn index_to_ij(&self, idx: usize) -> (usize, usize) {
        (idx / self.ny(), idx % self.ny())
    }

    /// Values along `axis` with the other axis held at bin `fixed`
    ///
    /// For example `lane(Axis::X, j)` is the horizontal line of values at y bin
    /// `j`. Returns `None` when `fixed` is out of range.
    pub fn lane(&self, axis: Axis, fixed: usize) -> Option<Vec<f64>> {
        match axis {
            Axis::X if fixed < self.ny() => Some(
                (0..self.nx())
                    .map(|i| self.values[self.index(i, fixed)])
                    .collect(),
            ),
            Axis::Y if fixed < self.nx() => {
                let start = self.index(fixed, 0);
                Some(self.values[start..start + self.ny()].to_vec())
            }
            _ => None,
        }
    }

    /// Sum of all bin contents
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

// Derived grids, all with the same geometry
impl Grid {
    /// New grid with the same geometry and different values
    ///
    /// The number of values must match exactly.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Grid> {
        if values.len() != self.len() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                found: flat_shape(values.len(), self.ny()),
            });
        }

        Ok(Grid {
            values,
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        })
    }

    /// Apply a function to every bin
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Grid {
        Grid {
            values: self.values.iter().map(|v| f(*v)).collect(),
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        }
    }

    /// Combine two grids of the same shape bin by bin
    ///
    /// The result takes the geometry of `self`. Fails with
    /// [Error::ShapeMismatch] if the shapes differ.
    ///
    /// ```rust
    /// # use dosemap_grid::{uniform_edges, Grid};
    /// let a = Grid::filled(2.0, uniform_edges(0.0, 2.0, 2), uniform_edges(0.0, 2.0, 2)).unwrap();
    /// let b = Grid::filled(3.0, uniform_edges(0.0, 2.0, 2), uniform_edges(0.0, 2.0, 2)).unwrap();
    /// let product = a.zip_map(&b, |x, y| x * y).unwrap();
    /// assert_eq!(product.values(), &[6.0; 4]);
    /// ```
    pub fn zip_map<F: Fn(f64, f64) -> f64>(&self, other: &Grid, f: F) -> Result<Grid> {
        if !self.same_shape(other) {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }

        Ok(Grid {
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| f(*a, *b))
                .collect(),
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        })
    }

    /// Multiply all bin contents by a constant factor
    ///
    /// ```rust
    /// # use dosemap_grid::{uniform_edges, Grid};
    /// let grid =
    ///     Grid::filled(4.0, uniform_edges(0.0, 1.0, 1), uniform_edges(0.0, 1.0, 1)).unwrap();
    /// assert_eq!(grid.scale(0.5).values(), &[2.0]);
    /// ```
    pub fn scale(&self, factor: f64) -> Grid {
        self.map(|v| v * factor)
    }
}

impl HistogramSource for Grid {
    fn shape(&self) -> (usize, usize) {
        Grid::shape(self)
    }

    fn values(&self) -> &[f64] {
        &self.values
    }

    fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (x0, x1) = self.extent(Axis::X);
        let (y0, y1) = self.extent(Axis::Y);

        let mut s = f!(" > Grid [{} x {}]\n", self.nx(), self.ny());
        s += &f!(
            "x : {:>10} - {:>10} mm ({} bins)\n",
            x0.sci(2, 2),
            x1.sci(2, 2),
            self.nx()
        );
        s += &f!(
            "y : {:>10} - {:>10} mm ({} bins)\n",
            y0.sci(2, 2),
            y1.sci(2, 2),
            self.ny()
        );
        s += &f!("sum: {}", self.sum().sci(5, 2));
        write!(f, "{}", s)
    }
}

/// Evenly spaced bin edges from `min` to `max` for a number of bins
///
/// The first and last edges are exactly `min` and `max`.
///
/// ```rust
/// # use dosemap_grid::uniform_edges;
/// assert_eq!(uniform_edges(0.0, 4.0, 4), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(uniform_edges(-1.0, 1.0, 2), vec![-1.0, 0.0, 1.0]);
/// ```
pub fn uniform_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    if bins == 0 {
        return vec![min];
    }

    let step = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|k| min + k as f64 * step).collect();
    edges.push(max);
    edges
}

/// Check both edge arrays and return the implied shape
pub(crate) fn validate_edges(x_edges: &[f64], y_edges: &[f64]) -> Result<(usize, usize)> {
    for (axis, edges) in [(Axis::X, x_edges), (Axis::Y, y_edges)] {
        if edges.len() < 2 {
            return Err(Error::TooFewEdges {
                axis,
                found: edges.len(),
            });
        }
        if !edges.is_strictly_increasing() {
            return Err(Error::NonMonotonicEdges { axis });
        }
    }
    Ok((x_edges.len() - 1, y_edges.len() - 1))
}

/// Best guess at a shape for a flat array, for error reporting only
fn flat_shape(len: usize, ny: usize) -> (usize, usize) {
    if ny > 0 && len % ny == 0 {
        (len / ny, ny)
    } else {
        (len, 1)
    }
}

/// The common width if every width agrees to a relative 1e-9
fn uniform_width(widths: &[f64]) -> Option<f64> {
    let first = *widths.first()?;
    widths
        .iter()
        .all(|w| (w - first).abs() <= 1e-9 * first.abs())
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_shape_guess() {
        assert_eq!(flat_shape(12, 4), (3, 4));
        assert_eq!(flat_shape(13, 4), (13, 1));
        assert_eq!(flat_shape(5, 0), (5, 1));
    }

    #[test]
    fn uniform_width_detection() {
        assert_eq!(uniform_width(&[1.0, 1.0, 1.0]), Some(1.0));
        assert_eq!(uniform_width(&[1.0, 2.0]), None);
        assert_eq!(uniform_width(&[]), None);
    }

    #[test]
    fn lane_out_of_range() {
        let grid =
            Grid::filled(1.0, uniform_edges(0.0, 2.0, 2), uniform_edges(0.0, 3.0, 3)).unwrap();
        assert!(grid.lane(Axis::X, 3).is_none());
        assert!(grid.lane(Axis::Y, 2).is_none());
        assert_eq!(grid.lane(Axis::X, 2), Some(vec![1.0, 1.0]));
    }
}
