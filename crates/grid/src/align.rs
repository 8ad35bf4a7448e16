//! Bring grids of different resolution onto a common geometry

// crate modules
use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::grid::Grid;

// dosemap modules
use dosemap_utils::{f, SliceExt};

// external crates
use log::debug;
use serde::Serialize;

/// Relative tolerance on the axis extents of two grids being aligned
pub const EXTENT_TOLERANCE: f64 = 1e-6;

/// How a source grid is brought onto the geometry of a reference
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Shapes already match, values are used as they are
    Identity,
    /// Values are resampled onto the reference bin centers
    ScaleResample,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Alignment::Identity => write!(f, "identity"),
            Alignment::ScaleResample => write!(f, "scale-resample"),
        }
    }
}

/// Decide how `source` should be aligned to `reference`
///
/// Both grids must cover the same physical extent on each axis, to a relative
/// tolerance of [EXTENT_TOLERANCE]. Anything else is
/// [Error::UnsupportedGeometry], because no translation or cropping is
/// attempted.
///
/// ```rust
/// # use dosemap_grid::{alignment_strategy, uniform_edges, Alignment, Grid};
/// let fine = Grid::filled(1.0, uniform_edges(0.0, 4.0, 8), uniform_edges(0.0, 4.0, 8)).unwrap();
/// let coarse = Grid::filled(1.0, uniform_edges(0.0, 4.0, 4), uniform_edges(0.0, 4.0, 4)).unwrap();
/// let shifted =
///     Grid::filled(1.0, uniform_edges(1.0, 5.0, 4), uniform_edges(0.0, 4.0, 4)).unwrap();
///
/// assert_eq!(alignment_strategy(&coarse, &coarse), Ok(Alignment::Identity));
/// assert_eq!(alignment_strategy(&fine, &coarse), Ok(Alignment::ScaleResample));
/// assert!(alignment_strategy(&shifted, &coarse).is_err());
/// ```
pub fn alignment_strategy(source: &Grid, reference: &Grid) -> Result<Alignment> {
    for axis in [Axis::X, Axis::Y] {
        let (s0, s1) = source.extent(axis);
        let (r0, r1) = reference.extent(axis);
        let tolerance = EXTENT_TOLERANCE * (r1 - r0).abs();

        if (s0 - r0).abs() > tolerance || (s1 - r1).abs() > tolerance {
            return Err(Error::UnsupportedGeometry(f!(
                "{axis} extents differ (source [{s0}, {s1}], reference [{r0}, {r1}] mm)"
            )));
        }
    }

    if source.same_shape(reference) {
        Ok(Alignment::Identity)
    } else {
        Ok(Alignment::ScaleResample)
    }
}

/// Return `source` on the geometry of `reference`
///
/// Grids of equal shape are returned unchanged. Otherwise the source is
/// resampled with separable linear interpolation, first along x then along
/// y, from its own bin centers onto the bin centers of the reference. Values
/// beyond the outermost source centers take the nearest edge value. The
/// result always carries the reference edges when resampled.
///
/// Resampling interpolates densities rather than redistributing content, so
/// the sum of the grid is generally not preserved.
///
/// ```rust
/// # use dosemap_grid::{align, uniform_edges, Grid};
/// // A linear ramp along x stays linear after resampling
/// let fine = Grid::new(
///     (0..4).map(|i| vec![i as f64; 2]).collect(),
///     uniform_edges(0.0, 4.0, 4),
///     uniform_edges(0.0, 2.0, 2),
/// )
/// .unwrap();
/// let coarse = Grid::filled(0.0, uniform_edges(0.0, 4.0, 2), uniform_edges(0.0, 2.0, 1)).unwrap();
///
/// let aligned = align(&fine, &coarse).unwrap();
/// assert_eq!(aligned.shape(), (2, 1));
/// assert_eq!(aligned.values(), &[0.5, 2.5]);
/// ```
pub fn align(source: &Grid, reference: &Grid) -> Result<Grid> {
    let strategy = alignment_strategy(source, reference)?;
    debug!(
        "Aligning {:?} grid to {:?} by {strategy}",
        source.shape(),
        reference.shape()
    );

    match strategy {
        Alignment::Identity => Ok(source.clone()),
        Alignment::ScaleResample => resample(source, reference),
    }
}

/// Separable linear resampling of `source` onto the bin centers of `reference`
fn resample(source: &Grid, reference: &Grid) -> Result<Grid> {
    let (src_nx, src_ny) = source.shape();
    let (ref_nx, ref_ny) = reference.shape();

    let src_x = source.x_centers();
    let src_y = source.y_centers();
    let ref_x = reference.x_centers();
    let ref_y = reference.y_centers();

    // along x for every source column, giving [ref_nx, src_ny]
    let mut partial = vec![0.0; ref_nx * src_ny];
    for j in 0..src_ny {
        let column: Vec<f64> = (0..src_nx)
            .map(|i| source.values()[source.index(i, j)])
            .collect();
        for (i, x) in ref_x.iter().enumerate() {
            partial[i * src_ny + j] = src_x.interpolate_linear(&column, *x)?;
        }
    }

    // along y for every resampled row, giving [ref_nx, ref_ny]
    let mut values = Vec::with_capacity(ref_nx * ref_ny);
    for row in partial.chunks(src_ny) {
        for y in &ref_y {
            values.push(src_y.interpolate_linear(row, *y)?);
        }
    }

    Grid::from_flat(
        (ref_nx, ref_ny),
        values,
        reference.x_edges().to_vec(),
        reference.y_edges().to_vec(),
    )
}
