//! Voxel density maps built from a [MaterialSpec]

// crate modules
use crate::error::{Error, Result};
use crate::grid::{validate_edges, Grid};
use crate::material::MaterialSpec;
use crate::region::{Region, Shape};

// dosemap modules
use dosemap_utils::SliceExt;

// external crates
use itertools::iproduct;
use log::{debug, trace, warn};

/// Per-voxel mass density in g/cm³ on the geometry of a [Grid]
///
/// Built with [build_density_map()] or [DensityMap::for_grid()]. The layout
/// is the same flat row-major order as [Grid], so the density of bin `(i, j)`
/// is at `i * ny + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMap {
    densities: Vec<f64>,
    shape: (usize, usize),
    default_density: f64,
}

impl DensityMap {
    /// Build the density map matching the geometry of an existing grid
    pub fn for_grid(grid: &Grid, spec: &MaterialSpec) -> Result<Self> {
        build_density_map(grid.shape(), grid.x_edges(), grid.y_edges(), spec)
    }

    /// Number of bins in (x, y)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Flat row-major densities \[g/cm³\]
    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    /// Density of bin (i, j), or `None` if out of range
    pub fn density(&self, i: usize, j: usize) -> Option<f64> {
        let (nx, ny) = self.shape;
        (i < nx && j < ny).then(|| self.densities[i * ny + j])
    }

    /// The background density of the material specification
    pub fn default_density(&self) -> f64 {
        self.default_density
    }

    /// Number of voxels that cannot be used for dose conversion as-is
    ///
    /// Counts densities that are zero, negative, or not finite.
    pub fn non_positive_count(&self) -> usize {
        self.densities
            .iter()
            .filter(|d| !(d.is_finite() && **d > 0.0))
            .count()
    }
}

/// Build a density map for the grid geometry from a material specification
///
/// Every voxel starts at the default density. Regions are then applied in
/// declaration order, and a voxel claimed by an earlier region is never
/// overwritten by a later one.
///
/// Rectangles are converted to index ranges by flooring their bounds onto the
/// bin edges, so a rectangle `[x_min, x_max]` covers bins
/// `floor(x_min)..floor(x_max)` with both ends clamped to the grid. All other
/// shapes select voxels by their bin centers.
///
/// ```rust
/// # use dosemap_grid::{build_density_map, uniform_edges, MaterialSpec, Region};
/// let edges = uniform_edges(0.0, 4.0, 4);
/// let spec = MaterialSpec::homogeneous("Bone_Hetero", 1.0)
///     .with_region(Region::rectangle("insert", 2.0, 4.0, 0.0, 4.0), 1.85);
///
/// let map = build_density_map((4, 4), &edges, &edges, &spec).unwrap();
///
/// assert_eq!(map.density(1, 3), Some(1.0));
/// assert_eq!(map.density(2, 0), Some(1.85));
/// assert_eq!(map.density(3, 3), Some(1.85));
/// ```
///
/// Inconsistent geometry is rejected before anything else:
///
/// ```rust
/// # use dosemap_grid::{build_density_map, uniform_edges, Error, MaterialSpec};
/// let edges = uniform_edges(0.0, 4.0, 4);
/// let result = build_density_map((4, 3), &edges, &edges, &MaterialSpec::water());
/// assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
/// ```
pub fn build_density_map(
    shape: (usize, usize),
    x_edges: &[f64],
    y_edges: &[f64],
    spec: &MaterialSpec,
) -> Result<DensityMap> {
    let expected = validate_edges(x_edges, y_edges)?;
    if shape != expected {
        return Err(Error::ShapeMismatch {
            expected,
            found: shape,
        });
    }
    spec.validate()?;

    let (nx, ny) = shape;
    let mut densities = vec![spec.default_density; nx * ny];
    let mut claimed = vec![false; nx * ny];

    debug!("Building density map for \"{}\" on {nx} x {ny} voxels", spec.name);

    for material_region in &spec.regions {
        let region = &material_region.region;
        let voxels = region_voxels(region, x_edges, y_edges);

        if voxels.is_empty() {
            warn!("Region \"{}\" does not cover any voxels", region.name);
            continue;
        }

        let mut overlapping = 0;
        for idx in &voxels {
            if claimed[*idx] {
                overlapping += 1;
            } else {
                claimed[*idx] = true;
                densities[*idx] = material_region.density;
            }
        }

        if overlapping > 0 {
            warn!(
                "Region \"{}\" overlaps earlier regions on {overlapping} voxels, keeping those",
                region.name
            );
        }

        trace!(
            "Region \"{}\" set {} voxels to {} g/cm3",
            region.name,
            voxels.len() - overlapping,
            material_region.density
        );
    }

    Ok(DensityMap {
        densities,
        shape,
        default_density: spec.default_density,
    })
}

/// Flat indices of every voxel covered by a region
fn region_voxels(region: &Region, x_edges: &[f64], y_edges: &[f64]) -> Vec<usize> {
    let ny = y_edges.len() - 1;

    match region.shape {
        Shape::Rectangle {
            x_min,
            x_max,
            y_min,
            y_max,
        } => {
            let (i0, i1) = (x_edges.find_bin_floor(x_min), x_edges.find_bin_floor(x_max));
            let (j0, j1) = (y_edges.find_bin_floor(y_min), y_edges.find_bin_floor(y_max));
            debug!(
                "Region \"{}\" maps to x bins [{i0}, {i1}), y bins [{j0}, {j1})",
                region.name
            );
            iproduct!(i0..i1, j0..j1).map(|(i, j)| i * ny + j).collect()
        }
        shape => iproduct!(x_edges.midpoints(), y_edges.midpoints())
            .enumerate()
            .filter(|(_, (x, y))| shape.contains(*x, *y))
            .map(|(idx, _)| idx)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::uniform_edges;

    #[test]
    fn rectangle_inside_single_bin_is_empty() {
        let edges = uniform_edges(0.0, 4.0, 4);
        let region = Region::rectangle("sliver", 2.2, 2.8, 0.0, 4.0);
        assert!(region_voxels(&region, &edges, &edges).is_empty());
    }

    #[test]
    fn rectangle_clipped_to_grid() {
        let edges = uniform_edges(0.0, 4.0, 4);
        let region = Region::rectangle("wide", -10.0, 10.0, 3.0, 10.0);
        assert_eq!(region_voxels(&region, &edges, &edges), vec![3, 7, 11, 15]);
    }

    #[test]
    fn annulus_uses_centers() {
        let edges = uniform_edges(-2.0, 2.0, 4);
        let region = Region::disc("core", 0.0, 0.0, 1.0);
        // only the four centers at (+-0.5, +-0.5) are within r < 1
        assert_eq!(region_voxels(&region, &edges, &edges), vec![5, 6, 9, 10]);
    }

    #[test]
    fn non_positive_count() {
        let edges = uniform_edges(0.0, 2.0, 2);
        let spec =
            MaterialSpec::water().with_region(Region::rectangle("void", 0.0, 1.0, 0.0, 2.0), 0.0);
        let map = build_density_map((2, 2), &edges, &edges, &spec).unwrap();
        assert_eq!(map.non_positive_count(), 2);
        assert_eq!(map.densities(), &[0.0, 0.0, 1.0, 1.0]);
    }
}
