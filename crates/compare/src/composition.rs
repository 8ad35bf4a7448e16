//! Primary and secondary composition of the deposited energy or dose

// crate modules
use crate::error::{Error, Result};

// dosemap modules
use dosemap_grid::{Grid, Region};
use dosemap_utils::ValueExt;

// external crates
use itertools::izip;
use log::{trace, warn};
use serde::Serialize;

/// Relative tolerance on `primary + secondary` against the total
pub const COMPOSITION_TOLERANCE: f64 = 1e-6;

/// Split of a region into primary and secondary contributions
///
/// Sums are in the unit of the input grids and skip NaN voxels. The shares
/// are percentages of the total, both `0.0` when the total is not positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionComposition {
    /// Name of the region
    pub region: String,
    /// Number of voxels in the region
    pub count: usize,
    /// Voxels with a positive total
    pub populated: usize,
    pub primary: f64,
    pub secondary: f64,
    pub total: f64,
    pub pct_primary: f64,
    pub pct_secondary: f64,
    /// Mean over voxels with a positive primary contribution, `0.0` if none
    pub mean_primary: f64,
    /// Mean over voxels with a positive secondary contribution, `0.0` if none
    pub mean_secondary: f64,
}

impl RegionComposition {
    /// `total - (primary + secondary)`
    pub fn residual(&self) -> f64 {
        self.total - (self.primary + self.secondary)
    }

    /// True if primary and secondary add up to the total within a relative
    /// tolerance
    ///
    /// A region with nothing deposited is consistent only if all three sums
    /// are zero.
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let scale = self.total.abs().max(self.primary.abs() + self.secondary.abs());
        self.residual().abs() <= tolerance * scale
    }
}

impl std::fmt::Display for RegionComposition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<24} primary {:>11} ({:>6.2}%) | secondary {:>11} ({:>6.2}%) | total {:>11}",
            self.region,
            self.primary.sci(4, 2),
            self.pct_primary,
            self.secondary.sci(4, 2),
            self.pct_secondary,
            self.total.sci(4, 2),
        )
    }
}

/// Primary and secondary composition of one region
///
/// All three grids must share a shape, otherwise [Error::ShapeMismatch] is
/// returned against the shape of `primary`. The region is evaluated on the
/// bin centers of `total`. Totals that do not match `primary + secondary`
/// within [COMPOSITION_TOLERANCE] are logged as a warning.
///
/// ```rust
/// # use dosemap_compare::composition;
/// # use dosemap_grid::{uniform_edges, Grid, Region};
/// let edges = uniform_edges(0.0, 2.0, 2);
/// let primary = Grid::filled(3.0, edges.clone(), edges).unwrap();
/// let secondary = primary.map(|_| 1.0);
/// let total = primary.map(|_| 4.0);
///
/// let split = composition(&primary, &secondary, &total, &Region::everywhere("all")).unwrap();
/// assert_eq!(split.total, 16.0);
/// assert_eq!(split.pct_primary, 75.0);
/// assert_eq!(split.pct_secondary, 25.0);
/// assert!(split.is_consistent(1e-12));
/// ```
pub fn composition(
    primary: &Grid,
    secondary: &Grid,
    total: &Grid,
    region: &Region,
) -> Result<RegionComposition> {
    for other in [secondary, total] {
        if !primary.same_shape(other) {
            return Err(Error::ShapeMismatch {
                expected: primary.shape(),
                found: other.shape(),
            });
        }
    }

    let selected = region.mask(total);

    let mut count = 0;
    let mut populated = 0;
    let (mut p_sum, mut s_sum, mut t_sum) = (0.0_f64, 0.0_f64, 0.0_f64);
    let (mut p_hits, mut s_hits) = (0usize, 0usize);
    let (mut p_positive, mut s_positive) = (0.0_f64, 0.0_f64);

    for (p, s, t, _) in izip!(primary.values(), secondary.values(), total.values(), &selected)
        .filter(|(_, _, _, m)| **m)
    {
        count += 1;
        if !p.is_nan() {
            p_sum += *p;
        }
        if !s.is_nan() {
            s_sum += *s;
        }
        if !t.is_nan() {
            t_sum += *t;
        }
        if *t > 0.0 {
            populated += 1;
        }
        if *p > 0.0 {
            p_hits += 1;
            p_positive += *p;
        }
        if *s > 0.0 {
            s_hits += 1;
            s_positive += *s;
        }
    }

    let (pct_primary, pct_secondary) = if t_sum > 0.0 {
        (100.0 * p_sum / t_sum, 100.0 * s_sum / t_sum)
    } else {
        (0.0, 0.0)
    };

    let mean = |sum: f64, hits: usize| if hits == 0 { 0.0 } else { sum / hits as f64 };

    let result = RegionComposition {
        region: region.name.clone(),
        count,
        populated,
        primary: p_sum,
        secondary: s_sum,
        total: t_sum,
        pct_primary,
        pct_secondary,
        mean_primary: mean(p_positive, p_hits),
        mean_secondary: mean(s_positive, s_hits),
    };

    if !result.is_consistent(COMPOSITION_TOLERANCE) {
        warn!(
            "Primary and secondary do not add up to the total in \"{}\" (residual {:e})",
            region.name,
            result.residual()
        );
    }
    trace!("Region \"{}\": {:.2}% primary", region.name, pct_primary);

    Ok(result)
}

/// Composition of every region in order
pub fn composition_all(
    primary: &Grid,
    secondary: &Grid,
    total: &Grid,
    regions: &[Region],
) -> Result<Vec<RegionComposition>> {
    regions
        .iter()
        .map(|region| composition(primary, secondary, total, region))
        .collect()
}
