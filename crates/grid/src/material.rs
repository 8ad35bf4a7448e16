//! Material definitions: a default density plus regional overrides

// crate modules
use crate::error::{Error, Result};
use crate::region::Region;

// external crates
use serde::{Deserialize, Serialize};

/// Reference densities in g/cm³ for the materials compared in practice
///
/// These are static reference values, not derived from composition tables.
pub mod density {
    /// Liquid water
    pub const WATER: f64 = 1.0;
    /// Standard bone used for heterogeneity inserts
    pub const BONE: f64 = 1.85;
    /// Compact bone (ICRU)
    pub const BONE_COMPACT_ICRU: f64 = 1.92;
    /// Inflated MIRD lung
    pub const LUNG_MIRD: f64 = 0.2958;
    /// Compressed ICRP lung
    pub const LUNG_ICRP: f64 = 1.05;
}

/// A regional density override within a [MaterialSpec]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MaterialRegion {
    /// Where the override applies
    pub region: Region,
    /// Density inside the region \[g/cm³\]
    pub density: f64,
}

/// A named material configuration for density map construction
///
/// Every voxel takes `default_density` unless it is covered by one of the
/// `regions`. Regions are applied in declaration order and **the first
/// declared region wins**: where regions overlap, a later region never
/// overwrites voxels already claimed by an earlier one.
///
/// ## Examples
///
/// A homogeneous phantom only needs the default density:
///
/// ```rust
/// # use dosemap_grid::MaterialSpec;
/// let water = MaterialSpec::water();
/// assert_eq!(water.default_density, 1.0);
/// assert!(water.regions.is_empty());
/// ```
///
/// A heterogeneous phantom adds an insert on top of the background:
///
/// ```rust
/// # use dosemap_grid::{density, MaterialSpec, Region};
/// let spec = MaterialSpec::homogeneous("Bone_Hetero", density::WATER)
///     .with_region(Region::centered_square("bone", 40.0, 0.0, 60.0), density::BONE);
///
/// assert_eq!(spec.regions.len(), 1);
/// assert_eq!(spec.regions[0].density, 1.85);
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MaterialSpec {
    /// Case name used in reports, e.g. "Bone_Hetero"
    pub name: String,
    /// Density of everything outside the regions \[g/cm³\]
    pub default_density: f64,
    /// Ordered regional overrides
    #[serde(default)]
    pub regions: Vec<MaterialRegion>,
}

impl MaterialSpec {
    /// Uniform material with no regional overrides
    pub fn homogeneous(name: &str, default_density: f64) -> Self {
        Self {
            name: name.to_string(),
            default_density,
            regions: Vec::new(),
        }
    }

    /// Homogeneous water, the usual reference case
    pub fn water() -> Self {
        Self::homogeneous("Water_Homo", density::WATER)
    }

    /// Water background with a single insert of another density
    ///
    /// ```rust
    /// # use dosemap_grid::{density, MaterialSpec, Region};
    /// let insert = Region::centered_square("lung", 40.0, 0.0, 60.0);
    /// let spec = MaterialSpec::water_with_insert("Lung_Hetero", insert, density::LUNG_MIRD);
    /// assert_eq!(spec.default_density, 1.0);
    /// assert_eq!(spec.regions[0].density, 0.2958);
    /// ```
    pub fn water_with_insert(name: &str, insert: Region, insert_density: f64) -> Self {
        Self::homogeneous(name, density::WATER).with_region(insert, insert_density)
    }

    /// Append a regional override, keeping declaration order
    pub fn with_region(mut self, region: Region, density: f64) -> Self {
        self.regions.push(MaterialRegion { region, density });
        self
    }

    /// True if there are no regional overrides
    pub fn is_homogeneous(&self) -> bool {
        self.regions.is_empty()
    }

    /// Make sure the default density is usable and every region is well formed
    ///
    /// Regional densities are deliberately not rejected here. A non-positive
    /// regional density is recovered during dose conversion by substituting
    /// the default density, see
    /// [DoseConverter](crate::DoseConverter::energy_to_dose).
    pub fn validate(&self) -> Result<()> {
        if !(self.default_density.is_finite() && self.default_density > 0.0) {
            return Err(Error::InvalidDensity {
                material: self.name.clone(),
                density: self.default_density,
            });
        }

        for material_region in &self.regions {
            material_region.region.validate()?;
        }

        Ok(())
    }
}

impl Default for MaterialSpec {
    fn default() -> Self {
        Self::water()
    }
}

impl std::fmt::Display for MaterialSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} [{} g/cm3]", self.name, self.default_density)?;
        for r in &self.regions {
            write!(f, "\n  - {} [{} g/cm3]", r.region, r.density)?;
        }
        Ok(())
    }
}
