//! Conversion of deposited energy into absorbed dose

// crate modules
use crate::density_map::DensityMap;
use crate::error::{Error, Result};
use crate::grid::Grid;

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Gy per (eV / (cm³ · g/cm³)), i.e. 1.602e-19 J/eV over 1e-3 kg/g
pub const EV_TO_GRAY: f64 = 1.602e-16;
/// Gy per (keV / (cm³ · g/cm³))
pub const KEV_TO_GRAY: f64 = 1.602e-13;
/// Gy per (MeV / (cm³ · g/cm³))
pub const MEV_TO_GRAY: f64 = 1.602e-10;

/// Default voxel volume in cm³, a 1 x 1 mm bin in a 10 mm slab
pub const DEFAULT_VOXEL_VOLUME_CM3: f64 = 0.01;

/// Energy unit of the deposition histogram
///
/// Transport codes tally deposited energy in MeV, which is the default.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[serde(rename = "eV")]
    EV,
    #[serde(rename = "keV")]
    KeV,
    #[default]
    #[serde(rename = "MeV")]
    MeV,
}

impl EnergyUnit {
    /// Factor converting energy / (volume · density) into Gy
    pub fn gray_factor(&self) -> f64 {
        match self {
            EnergyUnit::EV => EV_TO_GRAY,
            EnergyUnit::KeV => KEV_TO_GRAY,
            EnergyUnit::MeV => MEV_TO_GRAY,
        }
    }
}

impl std::fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            EnergyUnit::EV => "eV",
            EnergyUnit::KeV => "keV",
            EnergyUnit::MeV => "MeV",
        };
        write!(f, "{s}")
    }
}

/// A [Grid] of absorbed dose in Gy
///
/// Only [DoseConverter] creates these. The dose values are reached through
/// [DoseGrid::grid()], so a dose grid is never taken for an energy grid and
/// cannot be converted a second time:
///
/// ```rust,compile_fail
/// # use dosemap_grid::{uniform_edges, DensityMap, DoseConverter, Grid, MaterialSpec};
/// let edges = uniform_edges(0.0, 4.0, 4);
/// let energy = Grid::filled(10.0, edges.clone(), edges).unwrap();
/// let map = DensityMap::for_grid(&energy, &MaterialSpec::water()).unwrap();
/// let converter = DoseConverter::default();
///
/// let dose = converter.energy_to_dose(&energy, &map, 0.001).unwrap();
/// let twice = converter.energy_to_dose(&dose, &map, 0.001);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DoseGrid {
    grid: Grid,
    substitutions: usize,
}

impl DoseGrid {
    /// The dose values as a plain grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Consume the dose grid, keeping the plain grid
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Number of voxels where the default density replaced an unusable one
    pub fn density_substitutions(&self) -> usize {
        self.substitutions
    }
}

impl AsRef<Grid> for DoseGrid {
    fn as_ref(&self) -> &Grid {
        &self.grid
    }
}

/// Converts energy deposition into absorbed dose
///
/// Applies `dose = E · K / (V · ρ)` to every voxel, with `E` the deposited
/// energy, `K` the unit factor, `V` the voxel volume in cm³ and `ρ` the voxel
/// density in g/cm³.
///
/// ```rust
/// # use dosemap_grid::{uniform_edges, DensityMap, DoseConverter, EnergyUnit, Grid, MaterialSpec};
/// let edges = uniform_edges(0.0, 4.0, 4);
/// let energy = Grid::filled(10.0, edges.clone(), edges).unwrap();
/// let map = DensityMap::for_grid(&energy, &MaterialSpec::water()).unwrap();
///
/// let dose = DoseConverter::new(EnergyUnit::MeV)
///     .energy_to_dose(&energy, &map, 0.001)
///     .unwrap();
///
/// // 10 MeV in 1 mm³ of water
/// assert!((dose.grid().get(0, 0).unwrap() - 1.602e-6).abs() < 1e-18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseConverter {
    factor: f64,
}

impl DoseConverter {
    /// Converter for a known energy unit
    pub fn new(unit: EnergyUnit) -> Self {
        Self {
            factor: unit.gray_factor(),
        }
    }

    /// Converter with an explicit factor K
    pub fn with_factor(factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(Error::InvalidConversionFactor(factor));
        }
        Ok(Self { factor })
    }

    /// The conversion factor K in use
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Convert an energy grid to dose using a matching density map
    ///
    /// Voxels with a zero, negative or non-finite density fall back to the
    /// default density of the map. The number of substitutions is logged and
    /// kept on the result, see [DoseGrid::density_substitutions()].
    ///
    /// Fails with [Error::ShapeMismatch] if the density map does not match the
    /// grid, or [Error::InvalidVolume] for an unusable voxel volume.
    pub fn energy_to_dose(
        &self,
        grid: &Grid,
        densities: &DensityMap,
        voxel_volume_cm3: f64,
    ) -> Result<DoseGrid> {
        if !(voxel_volume_cm3.is_finite() && voxel_volume_cm3 > 0.0) {
            return Err(Error::InvalidVolume(voxel_volume_cm3));
        }

        if grid.shape() != densities.shape() {
            return Err(Error::ShapeMismatch {
                expected: grid.shape(),
                found: densities.shape(),
            });
        }

        let fallback = densities.default_density();
        if !(fallback.is_finite() && fallback > 0.0) {
            return Err(Error::InvalidDensity {
                material: "default".to_string(),
                density: fallback,
            });
        }

        let mut substitutions = 0;
        let values: Vec<f64> = grid
            .values()
            .iter()
            .zip(densities.densities())
            .map(|(energy, rho)| {
                let rho = if rho.is_finite() && *rho > 0.0 {
                    *rho
                } else {
                    substitutions += 1;
                    fallback
                };
                energy * self.factor / (voxel_volume_cm3 * rho)
            })
            .collect();

        if substitutions > 0 {
            warn!("Substituted the default density ({fallback} g/cm3) in {substitutions} voxels");
        }

        debug!(
            "Converted {} voxels to dose with K = {:e} and V = {voxel_volume_cm3} cm3",
            grid.len(),
            self.factor
        );

        Ok(DoseGrid {
            grid: grid.with_values(values)?,
            substitutions,
        })
    }
}

impl Default for DoseConverter {
    fn default() -> Self {
        Self::new(EnergyUnit::default())
    }
}

/// Convert an energy grid to dose with an explicit factor K
///
/// Shorthand for [DoseConverter::with_factor()] followed by
/// [DoseConverter::energy_to_dose()].
pub fn energy_to_dose(
    grid: &Grid,
    densities: &DensityMap,
    voxel_volume_cm3: f64,
    factor: f64,
) -> Result<DoseGrid> {
    DoseConverter::with_factor(factor)?.energy_to_dose(grid, densities, voxel_volume_cm3)
}

/// Volume of a voxel in cm³ from its dimensions in mm
///
/// ```rust
/// # use dosemap_grid::voxel_volume_cm3;
/// assert!((voxel_volume_cm3(1.0, 1.0, 10.0).unwrap() - 0.01).abs() < 1e-15);
/// assert!(voxel_volume_cm3(1.0, 0.0, 10.0).is_err());
/// ```
pub fn voxel_volume_cm3(dx_mm: f64, dy_mm: f64, dz_mm: f64) -> Result<f64> {
    let volume = dx_mm * dy_mm * dz_mm * 1e-3;
    if [dx_mm, dy_mm, dz_mm].iter().any(|d| !(d.is_finite() && *d > 0.0)) {
        return Err(Error::InvalidVolume(volume));
    }
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_factors_scale_by_thousand() {
        let ratio = EnergyUnit::MeV.gray_factor() / EnergyUnit::KeV.gray_factor();
        assert!((ratio - 1e3).abs() < 1e-9);
        let ratio = EnergyUnit::KeV.gray_factor() / EnergyUnit::EV.gray_factor();
        assert!((ratio - 1e3).abs() < 1e-9);
    }

    #[test]
    fn physical_unit_factors() {
        // 1 MeV in 1 cm³ of water
        assert_eq!(EnergyUnit::MeV.gray_factor(), 1.602e-10);
        assert_eq!(EnergyUnit::KeV.gray_factor(), 1.602e-13);
        assert_eq!(EnergyUnit::default(), EnergyUnit::MeV);
    }

    #[test]
    fn rejects_bad_factor() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                DoseConverter::with_factor(bad),
                Err(Error::InvalidConversionFactor(_))
            ));
        }
    }

    #[test]
    fn unit_serde_names() {
        assert_eq!(serde_json::to_string(&EnergyUnit::KeV).unwrap(), r#""keV""#);
        let unit: EnergyUnit = serde_json::from_str(r#""MeV""#).unwrap();
        assert_eq!(unit, EnergyUnit::MeV);
    }
}
