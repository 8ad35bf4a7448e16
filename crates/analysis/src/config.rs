//! Analysis configuration as plain serialisable values

// crate modules
use crate::error::{Error, Result};

// dosemap modules
use dosemap_compare::rings;
use dosemap_grid::{
    density, Axis, DoseConverter, EnergyUnit, MaterialSpec, Region, DEFAULT_VOXEL_VOLUME_CM3,
};

// external crates
use log::debug;
use serde::{Deserialize, Serialize};

/// Side of the square heterogeneity insert \[mm\]
pub const INSERT_SIZE: f64 = 60.0;
/// Center of the heterogeneity insert along x \[mm\]
pub const INSERT_CENTER_X: f64 = 40.0;
/// Radii of the concentric rings around the source \[mm\]
pub const RING_RADII: [f64; 6] = [0.0, 5.0, 10.0, 30.0, 50.0, 150.0];

/// A line profile to extract from every compared case
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Axis the profile runs along
    pub axis: Axis,
    /// Position on the other axis \[mm\]
    pub coordinate: f64,
}

/// Everything needed to compare material cases against a reference
///
/// Every field has a default, so a JSON configuration only needs the fields
/// that differ:
///
/// ```rust
/// # use dosemap_analysis::AnalysisConfig;
/// # use dosemap_grid::EnergyUnit;
/// let config = AnalysisConfig::from_json(
///     r#"{
///         "energy_unit": "keV",
///         "cases": [{ "name": "Bone_Homo", "default_density": 1.85 }]
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.energy_unit, EnergyUnit::KeV);
/// assert_eq!(config.voxel_volume_cm3, 0.01);
/// assert_eq!(config.reference.name, "Water_Homo");
/// assert!(config.case("Bone_Homo").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Energy unit of the deposition histograms
    pub energy_unit: EnergyUnit,
    /// Explicit gray factor K, overrides `energy_unit` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_factor: Option<f64>,
    /// Volume of a single voxel \[cm³\]
    pub voxel_volume_cm3: f64,
    /// Material of the reference case
    pub reference: MaterialSpec,
    /// Material cases compared against the reference
    pub cases: Vec<MaterialSpec>,
    /// Regions aggregated for every case
    pub regions: Vec<Region>,
    /// Line profiles extracted for every case
    pub profiles: Vec<ProfileRequest>,
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration from any reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON text of the configuration
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The usual water, bone and lung heterogeneity study
    ///
    /// A water reference with bone and lung inserts, both a
    /// [INSERT_SIZE] mm square centered at x = [INSERT_CENTER_X] mm. Results
    /// are aggregated over the insert, the water on the other side of the
    /// source, and concentric rings at [RING_RADII], with profiles through
    /// the source and through the insert.
    ///
    /// ```rust
    /// # use dosemap_analysis::AnalysisConfig;
    /// let config = AnalysisConfig::heterogeneity_study();
    /// assert!(config.validate().is_ok());
    /// assert_eq!(config.cases.len(), 2);
    /// assert_eq!(config.case("Lung_Hetero").unwrap().regions[0].density, 0.2958);
    /// ```
    pub fn heterogeneity_study() -> Self {
        let insert = Region::centered_square("insert", INSERT_CENTER_X, 0.0, INSERT_SIZE);
        let mirror = Region::centered_square("mirror", -INSERT_CENTER_X, 0.0, INSERT_SIZE);

        let mut regions = vec![insert.clone(), mirror];
        // the radii are constant and increasing
        regions.extend(rings("ring", 0.0, 0.0, &RING_RADII).unwrap_or_default());

        Self {
            cases: vec![
                MaterialSpec::water_with_insert("Bone_Hetero", insert.clone(), density::BONE),
                MaterialSpec::water_with_insert("Lung_Hetero", insert, density::LUNG_MIRD),
            ],
            regions,
            profiles: vec![
                ProfileRequest {
                    axis: Axis::X,
                    coordinate: 0.0,
                },
                ProfileRequest {
                    axis: Axis::Y,
                    coordinate: INSERT_CENTER_X,
                },
            ],
            ..Default::default()
        }
    }

    /// Check every material, region and constant before any conversion
    pub fn validate(&self) -> Result<()> {
        self.converter()?;

        let volume = self.voxel_volume_cm3;
        if !(volume.is_finite() && volume > 0.0) {
            return Err(dosemap_grid::Error::InvalidVolume(volume).into());
        }

        self.reference.validate()?;
        for (k, case) in self.cases.iter().enumerate() {
            case.validate()?;
            if self.cases[..k].iter().any(|c| c.name == case.name) {
                return Err(Error::DuplicateCase(case.name.clone()));
            }
        }

        for region in &self.regions {
            region.validate()?;
        }

        debug!(
            "Configuration has {} cases, {} regions and {} profiles",
            self.cases.len(),
            self.regions.len(),
            self.profiles.len()
        );
        Ok(())
    }

    /// Dose converter for the configured unit or explicit factor
    pub fn converter(&self) -> Result<DoseConverter> {
        match self.conversion_factor {
            Some(factor) => Ok(DoseConverter::with_factor(factor)?),
            None => Ok(DoseConverter::new(self.energy_unit)),
        }
    }

    /// Find a case by name
    pub fn case(&self, name: &str) -> Result<&MaterialSpec> {
        self.cases
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::CaseNotFound(name.to_string()))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            energy_unit: EnergyUnit::default(),
            conversion_factor: None,
            voxel_volume_cm3: DEFAULT_VOXEL_VOLUME_CM3,
            reference: MaterialSpec::water(),
            cases: Vec::new(),
            regions: Vec::new(),
            profiles: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_regions() {
        let config = AnalysisConfig::heterogeneity_study();
        let names: Vec<&str> = config.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names[..3], ["insert", "mirror", "ring 0-5 mm"]);
        assert_eq!(config.regions.len(), 2 + RING_RADII.len() - 1);
    }

    #[test]
    fn defaults_to_mev() {
        let config = AnalysisConfig::default();
        assert_eq!(config.energy_unit, EnergyUnit::MeV);
        assert_eq!(config.converter().unwrap().factor(), 1.602e-10);
    }

    #[test]
    fn explicit_factor_wins() {
        let config = AnalysisConfig {
            conversion_factor: Some(2.0),
            ..Default::default()
        };
        assert_eq!(config.converter().unwrap().factor(), 2.0);
    }
}
