//! Comparison of one material case against the reference

// crate modules
use crate::config::{AnalysisConfig, ProfileRequest};
use crate::error::Result;

// dosemap modules
use dosemap_compare::{
    aggregate_all, compare, composition_all, line_profile, profile_ratio, ComparisonResult,
    FieldSummary, Profile, RegionAggregate, RegionComposition,
};
use dosemap_grid::{
    align, alignment_strategy, Alignment, DensityMap, DoseGrid, Grid, MaterialSpec,
};
use dosemap_utils::{f, ValueExt};

// external crates
use log::{debug, warn};
use serde::Serialize;

/// Matching line profiles of the reference and a case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileComparison {
    pub request: ProfileRequest,
    pub reference: Profile,
    pub case: Profile,
    /// `case / reference` with `1.0` where the reference is not positive
    pub ratio: Profile,
}

/// Everything computed for one case
///
/// The grids are kept for plotting but left out of the serialised report,
/// which only holds the scalar and profile results.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Name of the material case
    pub case: String,
    /// How the reference was brought onto the case geometry
    pub alignment: Alignment,
    /// Reference dose on the case geometry \[Gy\]
    #[serde(skip)]
    pub reference_dose: Grid,
    /// Case dose \[Gy\]
    #[serde(skip)]
    pub case_dose: DoseGrid,
    /// Case against the aligned reference
    #[serde(skip)]
    pub comparison: ComparisonResult,
    /// Statistics of the difference field \[Gy\]
    pub difference: FieldSummary,
    /// Voxels where the default density was substituted, reference then case
    pub density_substitutions: (usize, usize),
    pub regions: Vec<RegionAggregate>,
    pub profiles: Vec<ProfileComparison>,
}

impl CaseReport {
    /// JSON text of the scalar and profile results
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for CaseReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Case {} (reference aligned by {})\n", self.case, self.alignment);
        s += &f!(
            "  total dose {} Gy vs reference {} Gy\n",
            self.case_dose.grid().sum().sci(4, 2),
            self.reference_dose.sum().sci(4, 2)
        );
        s += &f!("  difference: {}\n", self.difference);
        for region in &self.regions {
            s += &f!("  {region}\n");
        }
        write!(f, "{}", s.trim_end())
    }
}

/// Convert, align and compare one case against the configured reference
///
/// Both energy grids are converted to dose with their own material, the
/// reference dose is aligned onto the case geometry, and every configured
/// region and profile is evaluated on the aligned pair.
///
/// ```rust
/// # use dosemap_analysis::{compare_case, AnalysisConfig};
/// # use dosemap_grid::{uniform_edges, Grid, MaterialSpec, Region};
/// let mut config = AnalysisConfig::default();
/// config.regions.push(Region::everywhere("all"));
///
/// let edges = uniform_edges(-2.0, 2.0, 4);
/// let energy = Grid::filled(10.0, edges.clone(), edges).unwrap();
/// let bone = MaterialSpec::homogeneous("Bone_Homo", 2.0);
///
/// let report = compare_case(&config, &energy, &energy, &bone).unwrap();
/// assert_eq!(report.regions[0].ratio, Some(0.5));
/// ```
pub fn compare_case(
    config: &AnalysisConfig,
    reference_energy: &Grid,
    case_energy: &Grid,
    case_spec: &MaterialSpec,
) -> Result<CaseReport> {
    let converter = config.converter()?;
    let volume = config.voxel_volume_cm3;

    let reference_map = DensityMap::for_grid(reference_energy, &config.reference)?;
    let reference = converter.energy_to_dose(reference_energy, &reference_map, volume)?;

    let case_map = DensityMap::for_grid(case_energy, case_spec)?;
    let case_dose = converter.energy_to_dose(case_energy, &case_map, volume)?;

    let alignment = alignment_strategy(reference.grid(), case_dose.grid())?;
    if alignment != Alignment::Identity {
        warn!(
            "Resampling reference {:?} onto {:?} for \"{}\"",
            reference.grid().shape(),
            case_dose.grid().shape(),
            case_spec.name
        );
    }
    let reference_dose = align(reference.grid(), case_dose.grid())?;

    let comparison = compare(&reference_dose, case_dose.grid())?;
    let regions = aggregate_all(case_dose.grid(), &config.regions, Some(&reference_dose))?;

    let profiles = config
        .profiles
        .iter()
        .map(|request| compare_profiles(*request, &reference_dose, case_dose.grid()))
        .collect::<Result<Vec<ProfileComparison>>>()?;

    debug!(
        "Compared \"{}\" against \"{}\" over {} regions",
        case_spec.name,
        config.reference.name,
        regions.len()
    );

    Ok(CaseReport {
        case: case_spec.name.clone(),
        alignment,
        difference: FieldSummary::of(&comparison.difference),
        density_substitutions: (
            reference.density_substitutions(),
            case_dose.density_substitutions(),
        ),
        reference_dose,
        case_dose,
        comparison,
        regions,
        profiles,
    })
}

/// Look up a case by name and compare it against the reference
pub fn compare_named_case(
    config: &AnalysisConfig,
    reference_energy: &Grid,
    case_energy: &Grid,
    name: &str,
) -> Result<CaseReport> {
    compare_case(config, reference_energy, case_energy, config.case(name)?)
}

/// Primary and secondary composition over every configured region
///
/// The three grids are the separately tallied primary, secondary and total
/// deposition of one run, so no conversion or alignment is involved.
pub fn compose_regions(
    config: &AnalysisConfig,
    primary: &Grid,
    secondary: &Grid,
    total: &Grid,
) -> Result<Vec<RegionComposition>> {
    let splits = composition_all(primary, secondary, total, &config.regions)?;
    debug!("Split {} regions into primary and secondary", splits.len());
    Ok(splits)
}

fn compare_profiles(
    request: ProfileRequest,
    reference: &Grid,
    case: &Grid,
) -> Result<ProfileComparison> {
    let reference = line_profile(reference, request.axis, request.coordinate)?;
    let case = line_profile(case, request.axis, request.coordinate)?;
    let ratio = profile_ratio(&reference, &case)?;

    Ok(ProfileComparison {
        request,
        reference,
        case,
        ratio,
    })
}
