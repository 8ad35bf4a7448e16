//! Integration tests for the case comparison pipeline

use dosemap_analysis::{
    compare_case, compare_named_case, compose_regions, AnalysisConfig, Error, ProfileRequest,
};
use dosemap_grid::{density, uniform_edges, Alignment, Axis, Grid, MaterialSpec, Region};
use rstest::{fixture, rstest};

#[fixture]
fn config() -> AnalysisConfig {
    AnalysisConfig {
        voxel_volume_cm3: 0.001,
        cases: vec![MaterialSpec::water_with_insert(
            "Bone_Hetero",
            Region::rectangle("insert", 0.0, 4.0, -4.0, 4.0),
            density::BONE,
        )],
        regions: vec![
            Region::rectangle("insert", 0.0, 4.0, -4.0, 4.0),
            Region::rectangle("water", -4.0, 0.0, -4.0, 4.0),
        ],
        profiles: vec![ProfileRequest {
            axis: Axis::X,
            coordinate: 0.0,
        }],
        ..Default::default()
    }
}

fn energy(bins: usize) -> Grid {
    let edges = uniform_edges(-4.0, 4.0, bins);
    Grid::filled(10.0, edges.clone(), edges).unwrap()
}

#[rstest]
fn identical_energy_same_geometry(config: AnalysisConfig) {
    let report = compare_named_case(&config, &energy(8), &energy(8), "Bone_Hetero").unwrap();

    assert_eq!(report.case, "Bone_Hetero");
    assert_eq!(report.alignment, Alignment::Identity);
    assert_eq!(report.density_substitutions, (0, 0));

    let insert = &report.regions[0];
    assert_eq!(insert.count, 32);
    assert!((insert.ratio.unwrap() - 1.0 / density::BONE).abs() < 1e-12);

    let water = &report.regions[1];
    assert_eq!(water.ratio, Some(1.0));
    assert_eq!(water.percent_change, Some(0.0));
}

#[rstest]
fn reference_resampled_onto_case(config: AnalysisConfig) {
    let case = config.case("Bone_Hetero").unwrap().clone();
    let report = compare_case(&config, &energy(4), &energy(8), &case).unwrap();

    assert_eq!(report.alignment, Alignment::ScaleResample);
    assert_eq!(report.reference_dose.shape(), (8, 8));
    assert!(report.reference_dose.same_geometry(report.case_dose.grid()));

    // a uniform reference stays uniform after resampling
    let first = report.reference_dose.values()[0];
    assert!(report.reference_dose.values().iter().all(|v| (v - first).abs() < 1e-18));
}

#[rstest]
fn profiles_follow_the_insert(config: AnalysisConfig) {
    let report = compare_named_case(&config, &energy(8), &energy(8), "Bone_Hetero").unwrap();
    let profile = &report.profiles[0];

    assert_eq!(profile.request.axis, Axis::X);
    assert_eq!(profile.reference.len(), 8);

    // water half unchanged, bone half lower by the density ratio
    let ratios = profile.ratio.values();
    assert!(ratios[..4].iter().all(|r| (r - 1.0).abs() < 1e-12));
    assert!(ratios[4..].iter().all(|r| (r - 1.0 / density::BONE).abs() < 1e-12));
}

#[rstest]
fn difference_summary(config: AnalysisConfig) {
    let report = compare_named_case(&config, &energy(8), &energy(8), "Bone_Hetero").unwrap();
    assert_eq!(report.difference.count, 64);
    assert!(report.difference.max.abs() < 1e-18);
    assert!(report.difference.min < 0.0);
}

#[rstest]
fn report_serialises_without_grids(config: AnalysisConfig) {
    let report = compare_named_case(&config, &energy(8), &energy(8), "Bone_Hetero").unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["case"], "Bone_Hetero");
    assert_eq!(json["alignment"], "identity");
    assert!(json.get("case_dose").is_none());
    assert_eq!(json["regions"].as_array().map(|r| r.len()), Some(2));
}

#[rstest]
fn unknown_case(config: AnalysisConfig) {
    assert!(matches!(
        compare_named_case(&config, &energy(8), &energy(8), "Lung_Hetero"),
        Err(Error::CaseNotFound(_))
    ));
}

#[rstest]
fn incompatible_extent(config: AnalysisConfig) {
    let edges = uniform_edges(0.0, 16.0, 8);
    let shifted = Grid::filled(10.0, edges.clone(), edges).unwrap();
    assert!(matches!(
        compare_named_case(&config, &energy(8), &shifted, "Bone_Hetero"),
        Err(Error::GridError(dosemap_grid::Error::UnsupportedGeometry(_)))
    ));
}

#[rstest]
fn composition_over_configured_regions(config: AnalysisConfig) {
    let primary = energy(8);
    let secondary = primary.map(|_| 2.5);
    let total = primary.zip_map(&secondary, |p, s| p + s).unwrap();

    let splits = compose_regions(&config, &primary, &secondary, &total).unwrap();
    assert_eq!(splits.len(), 2);
    assert_eq!(splits[0].region, "insert");
    assert_eq!(splits[0].pct_primary, 80.0);
    assert!(splits.iter().all(|s| s.residual() == 0.0));
}
