//! Integration tests for analysis configuration

use dosemap_analysis::{AnalysisConfig, Error, ProfileRequest};
use dosemap_grid::{Axis, EnergyUnit, Shape};
use rstest::rstest;

const FULL: &str = r#"{
    "energy_unit": "keV",
    "voxel_volume_cm3": 0.001,
    "reference": { "name": "Water_Homo", "default_density": 1.0 },
    "cases": [
        {
            "name": "Bone_Hetero",
            "default_density": 1.0,
            "regions": [
                {
                    "region": {
                        "name": "insert",
                        "shape": { "kind": "rectangle", "x_min": 10.0, "x_max": 70.0, "y_min": -30.0, "y_max": 30.0 }
                    },
                    "density": 1.85
                }
            ]
        }
    ],
    "regions": [
        { "name": "core", "shape": { "kind": "annulus", "x0": 0.0, "y0": 0.0, "inner": 0.0, "outer": 5.0 } },
        { "name": "left", "shape": { "kind": "half_plane", "axis": "X", "boundary": 0.0, "side": "below" } }
    ],
    "profiles": [{ "axis": "Y", "coordinate": 40.0 }]
}"#;

#[test]
fn parse_full_config() {
    let config = AnalysisConfig::from_json(FULL).unwrap();

    assert_eq!(config.energy_unit, EnergyUnit::KeV);
    assert_eq!(config.voxel_volume_cm3, 0.001);
    assert_eq!(config.converter().unwrap().factor(), 1.602e-13);

    let bone = config.case("Bone_Hetero").unwrap();
    assert_eq!(bone.regions[0].density, 1.85);
    assert!(matches!(bone.regions[0].region.shape, Shape::Rectangle { .. }));

    assert_eq!(config.regions.len(), 2);
    assert_eq!(
        config.profiles,
        vec![ProfileRequest {
            axis: Axis::Y,
            coordinate: 40.0
        }]
    );
}

#[test]
fn parse_from_reader() {
    let config = AnalysisConfig::from_reader(FULL.as_bytes()).unwrap();
    assert_eq!(config.cases.len(), 1);
}

#[test]
fn json_round_trip() {
    let config = AnalysisConfig::heterogeneity_study();
    let text = config.to_json().unwrap();
    assert_eq!(AnalysisConfig::from_json(&text).unwrap(), config);
}

#[test]
fn empty_config_is_default() {
    assert_eq!(AnalysisConfig::from_json("{}").unwrap(), AnalysisConfig::default());
}

#[test]
fn missing_case() {
    let config = AnalysisConfig::default();
    assert!(matches!(
        config.case("Lung_Hetero"),
        Err(Error::CaseNotFound(name)) if name == "Lung_Hetero"
    ));
}

#[rstest]
#[case(r#"{"voxel_volume_cm3": 0.0}"#)]
#[case(r#"{"conversion_factor": -1.0}"#)]
#[case(r#"{"reference": {"name": "Void", "default_density": 0.0}}"#)]
#[case(r#"{"regions": [{"name": "ring", "shape": {"kind": "annulus", "x0": 0.0, "y0": 0.0, "inner": 5.0, "outer": 1.0}}]}"#)]
fn invalid_values(#[case] text: &str) {
    assert!(matches!(
        AnalysisConfig::from_json(text),
        Err(Error::GridError(_))
    ));
}

#[test]
fn duplicate_cases() {
    let text = r#"{"cases": [
        {"name": "Bone_Homo", "default_density": 1.85},
        {"name": "Bone_Homo", "default_density": 1.92}
    ]}"#;
    assert!(matches!(
        AnalysisConfig::from_json(text),
        Err(Error::DuplicateCase(_))
    ));
}

#[rstest]
#[case(r#"{"energy_unit": "GeV"}"#)]
#[case(r#"{"cases": 3}"#)]
#[case("not json")]
fn malformed_json(#[case] text: &str) {
    assert!(matches!(
        AnalysisConfig::from_json(text),
        Err(Error::JsonError(_))
    ));
}
