//! Integration tests for energy to dose conversion

use dosemap_grid::{
    density, energy_to_dose, uniform_edges, DensityMap, DoseConverter, EnergyUnit, Error, Grid,
    MaterialSpec, Region, MEV_TO_GRAY,
};
use rstest::{fixture, rstest};

#[fixture]
fn energy() -> Grid {
    let edges = uniform_edges(0.0, 4.0, 4);
    Grid::filled(10.0, edges.clone(), edges).unwrap()
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * b.abs().max(f64::MIN_POSITIVE)
}

#[rstest]
fn water_reference_value(energy: Grid) {
    let map = DensityMap::for_grid(&energy, &MaterialSpec::water()).unwrap();
    let dose = energy_to_dose(&energy, &map, 0.001, 1.602e-10).unwrap();

    assert_eq!(dose.grid().shape(), (4, 4));
    assert_eq!(dose.density_substitutions(), 0);
    for v in dose.grid().values() {
        assert!(relative_eq(*v, 1.602e-6));
    }

    // the same factor is the MeV unit
    let by_unit = DoseConverter::new(EnergyUnit::MeV)
        .energy_to_dose(&energy, &map, 0.001)
        .unwrap();
    assert_eq!(by_unit, dose);
}

#[rstest]
#[case(EnergyUnit::MeV, 1.602e-10)]
#[case(EnergyUnit::KeV, 1.602e-13)]
#[case(EnergyUnit::EV, 1.602e-16)]
fn unit_in_water_cubic_centimetre(#[case] unit: EnergyUnit, #[case] expected: f64) {
    let edges = uniform_edges(0.0, 1.0, 1);
    let energy = Grid::filled(1.0, edges.clone(), edges).unwrap();
    let map = DensityMap::for_grid(&energy, &MaterialSpec::water()).unwrap();

    let dose = DoseConverter::new(unit).energy_to_dose(&energy, &map, 1.0).unwrap();
    assert!(relative_eq(dose.grid().values()[0], expected));
}

#[rstest]
fn denser_material_lower_dose(energy: Grid) {
    let spec = MaterialSpec::water()
        .with_region(Region::rectangle("bone", 2.0, 4.0, 0.0, 4.0), density::BONE);
    let map = DensityMap::for_grid(&energy, &spec).unwrap();
    let dose = DoseConverter::default().energy_to_dose(&energy, &map, 0.001).unwrap();

    let water = dose.grid().get(0, 0).unwrap();
    let bone = dose.grid().get(3, 0).unwrap();
    assert!(relative_eq(water / bone, density::BONE));
}

#[rstest]
#[case(EnergyUnit::EV, 1e-6)]
#[case(EnergyUnit::KeV, 1e-3)]
#[case(EnergyUnit::MeV, 1.0)]
fn unit_scaling(energy: Grid, #[case] unit: EnergyUnit, #[case] relative: f64) {
    let map = DensityMap::for_grid(&energy, &MaterialSpec::water()).unwrap();
    let dose = DoseConverter::new(unit).energy_to_dose(&energy, &map, 0.01).unwrap();
    let mev = energy_to_dose(&energy, &map, 0.01, MEV_TO_GRAY).unwrap();

    assert!(relative_eq(dose.grid().sum() / mev.grid().sum(), relative));
}

// Power of two scale factors are exact in floating point
#[rstest]
#[case(2.0)]
#[case(4.0)]
#[case(0.5)]
fn linear_in_energy(energy: Grid, #[case] scale: f64) {
    let spec = MaterialSpec::water()
        .with_region(Region::rectangle("bone", 2.0, 4.0, 0.0, 4.0), density::BONE);
    let map = DensityMap::for_grid(&energy, &spec).unwrap();
    let converter = DoseConverter::default();

    let single = converter.energy_to_dose(&energy, &map, 0.01).unwrap();
    let scaled = converter
        .energy_to_dose(&energy.scale(scale), &map, 0.01)
        .unwrap();

    for (a, b) in single.grid().values().iter().zip(scaled.grid().values()) {
        assert_eq!((scale * a).to_bits(), b.to_bits());
    }
}

#[rstest]
fn substitutes_default_density(energy: Grid) {
    let spec = MaterialSpec::water()
        .with_region(Region::rectangle("void", 0.0, 1.0, 0.0, 4.0), 0.0);
    let map = DensityMap::for_grid(&energy, &spec).unwrap();
    assert_eq!(map.non_positive_count(), 4);

    let dose = DoseConverter::default().energy_to_dose(&energy, &map, 0.001).unwrap();
    assert_eq!(dose.density_substitutions(), 4);
    assert!(dose.grid().values().iter().all(|v| v.is_finite()));
    assert_eq!(dose.grid().get(0, 0), dose.grid().get(1, 0));
}

#[rstest]
#[case(0.0)]
#[case(-0.01)]
#[case(f64::NAN)]
fn invalid_volume(energy: Grid, #[case] volume: f64) {
    let map = DensityMap::for_grid(&energy, &MaterialSpec::water()).unwrap();
    let result = DoseConverter::default().energy_to_dose(&energy, &map, volume);
    assert!(matches!(result, Err(Error::InvalidVolume(_))));
}

#[rstest]
fn density_map_shape_must_match(energy: Grid) {
    let edges = uniform_edges(0.0, 4.0, 2);
    let other = Grid::filled(0.0, edges.clone(), edges).unwrap();
    let map = DensityMap::for_grid(&other, &MaterialSpec::water()).unwrap();
    assert_eq!(
        DoseConverter::default().energy_to_dose(&energy, &map, 0.01),
        Err(Error::ShapeMismatch {
            expected: (4, 4),
            found: (2, 2)
        })
    );
}

#[rstest]
fn zero_energy_zero_dose(energy: Grid) {
    let empty = energy.map(|_| 0.0);
    let map = DensityMap::for_grid(&empty, &MaterialSpec::water()).unwrap();
    let dose = DoseConverter::default().energy_to_dose(&empty, &map, 0.01).unwrap();
    assert_eq!(dose.grid().sum(), 0.0);
}
