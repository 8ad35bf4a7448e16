//! Integration tests for grid alignment

use dosemap_grid::{align, alignment_strategy, uniform_edges, Alignment, Error, Grid};
use rstest::rstest;

fn ramp(nx: usize, ny: usize) -> Grid {
    // value = x center, so linear along x and constant along y
    let x_edges = uniform_edges(0.0, 8.0, nx);
    let y_edges = uniform_edges(-4.0, 4.0, ny);
    let blank = Grid::filled(0.0, x_edges, y_edges).unwrap();
    let centers = blank.x_centers();
    blank.with_values(
        centers
            .iter()
            .flat_map(|x| std::iter::repeat(*x).take(ny))
            .collect(),
    )
    .unwrap()
}

#[test]
fn identity_is_exact() {
    let grid = ramp(8, 4);
    let aligned = align(&grid, &grid).unwrap();
    assert_eq!(aligned, grid);
    assert_eq!(
        aligned.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        grid.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[rstest]
#[case(16, 8, 8, 4)] // downsample
#[case(4, 2, 8, 4)] // upsample
#[case(8, 2, 8, 4)] // y only
fn linear_field_preserved(
    #[case] src_nx: usize,
    #[case] src_ny: usize,
    #[case] ref_nx: usize,
    #[case] ref_ny: usize,
) {
    let source = ramp(src_nx, src_ny);
    let reference = ramp(ref_nx, ref_ny);

    assert_eq!(
        alignment_strategy(&source, &reference),
        Ok(Alignment::ScaleResample)
    );

    let aligned = align(&source, &reference).unwrap();
    assert!(aligned.same_geometry(&reference));

    // interior centers reproduce the ramp, the ends are clamped
    let src_first = source.x_centers()[0];
    let src_last = *source.x_centers().last().unwrap();
    for (a, b) in aligned.values().iter().zip(reference.values()) {
        let expected = b.clamp(src_first, src_last);
        assert!((a - expected).abs() < 1e-12);
    }
}

#[test]
fn mismatched_extent_rejected() {
    let a = Grid::filled(1.0, uniform_edges(0.0, 10.0, 10), uniform_edges(0.0, 10.0, 10)).unwrap();
    let b = Grid::filled(1.0, uniform_edges(0.0, 20.0, 10), uniform_edges(0.0, 10.0, 10)).unwrap();
    assert!(matches!(align(&a, &b), Err(Error::UnsupportedGeometry(_))));
}

#[test]
fn dose_grids_align_through_their_grid() {
    use dosemap_grid::{DensityMap, DoseConverter, MaterialSpec};

    let fine = ramp(8, 4);
    let coarse = ramp(4, 2);
    let map = DensityMap::for_grid(&fine, &MaterialSpec::water()).unwrap();
    let dose = DoseConverter::default().energy_to_dose(&fine, &map, 0.01).unwrap();

    let aligned = align(dose.grid(), &coarse).unwrap();
    assert_eq!(aligned.shape(), (4, 2));
}
