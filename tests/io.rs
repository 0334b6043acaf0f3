//! Test input/output
use ndgrid_views::{
    io::{dgf_grid, DgfGridConfig},
    reference_cell::ReferenceCellType,
    shapes::unit_square,
    traits::{DGFImport, GridView},
    SingleTypeGrid,
};
use std::fs;

#[test]
fn test_dgf_file() {
    let filename = std::env::temp_dir().join("_ndgrid_views_test_2d_interval.dgf");
    fs::write(
        &filename,
        "DGF\n\
         % A box with 3 by 2 cells\n\
         INTERVAL\n\
         0 0\n\
         3 2\n\
         3 2\n\
         #\n\
         #\n",
    )
    .unwrap();
    let config = DgfGridConfig {
        filename: filename.to_str().unwrap().to_string(),
    };

    let g = dgf_grid::<f64>(&config).unwrap();
    assert_eq!(g.size(0), 6);
    assert_eq!(g.size(1), 17);
    assert_eq!(g.size(2), 12);

    let g2 = SingleTypeGrid::<f64>::import_from_dgf(&config.filename).unwrap();
    assert_eq!(g2.size(0), 6);
}

#[test]
fn test_dgf_matches_cube_grid() {
    let from_dgf = SingleTypeGrid::<f64>::from_dgf_string(
        "DGF\nINTERVAL\n0 0\n1 1\n2 2\n#\nSIMPLEX\n#\n",
    )
    .unwrap();
    let from_shapes = unit_square::<f64>(2, 2, ReferenceCellType::Triangle).unwrap();
    for codim in 0..3 {
        assert_eq!(from_dgf.size(codim), from_shapes.size(codim));
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_cube_grid_from_ron_config() {
    use ndgrid_views::shapes::{cube_grid, CubeGridConfig};

    let config = CubeGridConfig::from_ron_string(
        "(lower_left: [0.0, 0.0, 0.0], upper_right: [1.0, 2.0, 3.0], level: Some(1), cell_type: Hexahedron)",
    )
    .unwrap();
    let g = cube_grid::<f64>(&config).unwrap();
    assert_eq!(g.size(0), 8);
    assert_eq!(g.size(3), 27);
}

#[cfg(feature = "serde")]
#[test]
fn test_ron_round_trip() {
    use ndgrid_views::traits::{Entity, RONExport, RONImport};

    let g = unit_square::<f64>(3, 2, ReferenceCellType::Quadrilateral).unwrap();
    let filename = std::env::temp_dir().join("_ndgrid_views_test_io.ron");
    let filename = filename.to_str().unwrap();
    g.export_as_ron(filename).unwrap();
    let g2 = SingleTypeGrid::<f64>::import_from_ron(filename).unwrap();

    assert_eq!(g2.size(0), g.size(0));
    for (c, c2) in g.entity_iter(0).zip(g2.entity_iter(0)) {
        assert_eq!(c.entity_type(), c2.entity_type());
        assert_eq!(c.local_index(), c2.local_index());
    }
}
