use ndgrid_views::{
    reference_cell::ReferenceCellType,
    shapes::unit_square,
    traits::{Entity, Geometry, GridView, IndexSet, Intersection},
    PeriodicDirections, PeriodicGridView,
};

/// Periodic grid view
///
/// Demonstration of a view of the unit square that wraps around in the x direction
fn main() {
    let grid = unit_square::<f64>(4, 4, ReferenceCellType::Quadrilateral).unwrap();
    let view = PeriodicGridView::new(&grid, PeriodicDirections::only(2, &[0])).unwrap();

    // Vertices on the right boundary are identified with the vertices on the left boundary
    println!(
        "The grid has {} vertices, the periodic view has {}",
        grid.size(2),
        view.size(2)
    );

    let index_set = view.index_set();
    for cell in view.entity_iter(0) {
        for intersection in view.intersection_iter(&cell) {
            if intersection.boundary() && intersection.neighbor() {
                let outside = intersection.outside().unwrap();
                println!(
                    "Cell {} at {:?} is a periodic neighbour of cell {} at {:?}",
                    index_set.index(&cell),
                    cell.geometry().center(),
                    index_set.index(&outside),
                    outside.geometry().center(),
                );
            }
        }
    }
}
