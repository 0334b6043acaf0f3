use ndgrid_views::{
    reference_cell::ReferenceCellType,
    shapes::unit_square,
    traits::{Entity, Geometry, Intersection},
    walker::{ElementFilter, IntersectionFilter},
    PeriodicGridView, Walker,
};
use std::sync::Mutex;

/// Grid walker
///
/// Demonstration of computing the area of a domain and the length of its boundary in one pass
fn main() {
    let grid = unit_square::<f64>(8, 8, ReferenceCellType::Triangle).unwrap();

    let area = Mutex::new(0.0);
    let boundary_length = Mutex::new(0.0);
    let mut walker = Walker::new(&grid);
    walker
        .append_element_lambda(
            |cell| *area.lock().unwrap() += cell.geometry().volume(),
            ElementFilter::All,
        )
        .append_intersection_lambda(
            |intersection, _, _| *boundary_length.lock().unwrap() += intersection.geometry().volume(),
            IntersectionFilter::Boundary,
        );
    walker.walk_parallel(0, true);
    println!(
        "Area: {}, boundary length: {}",
        area.lock().unwrap(),
        boundary_length.lock().unwrap()
    );

    // On a periodic view, every boundary intersection has a neighbour
    let view = PeriodicGridView::all_periodic(&grid).unwrap();
    let periodic_length = Mutex::new(0.0);
    let mut walker = Walker::new(&view);
    walker.append_intersection_lambda(
        |intersection, _, _| *periodic_length.lock().unwrap() += intersection.geometry().volume(),
        IntersectionFilter::PeriodicBoundary,
    );
    walker.walk(true);
    println!(
        "Length of periodic boundaries: {}",
        periodic_length.lock().unwrap()
    );
}
