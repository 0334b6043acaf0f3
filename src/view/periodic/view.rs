//! Periodic grid view
use super::{
    PeriodicEntityIter, PeriodicIndexSet, PeriodicIntersection, PeriodicIntersectionIter,
    PeriodicTables,
};
use crate::{
    reference_cell::ReferenceCellType,
    traits::{Entity, Geometry, GridView, IndexSet, Intersection},
    types::{GridError, GridResult, RealScalar},
};
use log::{debug, info};

/// The axes along which a periodic view wraps around
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicDirections(Vec<bool>);

impl PeriodicDirections {
    /// Create new from one flag per axis
    pub fn new(mask: Vec<bool>) -> Self {
        Self(mask)
    }

    /// Every axis is periodic
    pub fn all(dim: usize) -> Self {
        Self(vec![true; dim])
    }

    /// Only the given axes are periodic
    pub fn only(dim: usize, axes: &[usize]) -> Self {
        Self((0..dim).map(|d| axes.contains(&d)).collect())
    }

    /// Number of axes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the mask empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Is the given axis periodic?
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.0.get(axis).copied().unwrap_or(false)
    }

    /// The periodic axes
    pub fn axes(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|(_, p)| **p).map(|(i, _)| i)
    }
}

impl From<Vec<bool>> for PeriodicDirections {
    fn from(mask: Vec<bool>) -> Self {
        Self(mask)
    }
}

/// Axis aligned bounding box of the boundary of a grid
#[derive(Debug, Clone, PartialEq)]
pub struct DomainBox<T: RealScalar> {
    lower_left: Vec<T>,
    upper_right: Vec<T>,
}

impl<T: RealScalar> DomainBox<T> {
    /// The box spanned by the centers of the boundary intersections of a grid
    pub fn from_boundary<G: GridView<T = T>>(grid: &G) -> GridResult<Self> {
        let first = grid.entity_iter(0).next().ok_or_else(|| {
            GridError::InvalidConfiguration("Cannot find the domain of an empty grid".to_string())
        })?;
        let mut lower_left = first.geometry().center();
        let mut upper_right = lower_left.clone();
        for cell in grid.entity_iter(0) {
            if !cell.has_boundary_intersections() {
                continue;
            }
            for intersection in grid.intersection_iter(&cell) {
                if !intersection.boundary() {
                    continue;
                }
                for (d, x) in intersection.geometry().center().into_iter().enumerate() {
                    lower_left[d] = lower_left[d].min(x);
                    upper_right[d] = upper_right[d].max(x);
                }
            }
        }
        Ok(Self {
            lower_left,
            upper_right,
        })
    }

    /// Lower left corner
    pub fn lower_left(&self) -> &[T] {
        &self.lower_left
    }

    /// Upper right corner
    pub fn upper_right(&self) -> &[T] {
        &self.upper_right
    }
}

/// A view of a grid that identifies opposite boundaries of an axis aligned domain
///
/// Entities on the upper boundary along a periodic axis are identified with the matching entities
/// on the lower boundary: they share an index, and iterating over the view only visits the entity
/// on the lower boundary. Boundary intersections on periodic boundaries have the cell on the
/// opposite side of the domain as their neighbour.
///
/// Matching is only reliable for axis aligned grids whose opposite boundaries are discretised in
/// the same way. If no match is found, creating the view fails with [GridError::InvalidState].
///
/// Cells are identified by the raw indices of the wrapped grid, so [GridView::entity] takes raw
/// indices.
#[derive(Debug)]
pub struct PeriodicGridView<'g, G: GridView> {
    grid: &'g G,
    directions: PeriodicDirections,
    domain: DomainBox<G::T>,
    tables: PeriodicTables,
}

impl<'g, G: GridView + Sync> PeriodicGridView<'g, G> {
    /// Create new
    pub fn new(grid: &'g G, directions: PeriodicDirections) -> GridResult<Self> {
        if directions.len() != grid.world_dim() {
            return Err(GridError::InvalidConfiguration(format!(
                "Periodic directions given for {} axes, but the grid has {}",
                directions.len(),
                grid.world_dim()
            )));
        }
        let mut view = Self {
            grid,
            directions,
            domain: DomainBox {
                lower_left: vec![],
                upper_right: vec![],
            },
            tables: PeriodicTables::default(),
        };
        view.update()?;
        Ok(view)
    }

    /// Create new with every axis periodic
    pub fn all_periodic(grid: &'g G) -> GridResult<Self> {
        Self::new(grid, PeriodicDirections::all(grid.world_dim()))
    }

    /// Recompute the domain and rebuild the index tables
    pub fn update(&mut self) -> GridResult<()> {
        let domain = DomainBox::from_boundary(self.grid)?;
        for axis in self.directions.axes() {
            if domain.lower_left[axis] >= domain.upper_right[axis] {
                return Err(GridError::InvalidConfiguration(format!(
                    "Domain is degenerate along periodic axis {axis}: {:?} >= {:?}",
                    domain.lower_left[axis], domain.upper_right[axis]
                )));
            }
        }
        debug!(
            "Periodic domain: {:?} to {:?}",
            domain.lower_left, domain.upper_right
        );
        self.tables = PeriodicTables::build(self.grid, &self.directions, &domain)?;
        self.domain = domain;
        info!(
            "Built periodic view with {:?} entities per codimension",
            (0..=self.grid.dim())
                .map(|c| self.tables.entity_count(c))
                .collect::<Vec<_>>()
        );
        Ok(())
    }

    /// The wrapped grid
    pub fn grid(&self) -> &'g G {
        self.grid
    }

    /// The periodic axes
    pub fn directions(&self) -> &PeriodicDirections {
        &self.directions
    }

    /// The domain
    pub fn domain(&self) -> &DomainBox<G::T> {
        &self.domain
    }

    /// The index tables
    pub fn tables(&self) -> &PeriodicTables {
        &self.tables
    }
}

impl<'g, G: GridView + Sync> GridView for PeriodicGridView<'g, G> {
    type T = G::T;
    type Entity<'a>
        = G::Entity<'a>
    where
        Self: 'a;
    type Intersection<'a>
        = PeriodicIntersection<'a, G>
    where
        Self: 'a;
    type IndexSet<'a>
        = PeriodicIndexSet<'a, G>
    where
        Self: 'a;
    type EntityIter<'a>
        = PeriodicEntityIter<'a, G>
    where
        Self: 'a;
    type IntersectionIter<'a>
        = PeriodicIntersectionIter<'a, G>
    where
        Self: 'a;

    fn dim(&self) -> usize {
        self.grid.dim()
    }
    fn world_dim(&self) -> usize {
        self.grid.world_dim()
    }
    fn types(&self, codim: usize) -> &[ReferenceCellType] {
        self.grid.types(codim)
    }
    fn size(&self, codim: usize) -> usize {
        self.tables.entity_count(codim)
    }
    fn size_of_type(&self, entity_type: ReferenceCellType) -> usize {
        self.tables.type_count(entity_type)
    }
    fn index_set(&self) -> PeriodicIndexSet<'_, G> {
        PeriodicIndexSet::new(self.grid.index_set(), &self.tables)
    }
    fn entity(&self, entity_type: ReferenceCellType, index: usize) -> Option<G::Entity<'_>> {
        self.grid.entity(entity_type, index)
    }
    fn entity_iter(&self, codim: usize) -> PeriodicEntityIter<'_, G> {
        let tables = if codim == 0 { None } else { Some(&self.tables) };
        PeriodicEntityIter::new(
            self.grid.entity_iter(codim),
            self.grid.index_set(),
            tables,
        )
    }
    fn intersection_iter<'a>(&'a self, element: &G::Entity<'a>) -> PeriodicIntersectionIter<'a, G> {
        let grid: &'a G = self.grid;
        let neighbors = self
            .tables
            .neighbors(element.entity_type(), grid.index_set().index(element));
        PeriodicIntersectionIter::new(grid.intersection_iter(element), grid, neighbors)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{shapes::unit_square, traits::Point, view::periodic::PeriodicNeighbor};
    use approx::assert_relative_eq;

    #[test]
    fn test_directions() {
        let d = PeriodicDirections::only(3, &[0, 2]);
        assert_eq!(d.len(), 3);
        assert!(d.is_periodic(0));
        assert!(!d.is_periodic(1));
        assert!(d.is_periodic(2));
        assert!(!d.is_periodic(3));
        assert_eq!(d.axes().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(PeriodicDirections::all(2), PeriodicDirections::from(vec![true, true]));
    }

    #[test]
    fn test_domain_box() {
        let grid = unit_square::<f64>(3, 2, ReferenceCellType::Triangle).unwrap();
        let domain = DomainBox::from_boundary(&grid).unwrap();
        assert_relative_eq!(domain.lower_left()[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(domain.lower_left()[1], 0.0, epsilon = 1e-10);
        assert_relative_eq!(domain.upper_right()[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(domain.upper_right()[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_wrong_number_of_directions() {
        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Quadrilateral).unwrap();
        assert!(matches!(
            PeriodicGridView::new(&grid, PeriodicDirections::all(3)),
            Err(GridError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_sizes() {
        let grid = unit_square::<f64>(4, 4, ReferenceCellType::Quadrilateral).unwrap();
        let view = PeriodicGridView::all_periodic(&grid).unwrap();
        assert_eq!(view.size(0), 16);
        assert_eq!(view.size(1), 32);
        assert_eq!(view.size(2), 16);
        assert_eq!(view.size_of_type(ReferenceCellType::Point), 16);
        assert_eq!(view.index_set().size(2), 16);
    }

    #[test]
    fn test_no_periodic_axes() {
        let grid = unit_square::<f64>(3, 3, ReferenceCellType::Triangle).unwrap();
        let view = PeriodicGridView::new(&grid, PeriodicDirections::new(vec![false, false])).unwrap();
        for codim in 0..3 {
            assert_eq!(view.size(codim), grid.size(codim));
            assert_eq!(view.entity_iter(codim).count(), grid.size(codim));
        }
        for cell in view.entity_iter(0) {
            for i in view.intersection_iter(&cell) {
                assert_eq!(i.neighbor(), !i.boundary());
            }
        }
    }

    #[test]
    fn test_periodic_intersection() {
        let grid = unit_square::<f64>(4, 4, ReferenceCellType::Quadrilateral).unwrap();
        let view = PeriodicGridView::all_periodic(&grid).unwrap();
        let mut count = 0;
        for cell in view.entity_iter(0) {
            for i in view.intersection_iter(&cell) {
                assert!(i.neighbor());
                if !i.boundary() {
                    continue;
                }
                count += 1;
                let outside = i.outside().unwrap();
                let a = i.geometry().center();
                let other = view
                    .intersection_iter(&outside)
                    .find(|j| Some(j.index_in_inside()) == i.index_in_outside())
                    .unwrap();
                let b = other.geometry().center();
                let differ = (0..2).filter(|d| (a[*d] - b[*d]).abs() > 1e-10).count();
                assert_eq!(differ, 1);
                assert_eq!(other.outside().unwrap(), cell);
                assert_eq!(other.index_in_outside(), Some(i.index_in_inside()));

                // Map the local corners into the outside cell: they must be the corners of this
                // intersection shifted along one axis, in the same order
                let local = i.geometry_in_outside().unwrap();
                let c = outside
                    .geometry()
                    .points()
                    .map(|p| p.to_vec())
                    .collect::<Vec<_>>();
                for (p, xi) in i.geometry().points().zip(local.points()) {
                    let p = p.to_vec();
                    let xi = xi.to_vec();
                    let mapped = (0..2)
                        .map(|d| c[0][d] + xi[0] * (c[1][d] - c[0][d]) + xi[1] * (c[2][d] - c[0][d]))
                        .collect::<Vec<_>>();
                    let differ = (0..2)
                        .filter(|d| (mapped[*d] - p[*d]).abs() > 1e-10)
                        .count();
                    assert_eq!(differ, 1);
                }
            }
        }
        assert_eq!(count, 16);
    }

    #[test]
    fn test_update_is_idempotent() {
        let grid = unit_square::<f64>(3, 2, ReferenceCellType::Triangle).unwrap();
        let mut view = PeriodicGridView::all_periodic(&grid).unwrap();
        let tables = view.tables().clone();
        view.update().unwrap();
        assert_eq!(view.tables(), &tables);
    }

    #[test]
    fn test_neighbor_tables() {
        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Quadrilateral).unwrap();
        let view = PeriodicGridView::all_periodic(&grid).unwrap();
        for cell in grid.entity_iter(0) {
            let neighbors = view
                .tables()
                .neighbors(cell.entity_type(), cell.local_index())
                .unwrap();
            assert_eq!(neighbors.len(), 4);
            assert_eq!(
                neighbors
                    .iter()
                    .filter(|n| **n != PeriodicNeighbor::NonPeriodic)
                    .count(),
                2
            );
        }
    }
}
