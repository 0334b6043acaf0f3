//! Single type grid
#[cfg(feature = "serde")]
use crate::traits::ConvertToSerializable;
use crate::{
    geometry::{EntityGeometry, LocalGeometry},
    reference_cell::{self, ReferenceCellType},
    topology::single_type::SingleTypeTopology,
    traits::{Entity, GridView, IndexSet, Intersection},
    types::{GridError, GridResult, Ownership, RealScalar},
};

/// Single type grid entity
#[derive(Debug)]
pub struct SingleTypeGridEntity<'a, T: RealScalar> {
    grid: &'a SingleTypeGrid<T>,
    cell_index: usize,
    entity_dim: usize,
    entity_index: usize,
}

impl<T: RealScalar> Clone for SingleTypeGridEntity<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: RealScalar> Copy for SingleTypeGridEntity<'_, T> {}

impl<T: RealScalar> PartialEq for SingleTypeGridEntity<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.grid, other.grid)
            && self.entity_dim == other.entity_dim
            && self.local_index() == other.local_index()
    }
}
impl<T: RealScalar> Eq for SingleTypeGridEntity<'_, T> {}

impl<'e, T: RealScalar> SingleTypeGridEntity<'e, T> {
    /// Create new
    pub fn new(
        grid: &'e SingleTypeGrid<T>,
        cell_index: usize,
        entity_dim: usize,
        entity_index: usize,
    ) -> Self {
        Self {
            grid,
            cell_index,
            entity_dim,
            entity_index,
        }
    }

    /// The topological dimension of the entity
    pub fn dim(&self) -> usize {
        self.entity_dim
    }

    /// The id given to the entity when the grid was built, if there is one
    pub fn id(&self) -> Option<usize> {
        self.grid
            .topology
            .entity_id(self.entity_dim, self.local_index())
    }
}

impl<T: RealScalar> Entity for SingleTypeGridEntity<'_, T> {
    type T = T;
    type Geometry<'a>
        = EntityGeometry<'a, T>
    where
        Self: 'a;

    fn entity_type(&self) -> ReferenceCellType {
        self.grid.topology.entity_types()[self.entity_dim]
    }
    fn codim(&self) -> usize {
        self.grid.topology.dim() - self.entity_dim
    }
    fn local_index(&self) -> usize {
        self.grid
            .topology
            .cell_entity_index(self.cell_index, self.entity_dim, self.entity_index)
    }
    fn geometry(&self) -> EntityGeometry<'_, T> {
        self.grid
            .entity_geometry(self.entity_dim, self.local_index())
    }
    fn sub_entity_count(&self, codim: usize) -> usize {
        let tdim = self.grid.topology.dim();
        if codim > tdim || tdim - codim > self.entity_dim {
            0
        } else {
            reference_cell::entity_counts(self.entity_type())[tdim - codim]
        }
    }
    fn sub_entity(&self, codim: usize, index: usize) -> Self {
        let sub_dim = self.grid.topology.dim() - codim;
        let sub_index = self.grid.topology.downward_connectivity()[self.entity_dim][sub_dim]
            [self.local_index()][index];
        let (cell_index, entity_index) = self.grid.topology.entity_cells[sub_dim][sub_index];
        Self::new(self.grid, cell_index, sub_dim, entity_index)
    }
    fn has_boundary_intersections(&self) -> bool {
        let tdim = self.grid.topology.dim();
        self.entity_dim == tdim
            && tdim > 0
            && self.grid.topology.downward_connectivity()[tdim][tdim - 1][self.cell_index]
                .iter()
                .any(|f| self.grid.topology.facet_cells(*f).len() == 1)
    }
    fn ownership(&self) -> Ownership {
        Ownership::Owned
    }
}

/// Single type grid entity iterator
#[derive(Debug)]
pub struct SingleTypeGridEntityIter<'a, T: RealScalar> {
    grid: &'a SingleTypeGrid<T>,
    entity_dim: Option<usize>,
    index: usize,
}

impl<'a, T: RealScalar> SingleTypeGridEntityIter<'a, T> {
    /// Create new
    pub fn new(grid: &'a SingleTypeGrid<T>, entity_dim: Option<usize>) -> Self {
        Self {
            grid,
            entity_dim,
            index: 0,
        }
    }
}
impl<'a, T: RealScalar> Iterator for SingleTypeGridEntityIter<'a, T> {
    type Item = SingleTypeGridEntity<'a, T>;

    fn next(&mut self) -> Option<SingleTypeGridEntity<'a, T>> {
        self.index += 1;
        self.grid.entity_of_dim(self.entity_dim?, self.index - 1)
    }
}

/// The intersection of a cell of a single type grid with a neighbour or the boundary
#[derive(Debug, Clone)]
pub struct SingleTypeIntersection<'a, T: RealScalar> {
    grid: &'a SingleTypeGrid<T>,
    cell: usize,
    local_facet: usize,
    facet: usize,
    outside: Option<(usize, usize)>,
}

impl<'a, T: RealScalar> SingleTypeIntersection<'a, T> {
    fn new(grid: &'a SingleTypeGrid<T>, cell: usize, local_facet: usize) -> Self {
        let topology = &grid.topology;
        let tdim = topology.dim();
        let facet = topology.cell_entity_index(cell, tdim - 1, local_facet);
        let outside = topology
            .facet_cells(facet)
            .iter()
            .find(|c| **c != cell)
            .and_then(|c| {
                topology.downward_connectivity()[tdim][tdim - 1][*c]
                    .iter()
                    .position(|f| *f == facet)
                    .map(|l| (*c, l))
            });
        Self {
            grid,
            cell,
            local_facet,
            facet,
            outside,
        }
    }
}

impl<'a, T: RealScalar> Intersection for SingleTypeIntersection<'a, T> {
    type T = T;
    type Entity = SingleTypeGridEntity<'a, T>;
    type Geometry<'b>
        = EntityGeometry<'b, T>
    where
        Self: 'b;

    fn boundary(&self) -> bool {
        self.outside.is_none()
    }
    fn neighbor(&self) -> bool {
        self.outside.is_some()
    }
    fn inside(&self) -> SingleTypeGridEntity<'a, T> {
        SingleTypeGridEntity::new(self.grid, self.cell, self.grid.topology.dim(), 0)
    }
    fn outside(&self) -> Option<SingleTypeGridEntity<'a, T>> {
        self.outside
            .map(|(c, _)| SingleTypeGridEntity::new(self.grid, c, self.grid.topology.dim(), 0))
    }
    fn index_in_inside(&self) -> usize {
        self.local_facet
    }
    fn index_in_outside(&self) -> Option<usize> {
        self.outside.map(|(_, l)| l)
    }
    fn geometry(&self) -> EntityGeometry<'_, T> {
        self.grid
            .entity_geometry(self.grid.topology.dim() - 1, self.facet)
    }
    fn geometry_in_inside(&self) -> LocalGeometry<T> {
        self.grid.local_facet_geometry(self.cell, self.facet)
    }
    fn geometry_in_outside(&self) -> Option<LocalGeometry<T>> {
        self.outside
            .map(|(c, _)| self.grid.local_facet_geometry(c, self.facet))
    }
}

/// Iterator over the intersections of a cell
#[derive(Debug)]
pub struct SingleTypeIntersectionIter<'a, T: RealScalar> {
    grid: &'a SingleTypeGrid<T>,
    cell: usize,
    nfacets: usize,
    index: usize,
}

impl<'a, T: RealScalar> Iterator for SingleTypeIntersectionIter<'a, T> {
    type Item = SingleTypeIntersection<'a, T>;

    fn next(&mut self) -> Option<SingleTypeIntersection<'a, T>> {
        if self.index < self.nfacets {
            self.index += 1;
            Some(SingleTypeIntersection::new(
                self.grid,
                self.cell,
                self.index - 1,
            ))
        } else {
            None
        }
    }
}

/// Index set of a single type grid
#[derive(Debug, Clone, Copy)]
pub struct SingleTypeIndexSet<'a, T: RealScalar> {
    grid: &'a SingleTypeGrid<T>,
}

impl<'a, T: RealScalar> IndexSet for SingleTypeIndexSet<'a, T> {
    type Entity = SingleTypeGridEntity<'a, T>;

    fn index(&self, entity: &Self::Entity) -> usize {
        entity.local_index()
    }
    fn sub_index(&self, entity: &Self::Entity, i: usize, codim: usize) -> usize {
        let sub_dim = self.grid.topology.dim() - codim;
        self.grid.topology.downward_connectivity()[entity.entity_dim][sub_dim]
            [entity.local_index()][i]
    }
    fn types(&self, codim: usize) -> &[ReferenceCellType] {
        self.grid.types(codim)
    }
    fn size(&self, codim: usize) -> usize {
        self.grid.size(codim)
    }
    fn size_of_type(&self, entity_type: ReferenceCellType) -> usize {
        self.grid.size_of_type(entity_type)
    }
    fn contains(&self, entity: &Self::Entity) -> bool {
        std::ptr::eq(self.grid, entity.grid)
    }
}

/// Serial grid with a single cell type and affine cells
#[derive(Debug)]
pub struct SingleTypeGrid<T: RealScalar> {
    gdim: usize,
    points: Vec<T>,
    topology: SingleTypeTopology,
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, Debug, serde::Deserialize)]
#[serde(bound = "for<'de2> T: serde::Deserialize<'de2>")]
/// A serde serializable grid
pub struct SerializableGrid<T: RealScalar + serde::Serialize>
where
    for<'de2> T: serde::Deserialize<'de2>,
{
    gdim: usize,
    cell_type: ReferenceCellType,
    points: Vec<T>,
    cells: Vec<usize>,
    point_ids: Option<Vec<usize>>,
    cell_ids: Option<Vec<usize>>,
}

#[cfg(feature = "serde")]
impl<T: RealScalar + serde::Serialize> ConvertToSerializable for SingleTypeGrid<T>
where
    for<'de2> T: serde::Deserialize<'de2>,
{
    type SerializableType = SerializableGrid<T>;
    fn to_serializable(&self) -> SerializableGrid<T> {
        let tdim = self.topology.dim();
        SerializableGrid {
            gdim: self.gdim,
            cell_type: self.topology.entity_types()[tdim],
            points: self.points.clone(),
            cells: self.topology.downward_connectivity()[tdim][0]
                .iter()
                .flatten()
                .copied()
                .collect(),
            point_ids: self.topology.ids[0].clone(),
            cell_ids: self.topology.ids[tdim].clone(),
        }
    }
    fn from_serializable(s: SerializableGrid<T>) -> GridResult<Self> {
        Self::new(
            s.gdim,
            s.points,
            &s.cells,
            s.cell_type,
            s.point_ids,
            s.cell_ids,
        )
    }
}

impl<T: RealScalar> SingleTypeGrid<T> {
    /// Create new
    ///
    /// `points` holds `gdim` coordinates per point, and `cells` the point indices of each cell in
    /// reference order. Every point must be a vertex of a cell.
    pub fn new(
        gdim: usize,
        points: Vec<T>,
        cells: &[usize],
        cell_type: ReferenceCellType,
        point_ids: Option<Vec<usize>>,
        cell_ids: Option<Vec<usize>>,
    ) -> GridResult<Self> {
        let tdim = reference_cell::dim(cell_type);
        if gdim < tdim || gdim == 0 || points.len() % gdim != 0 {
            return Err(GridError::InvalidConfiguration(format!(
                "{} coordinates do not describe points in {gdim} dimensions for cells of type {cell_type:?}",
                points.len()
            )));
        }
        let npoints = points.len() / gdim;
        if cells.iter().any(|v| *v >= npoints) {
            return Err(GridError::InvalidConfiguration(
                "Cell refers to a point that does not exist".to_string(),
            ));
        }
        let topology = SingleTypeTopology::new(cells, cell_type, point_ids, cell_ids)?;
        if topology.entity_counts()[0] != npoints {
            return Err(GridError::InvalidConfiguration(format!(
                "{npoints} points given but only {} are used by cells",
                topology.entity_counts()[0]
            )));
        }
        Ok(Self {
            gdim,
            points,
            topology,
        })
    }

    /// Create new from raw data
    pub fn new_from_raw_data(
        coordinates: &[T],
        gdim: usize,
        cells: &[usize],
        cell_type: ReferenceCellType,
    ) -> GridResult<Self> {
        Self::new(gdim, coordinates.to_vec(), cells, cell_type, None, None)
    }

    /// The topology
    pub fn topology(&self) -> &SingleTypeTopology {
        &self.topology
    }

    /// The coordinates of a point
    pub fn point(&self, index: usize) -> &[T] {
        &self.points[index * self.gdim..(index + 1) * self.gdim]
    }

    /// An entity from its dimension and index
    pub fn entity_of_dim(
        &self,
        entity_dim: usize,
        index: usize,
    ) -> Option<SingleTypeGridEntity<'_, T>> {
        self.topology
            .entity_cells
            .get(entity_dim)?
            .get(index)
            .map(|(c, l)| SingleTypeGridEntity::new(self, *c, entity_dim, *l))
    }

    /// An entity from the id it was given when the grid was built
    pub fn entity_from_id(
        &self,
        entity_dim: usize,
        id: usize,
    ) -> Option<SingleTypeGridEntity<'_, T>> {
        let index = self
            .topology
            .ids
            .get(entity_dim)?
            .as_ref()?
            .iter()
            .position(|i| *i == id)?;
        self.entity_of_dim(entity_dim, index)
    }

    fn entity_geometry(&self, entity_dim: usize, index: usize) -> EntityGeometry<'_, T> {
        EntityGeometry::new(
            self.topology.entity_types()[entity_dim],
            self.topology
                .entity_vertices(entity_dim, index)
                .iter()
                .map(|v| self.point(*v))
                .collect(),
            self.gdim,
        )
    }

    // The corners of a facet in reference coordinates of a cell, ordered like the corners of
    // the facet's own geometry
    fn local_facet_geometry(&self, cell: usize, facet: usize) -> LocalGeometry<T> {
        let tdim = self.topology.dim();
        let cell_type = self.topology.entity_types()[tdim];
        let facet_type = self.topology.entity_types()[tdim - 1];
        let reference_vertices = reference_cell::vertices::<T>(cell_type);
        let cell_vertices = self.topology.entity_vertices(tdim, cell);
        let corners = self
            .topology
            .entity_vertices(tdim - 1, facet)
            .iter()
            .filter_map(|v| cell_vertices.iter().position(|w| w == v))
            .map(|r| reference_vertices[r].clone())
            .collect();
        LocalGeometry::new(facet_type, corners)
    }
}

impl<T: RealScalar> GridView for SingleTypeGrid<T> {
    type T = T;
    type Entity<'a>
        = SingleTypeGridEntity<'a, T>
    where
        Self: 'a;
    type Intersection<'a>
        = SingleTypeIntersection<'a, T>
    where
        Self: 'a;
    type IndexSet<'a>
        = SingleTypeIndexSet<'a, T>
    where
        Self: 'a;
    type EntityIter<'a>
        = SingleTypeGridEntityIter<'a, T>
    where
        Self: 'a;
    type IntersectionIter<'a>
        = SingleTypeIntersectionIter<'a, T>
    where
        Self: 'a;

    fn dim(&self) -> usize {
        self.topology.dim()
    }
    fn world_dim(&self) -> usize {
        self.gdim
    }
    fn types(&self, codim: usize) -> &[ReferenceCellType] {
        let tdim = self.topology.dim();
        if codim > tdim {
            &[]
        } else {
            &self.topology.entity_types()[tdim - codim..tdim - codim + 1]
        }
    }
    fn size(&self, codim: usize) -> usize {
        let tdim = self.topology.dim();
        if codim > tdim {
            0
        } else {
            self.topology.entity_counts()[tdim - codim]
        }
    }
    fn size_of_type(&self, entity_type: ReferenceCellType) -> usize {
        self.topology.entity_count(entity_type)
    }
    fn index_set(&self) -> SingleTypeIndexSet<'_, T> {
        SingleTypeIndexSet { grid: self }
    }
    fn entity(
        &self,
        entity_type: ReferenceCellType,
        index: usize,
    ) -> Option<SingleTypeGridEntity<'_, T>> {
        let entity_dim = reference_cell::dim(entity_type);
        if self.topology.entity_types().get(entity_dim) == Some(&entity_type) {
            self.entity_of_dim(entity_dim, index)
        } else {
            None
        }
    }
    fn entity_iter(&self, codim: usize) -> SingleTypeGridEntityIter<'_, T> {
        let tdim = self.topology.dim();
        SingleTypeGridEntityIter::new(self, tdim.checked_sub(codim))
    }
    fn intersection_iter<'a>(
        &'a self,
        element: &SingleTypeGridEntity<'a, T>,
    ) -> SingleTypeIntersectionIter<'a, T> {
        let tdim = self.topology.dim();
        let nfacets = if element.entity_dim == tdim && tdim > 0 {
            reference_cell::entity_counts(self.topology.entity_types()[tdim])[tdim - 1]
        } else {
            0
        };
        SingleTypeIntersectionIter {
            grid: self,
            cell: element.local_index(),
            nfacets,
            index: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::{Geometry, Point};
    use approx::assert_relative_eq;

    fn example_grid_triangle() -> SingleTypeGrid<f64> {
        SingleTypeGrid::new_from_raw_data(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            2,
            &[0, 1, 2, 2, 1, 3],
            ReferenceCellType::Triangle,
        )
        .unwrap()
    }

    #[test]
    fn test_counts() {
        let grid = example_grid_triangle();
        assert_eq!(grid.dim(), 2);
        assert_eq!(grid.world_dim(), 2);
        assert_eq!(grid.size(0), 2);
        assert_eq!(grid.size(1), 5);
        assert_eq!(grid.size(2), 4);
        assert_eq!(grid.size(3), 0);
        assert_eq!(grid.types(1), &[ReferenceCellType::Interval]);
        assert_eq!(grid.size_of_type(ReferenceCellType::Point), 4);
        assert_eq!(grid.size_of_type(ReferenceCellType::Quadrilateral), 0);
        assert_eq!(grid.entity_iter(1).count(), 5);
        assert_eq!(grid.entity_iter(3).count(), 0);
    }

    #[test]
    fn test_edges_triangle() {
        let grid = example_grid_triangle();
        let conn = reference_cell::connectivity(ReferenceCellType::Triangle);
        for edge in grid.entity_iter(1) {
            let cell = grid
                .entity(ReferenceCellType::Triangle, edge.cell_index)
                .unwrap();
            for (i, v) in conn[1][edge.entity_index][0].iter().enumerate() {
                assert_eq!(edge.sub_entity(2, i), cell.sub_entity(2, *v));
            }
        }
    }

    #[test]
    fn test_geometry() {
        let grid = example_grid_triangle();
        let cell = grid.entity(ReferenceCellType::Triangle, 1).unwrap();
        assert_relative_eq!(cell.geometry().volume(), 0.5, epsilon = 1e-10);
        let center = cell.geometry().center();
        assert_relative_eq!(center[0], 2.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(center[1], 2.0 / 3.0, epsilon = 1e-10);
        let edge = grid.entity(ReferenceCellType::Interval, 0).unwrap();
        assert_relative_eq!(edge.geometry().volume(), f64::sqrt(2.0), epsilon = 1e-10);
    }

    #[test]
    fn test_intersections() {
        let grid = example_grid_triangle();
        let cell = grid.entity(ReferenceCellType::Triangle, 0).unwrap();
        assert!(cell.has_boundary_intersections());
        let intersections = grid.intersection_iter(&cell).collect::<Vec<_>>();
        assert_eq!(intersections.len(), 3);
        let inner = &intersections[0];
        assert!(inner.neighbor());
        assert!(!inner.boundary());
        assert_eq!(inner.outside().unwrap().local_index(), 1);
        assert_eq!(inner.index_in_outside(), Some(2));
        let n = inner.center_unit_outer_normal();
        assert_relative_eq!(n[0], 1.0 / f64::sqrt(2.0), epsilon = 1e-10);
        assert_relative_eq!(n[1], 1.0 / f64::sqrt(2.0), epsilon = 1e-10);
        for i in &intersections[1..] {
            assert!(i.boundary());
            assert!(i.outside().is_none());
            assert!(i.geometry_in_outside().is_none());
        }
    }

    #[test]
    fn test_geometry_in_inside_and_outside() {
        let grid = example_grid_triangle();
        let cell = grid.entity(ReferenceCellType::Triangle, 0).unwrap();
        let inner = grid.intersection_iter(&cell).next().unwrap();
        let global = inner.geometry().points().map(|p| p.to_vec()).collect::<Vec<_>>();
        let in_inside = inner
            .geometry_in_inside()
            .points()
            .map(|p| p.to_vec())
            .collect::<Vec<_>>();
        let in_outside = inner
            .geometry_in_outside()
            .unwrap()
            .points()
            .map(|p| p.to_vec())
            .collect::<Vec<_>>();
        // The first cell is the reference triangle itself
        assert_eq!(global, in_inside);
        // The second cell has vertices (0,1), (1,0), (1,1)
        assert_eq!(in_outside, vec![vec![1.0, 0.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn test_index_set() {
        let grid = example_grid_triangle();
        let index_set = grid.index_set();
        let cell = grid.entity(ReferenceCellType::Triangle, 1).unwrap();
        assert_eq!(index_set.index(&cell), 1);
        for i in 0..3 {
            assert_eq!(
                index_set.sub_index(&cell, i, 1),
                cell.sub_entity(1, i).local_index()
            );
            assert_eq!(
                index_set.sub_index(&cell, i, 2),
                cell.sub_entity(2, i).local_index()
            );
        }
        assert!(index_set.contains(&cell));
        let other = example_grid_triangle();
        let other_cell = other.entity(ReferenceCellType::Triangle, 1).unwrap();
        assert!(!index_set.contains(&other_cell));
    }

    #[test]
    fn test_unused_point() {
        assert!(SingleTypeGrid::new_from_raw_data(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            2,
            &[0, 1, 2],
            ReferenceCellType::Triangle,
        )
        .is_err());
    }

    #[test]
    fn test_wrong_coordinate_count() {
        assert!(SingleTypeGrid::new_from_raw_data(
            &[0.0, 0.0, 1.0, 0.0, 0.0],
            2,
            &[0, 1, 2],
            ReferenceCellType::Triangle,
        )
        .is_err());
    }
}
