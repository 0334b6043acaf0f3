//! Subdomain grid view
use super::{
    SubdomainEntity, SubdomainEntityIter, SubdomainIndexSet, SubdomainIntersectionIter,
    SubdomainTables,
};
use crate::{
    reference_cell::ReferenceCellType,
    traits::{GridView, IndexSet},
    types::{GridError, GridResult},
};
use log::info;
use std::collections::HashSet;

/// A view of a subset of the cells of a grid
///
/// The view contains the selected cells and all of their sub-entities, numbered consecutively.
/// Intersections between a selected cell and a cell that was not selected are treated as domain
/// boundary: they report [crate::traits::Intersection::boundary], have no neighbour, and count
/// as boundary intersections of their cell.
///
/// Cells are identified by the raw indices of the wrapped grid, so [GridView::entity] takes raw
/// indices. It returns `None` for entities outside the subdomain.
#[derive(Debug)]
pub struct SubdomainView<'g, G: GridView> {
    grid: &'g G,
    tables: SubdomainTables,
}

impl<'g, G: GridView> SubdomainView<'g, G> {
    /// Create new from the cells accepted by `selected`
    pub fn new(grid: &'g G, selected: impl Fn(&G::Entity<'g>) -> bool) -> GridResult<Self> {
        let tables = SubdomainTables::build(grid, selected)?;
        if tables.entity_count(0) == 0 {
            return Err(GridError::InvalidConfiguration(
                "A subdomain needs at least one cell".to_string(),
            ));
        }
        info!(
            "Built subdomain view with {:?} entities per codimension",
            (0..=grid.dim())
                .map(|c| tables.entity_count(c))
                .collect::<Vec<_>>()
        );
        Ok(Self { grid, tables })
    }

    /// Create new from the raw indices of the cells
    pub fn from_cells(grid: &'g G, cells: &[usize]) -> GridResult<Self> {
        if let Some(c) = cells.iter().find(|c| **c >= grid.size(0)) {
            return Err(GridError::InvalidConfiguration(format!(
                "Cell {c} is out of range for a grid with {} cells",
                grid.size(0)
            )));
        }
        let cells = cells.iter().copied().collect::<HashSet<_>>();
        let index_set = grid.index_set();
        Self::new(grid, |cell| cells.contains(&index_set.index(cell)))
    }

    /// The wrapped grid
    pub fn grid(&self) -> &'g G {
        self.grid
    }

    /// The index tables
    pub fn tables(&self) -> &SubdomainTables {
        &self.tables
    }
}

impl<'g, G: GridView> GridView for SubdomainView<'g, G> {
    type T = G::T;
    type Entity<'a>
        = SubdomainEntity<'a, G>
    where
        Self: 'a;
    type Intersection<'a>
        = super::SubdomainIntersection<'a, G>
    where
        Self: 'a;
    type IndexSet<'a>
        = SubdomainIndexSet<'a, G>
    where
        Self: 'a;
    type EntityIter<'a>
        = SubdomainEntityIter<'a, G>
    where
        Self: 'a;
    type IntersectionIter<'a>
        = SubdomainIntersectionIter<'a, G>
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
    fn index_set(&self) -> SubdomainIndexSet<'_, G> {
        SubdomainIndexSet::new(self.grid.index_set(), &self.tables)
    }
    fn entity(
        &self,
        entity_type: ReferenceCellType,
        index: usize,
    ) -> Option<SubdomainEntity<'_, G>> {
        let grid: &G = self.grid;
        let raw = grid.entity(entity_type, index)?;
        let raw_index = grid.index_set().index(&raw);
        self.tables
            .contains(entity_type, raw_index)
            .then(|| SubdomainEntity::wrap(raw, raw_index, &self.tables))
    }
    fn entity_iter(&self, codim: usize) -> SubdomainEntityIter<'_, G> {
        SubdomainEntityIter::new(
            self.grid.entity_iter(codim),
            self.grid.index_set(),
            &self.tables,
        )
    }
    fn intersection_iter<'a>(
        &'a self,
        element: &SubdomainEntity<'a, G>,
    ) -> SubdomainIntersectionIter<'a, G> {
        let grid: &'a G = self.grid;
        SubdomainIntersectionIter::new(
            grid.intersection_iter(element.raw()),
            element.clone(),
            grid.index_set(),
            &self.tables,
        )
    }
}
