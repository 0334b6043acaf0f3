//! Index tables of a subdomain view
use crate::{
    reference_cell::ReferenceCellType,
    traits::{Entity, GridView, IndexSet, Intersection},
    types::{GridError, GridResult},
};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Index tables of a subdomain view
///
/// For every entity type of the wrapped grid, `new_indices` maps the raw index of each entity to
/// its index in the subdomain, or to `None` if the entity is not a sub-entity of any cell of the
/// subdomain. Cells with a facet shared with a cell outside the subdomain are recorded in
/// `interface_cells`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubdomainTables {
    entity_counts: Vec<usize>,
    type_counts: HashMap<ReferenceCellType, usize>,
    new_indices: HashMap<ReferenceCellType, Vec<Option<usize>>>,
    interface_cells: HashSet<(ReferenceCellType, usize)>,
}

impl SubdomainTables {
    /// Build the tables for the cells of a grid accepted by `selected`
    pub(crate) fn build<'g, G: GridView>(
        grid: &'g G,
        selected: impl Fn(&G::Entity<'g>) -> bool,
    ) -> GridResult<Self> {
        let dim = grid.dim();
        let mut tables = Self {
            entity_counts: vec![0; dim + 1],
            ..Default::default()
        };
        for codim in 0..=dim {
            for t in grid.types(codim) {
                tables
                    .new_indices
                    .insert(*t, vec![None; grid.size_of_type(*t)]);
                tables.type_counts.insert(*t, 0);
            }
        }

        let index_set = grid.index_set();
        let cells = grid
            .entity_iter(0)
            .filter(|cell| selected(cell))
            .collect::<Vec<_>>();
        for cell in &cells {
            tables.insert(0, cell.entity_type(), index_set.index(cell))?;
            for codim in 1..=dim {
                for i in 0..cell.sub_entity_count(codim) {
                    let entity_type = cell.sub_entity(codim, i).entity_type();
                    tables.insert(codim, entity_type, index_set.sub_index(cell, i, codim))?;
                }
            }
        }

        for cell in &cells {
            let on_interface = grid.intersection_iter(cell).any(|i| {
                i.outside()
                    .filter(|_| i.neighbor())
                    .is_some_and(|o| !tables.contains(o.entity_type(), index_set.index(&o)))
            });
            if on_interface {
                tables
                    .interface_cells
                    .insert((cell.entity_type(), index_set.index(cell)));
            }
        }
        debug!(
            "Subdomain of {} cells, {} of them on the interface",
            cells.len(),
            tables.interface_cells.len()
        );
        Ok(tables)
    }

    fn insert(
        &mut self,
        codim: usize,
        entity_type: ReferenceCellType,
        raw_index: usize,
    ) -> GridResult<()> {
        let slot = self
            .new_indices
            .get_mut(&entity_type)
            .and_then(|n| n.get_mut(raw_index))
            .ok_or_else(|| {
                GridError::InvalidState(format!(
                    "Raw index {raw_index} of {entity_type:?} is out of range"
                ))
            })?;
        if slot.is_none() {
            let count = self.type_counts.entry(entity_type).or_insert(0);
            *slot = Some(*count);
            *count += 1;
            self.entity_counts[codim] += 1;
        }
        Ok(())
    }

    /// Number of entities of a codimension in the subdomain
    pub fn entity_count(&self, codim: usize) -> usize {
        self.entity_counts.get(codim).copied().unwrap_or(0)
    }

    /// Number of entities of a type in the subdomain
    pub fn type_count(&self, entity_type: ReferenceCellType) -> usize {
        self.type_counts.get(&entity_type).copied().unwrap_or(0)
    }

    /// The index of an entity in the subdomain
    pub fn new_index(&self, entity_type: ReferenceCellType, raw_index: usize) -> Option<usize> {
        *self.new_indices.get(&entity_type)?.get(raw_index)?
    }

    /// Is the entity part of the subdomain?
    pub fn contains(&self, entity_type: ReferenceCellType, raw_index: usize) -> bool {
        self.new_index(entity_type, raw_index).is_some()
    }

    /// Does the cell share a facet with a cell outside the subdomain?
    pub fn on_interface(&self, cell_type: ReferenceCellType, raw_index: usize) -> bool {
        self.interface_cells.contains(&(cell_type, raw_index))
    }
}
