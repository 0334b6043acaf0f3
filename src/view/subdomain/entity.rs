//! Entities of a subdomain view
use super::SubdomainTables;
use crate::{
    reference_cell::ReferenceCellType,
    traits::{Entity, GridView, IndexSet},
    types::Ownership,
};
use std::fmt;

/// An entity of a subdomain view
///
/// Cells that share a facet with a cell outside the subdomain have boundary intersections.
pub struct SubdomainEntity<'a, G: GridView + 'a> {
    raw: G::Entity<'a>,
    interface: bool,
}

impl<'a, G: GridView + 'a> SubdomainEntity<'a, G> {
    /// Create new
    pub fn new(raw: G::Entity<'a>, interface: bool) -> Self {
        Self { raw, interface }
    }

    /// Wrap an entity of the grid, looking up whether it is a cell on the subdomain interface
    pub(crate) fn wrap(raw: G::Entity<'a>, raw_index: usize, tables: &SubdomainTables) -> Self {
        let interface = raw.codim() == 0 && tables.on_interface(raw.entity_type(), raw_index);
        Self::new(raw, interface)
    }

    /// The entity of the wrapped grid
    pub fn raw(&self) -> &G::Entity<'a> {
        &self.raw
    }
}

impl<'a, G: GridView + 'a> Clone for SubdomainEntity<'a, G> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone(), self.interface)
    }
}

impl<'a, G: GridView + 'a> fmt::Debug for SubdomainEntity<'a, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubdomainEntity")
            .field("raw", &self.raw)
            .field("interface", &self.interface)
            .finish()
    }
}

impl<'a, G: GridView + 'a> PartialEq for SubdomainEntity<'a, G>
where
    G::Entity<'a>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<'a, G: GridView + 'a> Entity for SubdomainEntity<'a, G> {
    type T = G::T;
    type Geometry<'b>
        = <G::Entity<'a> as Entity>::Geometry<'b>
    where
        Self: 'b;

    fn entity_type(&self) -> ReferenceCellType {
        self.raw.entity_type()
    }
    fn codim(&self) -> usize {
        self.raw.codim()
    }
    fn local_index(&self) -> usize {
        self.raw.local_index()
    }
    fn geometry(&self) -> Self::Geometry<'_> {
        self.raw.geometry()
    }
    fn sub_entity_count(&self, codim: usize) -> usize {
        self.raw.sub_entity_count(codim)
    }
    fn sub_entity(&self, codim: usize, index: usize) -> Self {
        // Only a cell itself can be on the interface
        Self::new(
            self.raw.sub_entity(codim, index),
            self.interface && codim == 0,
        )
    }
    fn has_boundary_intersections(&self) -> bool {
        self.interface || self.raw.has_boundary_intersections()
    }
    fn ownership(&self) -> Ownership {
        self.raw.ownership()
    }
}

/// Iterator over the entities of a subdomain view
pub struct SubdomainEntityIter<'a, G: GridView + 'a> {
    raw: G::EntityIter<'a>,
    index_set: G::IndexSet<'a>,
    tables: &'a SubdomainTables,
}

impl<'a, G: GridView + 'a> SubdomainEntityIter<'a, G> {
    /// Create new
    pub fn new(
        raw: G::EntityIter<'a>,
        index_set: G::IndexSet<'a>,
        tables: &'a SubdomainTables,
    ) -> Self {
        Self {
            raw,
            index_set,
            tables,
        }
    }
}

impl<'a, G: GridView + 'a> Iterator for SubdomainEntityIter<'a, G> {
    type Item = SubdomainEntity<'a, G>;

    fn next(&mut self) -> Option<SubdomainEntity<'a, G>> {
        let index_set = &self.index_set;
        let tables = self.tables;
        self.raw.by_ref().find_map(|e| {
            let raw_index = index_set.index(&e);
            tables
                .contains(e.entity_type(), raw_index)
                .then(|| SubdomainEntity::wrap(e, raw_index, tables))
        })
    }
}
