//! Entity iterator of a periodic view
use super::PeriodicTables;
use crate::traits::{Entity, GridView, IndexSet};

/// Iterator over the entities of a periodic view
///
/// Of each set of entities that are periodic images of each other, only the entity on the lower
/// boundary is visited.
pub struct PeriodicEntityIter<'a, G: GridView + 'a> {
    raw: G::EntityIter<'a>,
    index_set: G::IndexSet<'a>,
    tables: Option<&'a PeriodicTables>,
}

impl<'a, G: GridView + 'a> PeriodicEntityIter<'a, G> {
    /// Create new
    ///
    /// `tables` should be `None` for cells, which are never skipped.
    pub fn new(
        raw: G::EntityIter<'a>,
        index_set: G::IndexSet<'a>,
        tables: Option<&'a PeriodicTables>,
    ) -> Self {
        Self {
            raw,
            index_set,
            tables,
        }
    }
}

impl<'a, G: GridView + 'a> Iterator for PeriodicEntityIter<'a, G> {
    type Item = G::Entity<'a>;

    fn next(&mut self) -> Option<G::Entity<'a>> {
        let Some(tables) = self.tables else {
            return self.raw.next();
        };
        let index_set = &self.index_set;
        self.raw
            .by_ref()
            .find(|e| !tables.is_skipped(e.entity_type(), index_set.index(e)))
    }
}
