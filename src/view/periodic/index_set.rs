//! Index set of a periodic view
use super::PeriodicTables;
use crate::{
    reference_cell::ReferenceCellType,
    traits::{Entity, GridView, IndexSet},
    types::{GridError, GridResult},
};

/// Index set that gives periodic images of an entity the same index
///
/// Cells keep the index they have in the wrapped grid.
pub struct PeriodicIndexSet<'a, G: GridView + 'a> {
    raw: G::IndexSet<'a>,
    tables: &'a PeriodicTables,
}

impl<'a, G: GridView + 'a> PeriodicIndexSet<'a, G> {
    /// Create new
    pub fn new(raw: G::IndexSet<'a>, tables: &'a PeriodicTables) -> Self {
        Self { raw, tables }
    }

    /// The index set of the wrapped grid
    pub fn raw(&self) -> &G::IndexSet<'a> {
        &self.raw
    }

    /// The periodic index of an entity, or an error if the view does not index it
    pub fn try_index(&self, entity: &G::Entity<'a>) -> GridResult<usize> {
        self.try_collapse(
            entity.codim(),
            entity.entity_type(),
            self.raw.index(entity),
        )
    }

    fn try_collapse(
        &self,
        codim: usize,
        entity_type: ReferenceCellType,
        raw_index: usize,
    ) -> GridResult<usize> {
        if codim == 0 {
            return Ok(raw_index);
        }
        self.tables
            .new_index(entity_type, raw_index)
            .ok_or_else(|| {
                GridError::InvalidState(format!(
                    "{entity_type:?} entity {raw_index} is not indexed by the periodic view"
                ))
            })
    }

    fn collapse(&self, codim: usize, entity_type: ReferenceCellType, raw_index: usize) -> usize {
        let index = self.try_collapse(codim, entity_type, raw_index);
        debug_assert!(index.is_ok(), "{index:?}");
        index.unwrap_or(usize::MAX)
    }
}

impl<'a, G: GridView + 'a> IndexSet for PeriodicIndexSet<'a, G> {
    type Entity = G::Entity<'a>;

    fn index(&self, entity: &Self::Entity) -> usize {
        self.collapse(
            entity.codim(),
            entity.entity_type(),
            self.raw.index(entity),
        )
    }
    fn sub_index(&self, entity: &Self::Entity, i: usize, codim: usize) -> usize {
        let raw_index = self.raw.sub_index(entity, i, codim);
        if codim == 0 {
            raw_index
        } else {
            self.collapse(codim, entity.sub_entity(codim, i).entity_type(), raw_index)
        }
    }
    fn types(&self, codim: usize) -> &[ReferenceCellType] {
        self.raw.types(codim)
    }
    fn size(&self, codim: usize) -> usize {
        self.tables.entity_count(codim)
    }
    fn size_of_type(&self, entity_type: ReferenceCellType) -> usize {
        self.tables.type_count(entity_type)
    }
    fn contains(&self, entity: &Self::Entity) -> bool {
        self.raw.contains(entity)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        reference_cell::ReferenceCellType,
        shapes::{unit_cube, unit_square},
        traits::GridView,
        types::GridError,
        view::PeriodicGridView,
    };

    #[test]
    fn test_try_index() {
        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Triangle).unwrap();
        let view = PeriodicGridView::all_periodic(&grid).unwrap();
        let index_set = view.index_set();
        for codim in 0..3 {
            for e in view.entity_iter(codim) {
                assert!(index_set.try_index(&e).unwrap() < view.size(codim));
            }
        }

        // A face of a tetrahedron has a type that the view never tabulated
        let other = unit_cube::<f64>(1, 1, 1, ReferenceCellType::Tetrahedron).unwrap();
        let face = other.entity(ReferenceCellType::Triangle, 0).unwrap();
        assert!(matches!(
            index_set.try_index(&face),
            Err(GridError::InvalidState(_))
        ));

        // An edge past the end of the tables
        let larger = unit_square::<f64>(4, 4, ReferenceCellType::Triangle).unwrap();
        let edge = larger
            .entity(ReferenceCellType::Interval, larger.size(1) - 1)
            .unwrap();
        assert!(matches!(
            index_set.try_index(&edge),
            Err(GridError::InvalidState(_))
        ));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn test_index_of_foreign_entity() {
        use crate::traits::IndexSet;

        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Triangle).unwrap();
        let view = PeriodicGridView::all_periodic(&grid).unwrap();
        let other = unit_cube::<f64>(1, 1, 1, ReferenceCellType::Tetrahedron).unwrap();
        let face = other.entity(ReferenceCellType::Triangle, 0).unwrap();
        view.index_set().index(&face);
    }
}
