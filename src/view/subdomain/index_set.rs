//! Index set of a subdomain view
use super::{SubdomainEntity, SubdomainTables};
use crate::{
    reference_cell::ReferenceCellType,
    traits::{Entity, GridView, IndexSet},
    types::{GridError, GridResult},
};

/// Index set that numbers the entities of a subdomain consecutively
pub struct SubdomainIndexSet<'a, G: GridView + 'a> {
    raw: G::IndexSet<'a>,
    tables: &'a SubdomainTables,
}

impl<'a, G: GridView + 'a> SubdomainIndexSet<'a, G> {
    /// Create new
    pub fn new(raw: G::IndexSet<'a>, tables: &'a SubdomainTables) -> Self {
        Self { raw, tables }
    }

    /// The index set of the wrapped grid
    pub fn raw(&self) -> &G::IndexSet<'a> {
        &self.raw
    }

    /// The index of an entity in the subdomain, or an error if it is not part of the subdomain
    pub fn try_index(&self, entity: &SubdomainEntity<'a, G>) -> GridResult<usize> {
        self.lookup(entity.entity_type(), self.raw.index(entity.raw()))
    }

    fn lookup(&self, entity_type: ReferenceCellType, raw_index: usize) -> GridResult<usize> {
        self.tables
            .new_index(entity_type, raw_index)
            .ok_or_else(|| {
                GridError::InvalidState(format!(
                    "{entity_type:?} entity {raw_index} is not part of the subdomain"
                ))
            })
    }

    fn checked(&self, entity_type: ReferenceCellType, raw_index: usize) -> usize {
        let index = self.lookup(entity_type, raw_index);
        debug_assert!(index.is_ok(), "{index:?}");
        index.unwrap_or(usize::MAX)
    }
}

impl<'a, G: GridView + 'a> IndexSet for SubdomainIndexSet<'a, G> {
    type Entity = SubdomainEntity<'a, G>;

    fn index(&self, entity: &Self::Entity) -> usize {
        self.checked(entity.entity_type(), self.raw.index(entity.raw()))
    }
    fn sub_index(&self, entity: &Self::Entity, i: usize, codim: usize) -> usize {
        let raw_index = self.raw.sub_index(entity.raw(), i, codim);
        self.checked(entity.raw().sub_entity(codim, i).entity_type(), raw_index)
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
        self.raw.contains(entity.raw())
            && self
                .tables
                .contains(entity.entity_type(), self.raw.index(entity.raw()))
    }
}
