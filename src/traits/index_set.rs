//! Index sets
use crate::reference_cell::ReferenceCellType;

/// A map from entities to consecutive indices
///
/// For each entity type the indices run from 0 to `size_of_type - 1`.
pub trait IndexSet {
    /// Entity type
    type Entity;

    /// The index of an entity
    fn index(&self, entity: &Self::Entity) -> usize;

    /// The index of the `i`th sub-entity of codimension `codim` of a cell
    fn sub_index(&self, entity: &Self::Entity, i: usize, codim: usize) -> usize;

    /// The entity types of the given codimension
    fn types(&self, codim: usize) -> &[ReferenceCellType];

    /// Number of indices of the given codimension
    fn size(&self, codim: usize) -> usize;

    /// Number of indices of the given entity type
    fn size_of_type(&self, entity_type: ReferenceCellType) -> usize;

    /// Does the index set index this entity?
    fn contains(&self, entity: &Self::Entity) -> bool;
}
