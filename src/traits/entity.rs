//! Traits for a mesh entity
use super::Geometry;
use crate::{reference_cell::ReferenceCellType, types::Ownership, types::RealScalar};

/// An entity
///
/// Codimensions are relative to the grid the entity belongs to: cells have codimension 0,
/// vertices have codimension equal to the grid dimension.
pub trait Entity {
    /// Scalar type
    type T: RealScalar;

    /// Geometry type
    type Geometry<'a>: Geometry<T = Self::T>
    where
        Self: 'a;

    /// The entity type (eg triangle, quadrilateral) of this entity
    fn entity_type(&self) -> ReferenceCellType;

    /// The codimension of this entity
    fn codim(&self) -> usize;

    /// The index of this entity in the grid it was taken from
    fn local_index(&self) -> usize;

    /// The geometry of this entity
    fn geometry(&self) -> Self::Geometry<'_>;

    /// Number of sub-entities of the given codimension
    fn sub_entity_count(&self, codim: usize) -> usize;

    /// A sub-entity of this entity
    fn sub_entity(&self, codim: usize, index: usize) -> Self
    where
        Self: Sized;

    /// Does this entity have a facet on the domain boundary?
    ///
    /// Always false for entities that are not cells.
    fn has_boundary_intersections(&self) -> bool;

    /// The ownership of this entity
    fn ownership(&self) -> Ownership;
}
