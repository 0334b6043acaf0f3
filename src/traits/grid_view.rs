//! Grid views
use super::{Entity, IndexSet, Intersection};
use crate::{
    reference_cell::ReferenceCellType,
    types::{Partition, PartitionIter, RealScalar},
};
use std::fmt::Debug;
use std::iter::Iterator;

/// A view on a grid
///
/// A grid view gives access to the entities of each codimension, their indices and the
/// intersections of each cell with its neighbours and the boundary.
pub trait GridView {
    /// Scalar type
    type T: RealScalar;

    /// Entity type
    type Entity<'a>: Entity<T = Self::T> + Clone + Debug
    where
        Self: 'a;

    /// Intersection type
    type Intersection<'a>: Intersection<T = Self::T, Entity = Self::Entity<'a>>
    where
        Self: 'a;

    /// Index set type
    type IndexSet<'a>: IndexSet<Entity = Self::Entity<'a>>
    where
        Self: 'a;

    /// Iterator over entities
    type EntityIter<'a>: Iterator<Item = Self::Entity<'a>>
    where
        Self: 'a;

    /// Iterator over the intersections of a cell
    type IntersectionIter<'a>: Iterator<Item = Self::Intersection<'a>>
    where
        Self: 'a;

    /// Topological dimension of the cells
    fn dim(&self) -> usize;

    /// Dimension of the space the grid lives in
    fn world_dim(&self) -> usize;

    /// The entity types of the given codimension
    fn types(&self, codim: usize) -> &[ReferenceCellType];

    /// Number of entities of the given codimension
    fn size(&self, codim: usize) -> usize;

    /// Number of entities of the given type
    fn size_of_type(&self, entity_type: ReferenceCellType) -> usize;

    /// The index set
    fn index_set(&self) -> Self::IndexSet<'_>;

    /// An entity from its type and raw index
    fn entity(&self, entity_type: ReferenceCellType, index: usize) -> Option<Self::Entity<'_>>;

    /// Iterator over the entities of a codimension
    fn entity_iter(&self, codim: usize) -> Self::EntityIter<'_>;

    /// Iterator over the entities of a codimension in a partition
    fn partition_iter(
        &self,
        codim: usize,
        partition: Partition,
    ) -> PartitionIter<Self::EntityIter<'_>> {
        PartitionIter::new(self.entity_iter(codim), partition)
    }

    /// Iterator over the intersections of a cell
    fn intersection_iter<'a>(&'a self, element: &Self::Entity<'a>) -> Self::IntersectionIter<'a>;
}
