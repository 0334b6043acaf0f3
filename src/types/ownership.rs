//! Ownership
use crate::traits::Entity;

/// Ownership
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Ownership {
    /// Owned by the current process
    Owned,
    /// Ghost on the current process. The two values are the process that owns this and the local index on that process
    Ghost(usize, usize),
}

/// Selection of entities by ownership when iterating
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Partition {
    /// Every entity
    #[default]
    All,
    /// Entities owned by the current process
    Owned,
    /// Ghost entities
    Ghost,
}

impl Partition {
    /// Does this partition include an entity with the given ownership?
    pub fn contains(&self, ownership: Ownership) -> bool {
        match self {
            Partition::All => true,
            Partition::Owned => ownership == Ownership::Owned,
            Partition::Ghost => matches!(ownership, Ownership::Ghost(_, _)),
        }
    }
}

/// Iterator adaptor that only yields entities in a given partition
#[derive(Debug)]
pub struct PartitionIter<I> {
    iter: I,
    partition: Partition,
}

impl<I> PartitionIter<I> {
    /// Create new
    pub fn new(iter: I, partition: Partition) -> Self {
        Self { iter, partition }
    }
}

impl<E: Entity, I: Iterator<Item = E>> Iterator for PartitionIter<I> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        let partition = self.partition;
        self.iter
            .by_ref()
            .find(|e| partition.contains(e.ownership()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partition_contains() {
        assert!(Partition::All.contains(Ownership::Owned));
        assert!(Partition::All.contains(Ownership::Ghost(1, 3)));
        assert!(Partition::Owned.contains(Ownership::Owned));
        assert!(!Partition::Owned.contains(Ownership::Ghost(1, 3)));
        assert!(Partition::Ghost.contains(Ownership::Ghost(0, 0)));
        assert!(!Partition::Ghost.contains(Ownership::Owned));
    }
}
