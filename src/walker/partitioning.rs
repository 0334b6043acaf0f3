//! Partitioning of the cells of a view into blocks
use crate::traits::GridView;

/// The cells of a view split into contiguous blocks of (almost) equal size
pub struct RangedPartitioning<'g, V: GridView + 'g> {
    elements: Vec<V::Entity<'g>>,
    bounds: Vec<usize>,
}

impl<'g, V: GridView + 'g> RangedPartitioning<'g, V> {
    /// Create new
    ///
    /// At least one partition is created. If there are more partitions than cells, some partitions
    /// are empty.
    pub fn new(view: &'g V, num_partitions: usize) -> Self {
        let elements = view.entity_iter(0).collect::<Vec<_>>();
        let num_partitions = num_partitions.max(1);
        let bounds = (0..=num_partitions)
            .map(|p| p * elements.len() / num_partitions)
            .collect();
        Self { elements, bounds }
    }

    /// Number of partitions
    pub fn partitions(&self) -> usize {
        self.bounds.len() - 1
    }

    /// The cells in a partition
    pub fn partition(&self, index: usize) -> &[V::Entity<'g>] {
        &self.elements[self.bounds[index]..self.bounds[index + 1]]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{reference_cell::ReferenceCellType, shapes::unit_square, traits::Entity};

    #[test]
    fn test_partitions() {
        let grid = unit_square::<f64>(3, 3, ReferenceCellType::Triangle).unwrap();
        let p = RangedPartitioning::new(&grid, 4);
        assert_eq!(p.partitions(), 4);
        let sizes = (0..4).map(|i| p.partition(i).len()).collect::<Vec<_>>();
        assert_eq!(sizes.iter().sum::<usize>(), 18);
        assert!(sizes.iter().all(|s| *s == 4 || *s == 5));

        let mut indices = (0..4)
            .flat_map(|i| p.partition(i).iter().map(|c| c.local_index()))
            .collect::<Vec<_>>();
        indices.sort();
        assert_eq!(indices, (0..18).collect::<Vec<_>>());
    }

    #[test]
    fn test_more_partitions_than_cells() {
        let grid = unit_square::<f64>(1, 1, ReferenceCellType::Quadrilateral).unwrap();
        let p = RangedPartitioning::new(&grid, 3);
        assert_eq!(p.partitions(), 3);
        assert_eq!(
            (0..3).map(|i| p.partition(i).len()).sum::<usize>(),
            1
        );
        assert_eq!(RangedPartitioning::new(&grid, 0).partitions(), 1);
    }
}
