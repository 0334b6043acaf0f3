//! Geometry of a sub-entity in the reference coordinates of a cell
use super::affine_volume;
use crate::{
    geometry::{Point, PointIter},
    reference_cell::{self, ReferenceCellType},
    traits::Geometry,
    types::RealScalar,
};

/// Owned geometry in the reference coordinates of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct LocalGeometry<T: RealScalar> {
    entity_type: ReferenceCellType,
    corners: Vec<Vec<T>>,
}

impl<T: RealScalar> LocalGeometry<T> {
    /// Create new
    pub fn new(entity_type: ReferenceCellType, corners: Vec<Vec<T>>) -> Self {
        Self {
            entity_type,
            corners,
        }
    }

    /// The geometry of a facet of a reference cell
    pub fn facet(cell_type: ReferenceCellType, facet_index: usize) -> Self {
        let tdim = reference_cell::dim(cell_type);
        let vertices = reference_cell::vertices::<T>(cell_type);
        let facet_type = reference_cell::entity_types(cell_type)[tdim - 1][facet_index];
        let corners = reference_cell::sub_entity_vertices(cell_type, tdim - 1)[facet_index]
            .iter()
            .map(|v| vertices[*v].clone())
            .collect();
        Self::new(facet_type, corners)
    }
}

impl<T: RealScalar> Geometry for LocalGeometry<T> {
    type T = T;
    type Point<'a>
        = Point<'a, T>
    where
        Self: 'a;
    type PointIter<'a>
        = PointIter<'a, T>
    where
        Self: 'a;

    fn entity_type(&self) -> ReferenceCellType {
        self.entity_type
    }
    fn dim(&self) -> usize {
        self.corners.first().map_or(0, |c| c.len())
    }
    fn points(&self) -> PointIter<'_, T> {
        PointIter::new(self.corners.iter().map(|c| c.as_slice()).collect())
    }
    fn point_count(&self) -> usize {
        self.corners.len()
    }
    fn volume(&self) -> T {
        let corners = self
            .corners
            .iter()
            .map(|c| c.as_slice())
            .collect::<Vec<_>>();
        affine_volume(self.entity_type, &corners)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadrilateral_facets() {
        let g = LocalGeometry::<f64>::facet(ReferenceCellType::Quadrilateral, 1);
        assert_eq!(g.entity_type(), ReferenceCellType::Interval);
        assert_eq!(g.center(), vec![0.0, 0.5]);
        assert_relative_eq!(g.volume(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_triangle_facets() {
        let g = LocalGeometry::<f64>::facet(ReferenceCellType::Triangle, 0);
        assert_eq!(g.center(), vec![0.5, 0.5]);
        assert_relative_eq!(g.volume(), f64::sqrt(2.0), epsilon = 1e-10);
    }
}
