//! Geometry of an entity of a grid with affine cells
use super::affine_volume;
use crate::{
    geometry::{Point, PointIter},
    reference_cell::ReferenceCellType,
    traits::Geometry,
    types::RealScalar,
};

/// Geometry of an entity, described by its corners in the grid's coordinate array
#[derive(Debug, Clone)]
pub struct EntityGeometry<'a, T: RealScalar> {
    entity_type: ReferenceCellType,
    corners: Vec<&'a [T]>,
    dim: usize,
}

impl<'a, T: RealScalar> EntityGeometry<'a, T> {
    /// Create new
    pub fn new(entity_type: ReferenceCellType, corners: Vec<&'a [T]>, dim: usize) -> Self {
        Self {
            entity_type,
            corners,
            dim,
        }
    }
}

impl<T: RealScalar> Geometry for EntityGeometry<'_, T> {
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
        self.dim
    }
    fn points(&self) -> PointIter<'_, T> {
        PointIter::new(self.corners.clone())
    }
    fn point_count(&self) -> usize {
        self.corners.len()
    }
    fn volume(&self) -> T {
        affine_volume(self.entity_type, &self.corners)
    }
}
