//! Geometry of entities and intersections
use crate::{reference_cell::ReferenceCellType, types::RealScalar};
use itertools::izip;
use num::{One, Zero};

/// A point
pub trait Point {
    /// Scalar type
    type T: RealScalar;

    /// Return the dimension of the point.
    fn dim(&self) -> usize;

    /// Get the coordinates of the point.
    fn coords(&self, data: &mut [Self::T]);

    /// The coordinates of the point as a vector
    fn to_vec(&self) -> Vec<Self::T> {
        let mut data = vec![Self::T::zero(); self.dim()];
        self.coords(&mut data);
        data
    }
}

/// The geometry of an entity
///
/// All geometries are affine: an entity is fully described by its corners.
pub trait Geometry {
    /// Scalar type
    type T: RealScalar;

    /// Point type
    type Point<'a>: Point<T = Self::T>
    where
        Self: 'a;

    /// Point iterator
    type PointIter<'a>: Iterator<Item = Self::Point<'a>>
    where
        Self: 'a;

    /// The reference cell type of the entity
    fn entity_type(&self) -> ReferenceCellType;

    /// Dimension of the space the corners live in
    fn dim(&self) -> usize;

    /// Corners
    fn points(&self) -> Self::PointIter<'_>;

    /// Number of corners
    fn point_count(&self) -> usize;

    /// Volume
    fn volume(&self) -> Self::T;

    /// Center of the entity, the average of its corners
    fn center(&self) -> Vec<Self::T> {
        let mut center = vec![Self::T::zero(); self.dim()];
        let mut coords = vec![Self::T::zero(); self.dim()];
        let mut n = Self::T::zero();
        for p in self.points() {
            p.coords(&mut coords);
            for (c, x) in izip!(center.iter_mut(), &coords) {
                *c = *c + *x;
            }
            n = n + Self::T::one();
        }
        if n > Self::T::zero() {
            for c in center.iter_mut() {
                *c = *c / n;
            }
        }
        center
    }
}
