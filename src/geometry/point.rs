//! Corner points of geometries
use crate::{traits::Point as PointTrait, types::RealScalar};

/// A point whose coordinates are borrowed from a geometry
#[derive(Debug, Clone, Copy)]
pub struct Point<'a, T: RealScalar> {
    coordinates: &'a [T],
}

impl<'a, T: RealScalar> Point<'a, T> {
    /// Create new
    pub fn new(coordinates: &'a [T]) -> Self {
        Self { coordinates }
    }

    /// The coordinates
    pub fn coordinates(&self) -> &'a [T] {
        self.coordinates
    }
}

impl<T: RealScalar> PointTrait for Point<'_, T> {
    type T = T;

    fn dim(&self) -> usize {
        self.coordinates.len()
    }

    fn coords(&self, data: &mut [T]) {
        data.copy_from_slice(self.coordinates);
    }
}

/// Iterator over the corners of a geometry, in reference order
#[derive(Debug)]
pub struct PointIter<'a, T: RealScalar> {
    corners: std::vec::IntoIter<&'a [T]>,
}

impl<'a, T: RealScalar> PointIter<'a, T> {
    /// Create new
    pub fn new(corners: Vec<&'a [T]>) -> Self {
        Self {
            corners: corners.into_iter(),
        }
    }
}

impl<'a, T: RealScalar> Iterator for PointIter<'a, T> {
    type Item = Point<'a, T>;

    fn next(&mut self) -> Option<Point<'a, T>> {
        self.corners.next().map(Point::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.corners.size_hint()
    }
}

impl<T: RealScalar> ExactSizeIterator for PointIter<'_, T> {}
