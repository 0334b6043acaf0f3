//! Intersections between a cell and its neighbours or the boundary
use super::{Entity, Geometry, Point};
use crate::{
    geometry::{unit_outer_normal, LocalGeometry},
    types::RealScalar,
};

/// The intersection of a cell with a neighbour or with the domain boundary
pub trait Intersection {
    /// Scalar type
    type T: RealScalar;

    /// Entity type
    type Entity: Entity<T = Self::T>;

    /// Geometry type
    type Geometry<'a>: Geometry<T = Self::T>
    where
        Self: 'a;

    /// Is the intersection on the domain boundary?
    fn boundary(&self) -> bool;

    /// Is there a cell on the other side of this intersection?
    fn neighbor(&self) -> bool;

    /// The cell this intersection was taken from
    fn inside(&self) -> Self::Entity;

    /// The cell on the other side, if there is one
    fn outside(&self) -> Option<Self::Entity>;

    /// The local facet index of the intersection in the inside cell
    fn index_in_inside(&self) -> usize;

    /// The local facet index of the intersection in the outside cell
    fn index_in_outside(&self) -> Option<usize>;

    /// The geometry of the intersection
    fn geometry(&self) -> Self::Geometry<'_>;

    /// The geometry of the intersection in reference coordinates of the inside cell
    fn geometry_in_inside(&self) -> LocalGeometry<Self::T>;

    /// The geometry of the intersection in reference coordinates of the outside cell
    fn geometry_in_outside(&self) -> Option<LocalGeometry<Self::T>>;

    /// The unit normal at the center of the intersection, pointing out of the inside cell
    fn center_unit_outer_normal(&self) -> Vec<Self::T> {
        let corners = self
            .geometry()
            .points()
            .map(|p| p.to_vec())
            .collect::<Vec<_>>();
        let inside = self.inside();
        let inside_center = inside.geometry().center();
        unit_outer_normal(&corners, &inside_center)
    }
}
