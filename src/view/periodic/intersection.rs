//! Intersections of a periodic view
use super::PeriodicNeighbor;
use crate::{
    geometry::LocalGeometry,
    traits::{Geometry, GridView, Intersection, Point},
    types::float_eq,
};
use itertools::izip;

/// An intersection of a periodic view
///
/// Away from periodic boundaries this behaves exactly like the intersection of the wrapped grid.
/// On a periodic boundary, the intersection still reports [Intersection::boundary] but also has a
/// neighbour: the cell on the opposite side of the domain.
pub struct PeriodicIntersection<'a, G: GridView + 'a> {
    raw: G::Intersection<'a>,
    grid: &'a G,
    neighbor: PeriodicNeighbor,
}

impl<'a, G: GridView + 'a> PeriodicIntersection<'a, G> {
    /// Create new
    pub fn new(raw: G::Intersection<'a>, grid: &'a G, neighbor: PeriodicNeighbor) -> Self {
        Self {
            raw,
            grid,
            neighbor,
        }
    }

    /// Is this intersection on a periodic boundary?
    pub fn periodic(&self) -> bool {
        matches!(self.neighbor, PeriodicNeighbor::Periodic { .. })
    }

    /// The intersection of the wrapped grid
    pub fn raw(&self) -> &G::Intersection<'a> {
        &self.raw
    }

    // The facet of the opposite cell that matches this intersection
    fn outside_intersection(&self) -> Option<G::Intersection<'a>> {
        let PeriodicNeighbor::Periodic {
            index_in_outside, ..
        } = self.neighbor
        else {
            return None;
        };
        let outside = self.outside()?;
        self.grid
            .intersection_iter(&outside)
            .find(|i| i.index_in_inside() == index_in_outside)
    }
}

fn corners<Geo: Geometry>(geometry: &Geo) -> Vec<Vec<Geo::T>> {
    geometry.points().map(|p| p.to_vec()).collect()
}

impl<'a, G: GridView + 'a> Intersection for PeriodicIntersection<'a, G> {
    type T = G::T;
    type Entity = G::Entity<'a>;
    type Geometry<'b>
        = <G::Intersection<'a> as Intersection>::Geometry<'b>
    where
        Self: 'b;

    fn boundary(&self) -> bool {
        self.raw.boundary()
    }
    fn neighbor(&self) -> bool {
        self.periodic() || self.raw.neighbor()
    }
    fn inside(&self) -> G::Entity<'a> {
        self.raw.inside()
    }
    fn outside(&self) -> Option<G::Entity<'a>> {
        match self.neighbor {
            PeriodicNeighbor::Periodic {
                outside_type,
                outside_index,
                ..
            } => self.grid.entity(outside_type, outside_index),
            PeriodicNeighbor::NonPeriodic => self.raw.outside(),
        }
    }
    fn index_in_inside(&self) -> usize {
        self.raw.index_in_inside()
    }
    fn index_in_outside(&self) -> Option<usize> {
        match self.neighbor {
            PeriodicNeighbor::Periodic {
                index_in_outside, ..
            } => Some(index_in_outside),
            PeriodicNeighbor::NonPeriodic => self.raw.index_in_outside(),
        }
    }
    fn geometry(&self) -> Self::Geometry<'_> {
        self.raw.geometry()
    }
    fn geometry_in_inside(&self) -> LocalGeometry<G::T> {
        self.raw.geometry_in_inside()
    }
    fn geometry_in_outside(&self) -> Option<LocalGeometry<G::T>> {
        if !self.periodic() {
            return self.raw.geometry_in_outside();
        }
        let other = self.outside_intersection()?;
        let local = other.geometry_in_inside();

        // Order the corners of the local geometry like the corners of this intersection. The
        // corners of the two facets agree in every coordinate except along the periodic axis.
        let own = corners(&self.geometry());
        let opposite = corners(&other.geometry());
        let local_corners = corners(&local);
        let reordered = own
            .iter()
            .map(|p| {
                opposite
                    .iter()
                    .position(|q| izip!(p, q).filter(|(a, b)| !float_eq(**a, **b)).count() <= 1)
                    .map(|j| local_corners[j].clone())
            })
            .collect::<Option<Vec<_>>>();
        Some(match reordered {
            Some(c) => LocalGeometry::new(local.entity_type(), c),
            None => local,
        })
    }
}

/// Iterator over the intersections of a cell of a periodic view
pub struct PeriodicIntersectionIter<'a, G: GridView + 'a> {
    raw: G::IntersectionIter<'a>,
    grid: &'a G,
    neighbors: Option<&'a [PeriodicNeighbor]>,
}

impl<'a, G: GridView + 'a> PeriodicIntersectionIter<'a, G> {
    /// Create new
    ///
    /// `neighbors` holds the periodic neighbour of each facet, and is `None` for cells without
    /// boundary facets.
    pub fn new(
        raw: G::IntersectionIter<'a>,
        grid: &'a G,
        neighbors: Option<&'a [PeriodicNeighbor]>,
    ) -> Self {
        Self {
            raw,
            grid,
            neighbors,
        }
    }
}

impl<'a, G: GridView + 'a> Iterator for PeriodicIntersectionIter<'a, G> {
    type Item = PeriodicIntersection<'a, G>;

    fn next(&mut self) -> Option<PeriodicIntersection<'a, G>> {
        let raw = self.raw.next()?;
        let neighbor = self
            .neighbors
            .and_then(|n| n.get(raw.index_in_inside()))
            .copied()
            .unwrap_or(PeriodicNeighbor::NonPeriodic);
        Some(PeriodicIntersection::new(raw, self.grid, neighbor))
    }
}
