//! Intersections of a subdomain view
use super::{SubdomainEntity, SubdomainTables};
use crate::{
    geometry::LocalGeometry,
    traits::{Entity, GridView, IndexSet, Intersection},
};

/// An intersection of a subdomain view
///
/// An intersection between a cell of the subdomain and a cell outside it looks like part of the
/// domain boundary: it reports [Intersection::boundary] and has no neighbour.
pub struct SubdomainIntersection<'a, G: GridView + 'a> {
    raw: G::Intersection<'a>,
    inside: SubdomainEntity<'a, G>,
    outside: Option<SubdomainEntity<'a, G>>,
    interface: bool,
}

impl<'a, G: GridView + 'a> SubdomainIntersection<'a, G> {
    /// The intersection of the wrapped grid
    pub fn raw(&self) -> &G::Intersection<'a> {
        &self.raw
    }

    /// Is this intersection on the interface between the subdomain and the rest of the grid?
    pub fn interface(&self) -> bool {
        self.interface
    }
}

impl<'a, G: GridView + 'a> Intersection for SubdomainIntersection<'a, G> {
    type T = G::T;
    type Entity = SubdomainEntity<'a, G>;
    type Geometry<'b>
        = <G::Intersection<'a> as Intersection>::Geometry<'b>
    where
        Self: 'b;

    fn boundary(&self) -> bool {
        self.interface || self.raw.boundary()
    }
    fn neighbor(&self) -> bool {
        self.outside.is_some()
    }
    fn inside(&self) -> SubdomainEntity<'a, G> {
        self.inside.clone()
    }
    fn outside(&self) -> Option<SubdomainEntity<'a, G>> {
        self.outside.clone()
    }
    fn index_in_inside(&self) -> usize {
        self.raw.index_in_inside()
    }
    fn index_in_outside(&self) -> Option<usize> {
        self.outside.as_ref().and(self.raw.index_in_outside())
    }
    fn geometry(&self) -> Self::Geometry<'_> {
        self.raw.geometry()
    }
    fn geometry_in_inside(&self) -> LocalGeometry<G::T> {
        self.raw.geometry_in_inside()
    }
    fn geometry_in_outside(&self) -> Option<LocalGeometry<G::T>> {
        if self.outside.is_some() {
            self.raw.geometry_in_outside()
        } else {
            None
        }
    }
}

/// Iterator over the intersections of a cell of a subdomain view
pub struct SubdomainIntersectionIter<'a, G: GridView + 'a> {
    raw: G::IntersectionIter<'a>,
    inside: SubdomainEntity<'a, G>,
    index_set: G::IndexSet<'a>,
    tables: &'a SubdomainTables,
}

impl<'a, G: GridView + 'a> SubdomainIntersectionIter<'a, G> {
    /// Create new
    pub fn new(
        raw: G::IntersectionIter<'a>,
        inside: SubdomainEntity<'a, G>,
        index_set: G::IndexSet<'a>,
        tables: &'a SubdomainTables,
    ) -> Self {
        Self {
            raw,
            inside,
            index_set,
            tables,
        }
    }
}

impl<'a, G: GridView + 'a> Iterator for SubdomainIntersectionIter<'a, G> {
    type Item = SubdomainIntersection<'a, G>;

    fn next(&mut self) -> Option<SubdomainIntersection<'a, G>> {
        let raw = self.raw.next()?;
        let mut interface = false;
        let outside = raw.outside().filter(|_| raw.neighbor()).and_then(|o| {
            let raw_index = self.index_set.index(&o);
            if self.tables.contains(o.entity_type(), raw_index) {
                Some(SubdomainEntity::wrap(o, raw_index, self.tables))
            } else {
                interface = true;
                None
            }
        });
        Some(SubdomainIntersection {
            raw,
            inside: self.inside.clone(),
            outside,
            interface,
        })
    }
}
