//! Filters that select the cells and intersections a functor is applied to
use crate::{
    boundary::{BoundaryInfo, BoundaryType},
    traits::{Entity, GridView, IndexSet, Intersection},
};

type ElementPredicate<'w, 'g, V> =
    Box<dyn Fn(&'g V, &<V as GridView>::Entity<'g>) -> bool + Sync + 'w>;
type IntersectionPredicate<'w, 'g, V> =
    Box<dyn Fn(&'g V, &<V as GridView>::Intersection<'g>) -> bool + Sync + 'w>;

/// Selection of cells
pub enum ElementFilter<'w, 'g, V: GridView + 'g> {
    /// Every cell
    All,
    /// Cells with at least one boundary intersection
    Boundary,
    /// No cells
    No,
    /// Cells accepted by a closure
    Lambda(ElementPredicate<'w, 'g, V>),
}

impl<'w, 'g, V: GridView + 'g> ElementFilter<'w, 'g, V> {
    /// Filter with a closure
    pub fn lambda(filter: impl Fn(&'g V, &V::Entity<'g>) -> bool + Sync + 'w) -> Self {
        Self::Lambda(Box::new(filter))
    }

    /// Does the filter accept the cell?
    pub fn contains(&self, view: &'g V, element: &V::Entity<'g>) -> bool {
        match self {
            Self::All => true,
            Self::Boundary => element.has_boundary_intersections(),
            Self::No => false,
            Self::Lambda(f) => f(view, element),
        }
    }
}

impl<'g, V: GridView + 'g> Default for ElementFilter<'_, 'g, V> {
    fn default() -> Self {
        Self::All
    }
}

/// Selection of intersections
pub enum IntersectionFilter<'w, 'g, V: GridView + 'g> {
    /// Every intersection
    All,
    /// Intersections with a neighbour that are not on the boundary
    Inner,
    /// Inner intersections, each visited from only one of its two cells
    InnerOnce,
    /// Intersections on the boundary
    Boundary,
    /// Boundary intersections without a neighbour
    NonPeriodicBoundary,
    /// Boundary intersections with a neighbour on the other side of a periodic domain
    PeriodicBoundary,
    /// No intersections
    No,
    /// Intersections accepted by a closure
    Lambda(IntersectionPredicate<'w, 'g, V>),
    /// Intersections of the given boundary type
    BoundaryType(Box<dyn BoundaryInfo<V::Intersection<'g>> + 'w>, BoundaryType),
}

impl<'w, 'g, V: GridView + 'g> IntersectionFilter<'w, 'g, V> {
    /// Filter with a closure
    pub fn lambda(
        filter: impl Fn(&'g V, &V::Intersection<'g>) -> bool + Sync + 'w,
    ) -> Self {
        Self::Lambda(Box::new(filter))
    }

    /// Filter by boundary type
    pub fn boundary_type(
        boundary_info: impl BoundaryInfo<V::Intersection<'g>> + 'w,
        boundary_type: BoundaryType,
    ) -> Self {
        Self::BoundaryType(Box::new(boundary_info), boundary_type)
    }

    /// Does the filter accept the intersection?
    pub fn contains(&self, view: &'g V, intersection: &V::Intersection<'g>) -> bool {
        match self {
            Self::All => true,
            Self::Inner => intersection.neighbor() && !intersection.boundary(),
            Self::InnerOnce => {
                if !intersection.neighbor() || intersection.boundary() {
                    return false;
                }
                let Some(outside) = intersection.outside() else {
                    return false;
                };
                let index_set = view.index_set();
                index_set.index(&intersection.inside()) < index_set.index(&outside)
            }
            Self::Boundary => intersection.boundary(),
            Self::NonPeriodicBoundary => intersection.boundary() && !intersection.neighbor(),
            Self::PeriodicBoundary => intersection.boundary() && intersection.neighbor(),
            Self::No => false,
            Self::Lambda(f) => f(view, intersection),
            Self::BoundaryType(info, boundary_type) => {
                info.boundary_type(intersection) == *boundary_type
            }
        }
    }
}

impl<'g, V: GridView + 'g> Default for IntersectionFilter<'_, 'g, V> {
    fn default() -> Self {
        Self::All
    }
}
