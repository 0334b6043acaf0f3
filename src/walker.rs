//! Walking over the cells and intersections of a view
//!
//! A [Walker] collects functors, each with a filter, and applies all of them in a single pass over
//! the cells of a view. Intersections are only visited if a functor that needs them has been
//! appended.
mod filters;
mod functors;
mod partitioning;

pub use filters::{ElementFilter, IntersectionFilter};
pub use functors::{
    ElementAndIntersectionFunctor, ElementAndIntersectionLambdaFunctor, ElementFunctor,
    ElementLambdaFunctor, IntersectionFunctor, IntersectionLambdaFunctor,
};
pub use partitioning::RangedPartitioning;

use crate::{
    traits::{GridView, Intersection},
    types::{GridError, GridResult},
};
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

type ElementEntry<'w, 'g, V> = (
    Box<dyn ElementFunctor<'g, V> + 'w>,
    ElementFilter<'w, 'g, V>,
);
type IntersectionEntry<'w, 'g, V> = (
    Box<dyn IntersectionFunctor<'g, V> + 'w>,
    IntersectionFilter<'w, 'g, V>,
);
type ElementAndIntersectionEntry<'w, 'g, V> = (
    Box<dyn ElementAndIntersectionFunctor<'g, V> + 'w>,
    ElementFilter<'w, 'g, V>,
    IntersectionFilter<'w, 'g, V>,
);

/// Applies functors to the cells and intersections of a view
///
/// A walker is itself an [ElementAndIntersectionFunctor], so walkers over the same view can be
/// nested with [Walker::append_walker].
pub struct Walker<'w, 'g, V: GridView + 'g> {
    view: &'g V,
    walked: AtomicBool,
    element_functors: Vec<ElementEntry<'w, 'g, V>>,
    intersection_functors: Vec<IntersectionEntry<'w, 'g, V>>,
    element_and_intersection_functors: Vec<ElementAndIntersectionEntry<'w, 'g, V>>,
}

impl<'w, 'g, V: GridView + 'g> Walker<'w, 'g, V> {
    /// Create new
    pub fn new(view: &'g V) -> Self {
        Self {
            view,
            walked: AtomicBool::new(false),
            element_functors: vec![],
            intersection_functors: vec![],
            element_and_intersection_functors: vec![],
        }
    }

    /// The view
    pub fn view(&self) -> &'g V {
        self.view
    }

    /// Number of functors appended to this walker
    pub fn functor_count(&self) -> usize {
        self.element_functors.len()
            + self.intersection_functors.len()
            + self.element_and_intersection_functors.len()
    }

    /// Append a functor applied to the cells accepted by the filter
    pub fn append_element(
        &mut self,
        functor: impl ElementFunctor<'g, V> + 'w,
        filter: ElementFilter<'w, 'g, V>,
    ) -> &mut Self {
        self.element_functors.push((Box::new(functor), filter));
        self
    }

    /// Append a functor applied to the intersections accepted by the filter
    pub fn append_intersection(
        &mut self,
        functor: impl IntersectionFunctor<'g, V> + 'w,
        filter: IntersectionFilter<'w, 'g, V>,
    ) -> &mut Self {
        self.intersection_functors.push((Box::new(functor), filter));
        self
    }

    /// Append a functor applied to cells and intersections
    pub fn append_element_and_intersection(
        &mut self,
        functor: impl ElementAndIntersectionFunctor<'g, V> + 'w,
        element_filter: ElementFilter<'w, 'g, V>,
        intersection_filter: IntersectionFilter<'w, 'g, V>,
    ) -> &mut Self {
        self.element_and_intersection_functors.push((
            Box::new(functor),
            element_filter,
            intersection_filter,
        ));
        self
    }

    /// Append another walker over the same view
    ///
    /// The functors of the other walker are applied to the cells and intersections accepted both
    /// by the given filters and by their own filters.
    pub fn append_walker(
        &mut self,
        other: &'w Walker<'_, 'g, V>,
        element_filter: ElementFilter<'w, 'g, V>,
        intersection_filter: IntersectionFilter<'w, 'g, V>,
    ) -> GridResult<&mut Self>
    where
        V: Sync,
    {
        if !std::ptr::eq(self.view, other.view) {
            return Err(GridError::Misuse(
                "Cannot append a walker over a different view".to_string(),
            ));
        }
        Ok(self.append_element_and_intersection(other, element_filter, intersection_filter))
    }

    /// Remove all functors
    pub fn clear(&mut self) {
        self.element_functors.clear();
        self.intersection_functors.clear();
        self.element_and_intersection_functors.clear();
    }

    /// Apply all functors in a single pass over the view
    ///
    /// If `clear` is set, the functors are removed afterwards.
    pub fn walk(&mut self, clear: bool) {
        self.prepare_all();
        if self.functor_count() > 0 {
            self.walk_range(self.view.entity_iter(0));
        }
        self.finalize_all();
        if clear {
            self.clear();
        }
    }

    /// Apply all functors, walking over blocks of cells in parallel
    ///
    /// If `num_partitions` is 0, one partition per thread is used. The functors may be applied
    /// concurrently.
    pub fn walk_parallel(&mut self, num_partitions: usize, clear: bool)
    where
        V: Sync,
        V::Entity<'g>: Sync,
    {
        let num_partitions = if num_partitions == 0 {
            rayon::current_num_threads()
        } else {
            num_partitions
        };
        let partitioning = RangedPartitioning::new(self.view, num_partitions);
        self.walk_partitioning(&partitioning, clear);
    }

    /// Apply all functors, walking over the partitions in parallel
    pub fn walk_partitioning(&mut self, partitioning: &RangedPartitioning<'g, V>, clear: bool)
    where
        V: Sync,
        V::Entity<'g>: Sync,
    {
        debug!(
            "Walking {} partitions with {} functors",
            partitioning.partitions(),
            self.functor_count()
        );
        self.prepare_all();
        if self.functor_count() > 0 {
            let walker = &*self;
            (0..partitioning.partitions())
                .into_par_iter()
                .for_each(|p| walker.walk_range(partitioning.partition(p).iter().cloned()));
        }
        self.finalize_all();
        if clear {
            self.clear();
        }
    }

    fn walk_range(&self, elements: impl Iterator<Item = V::Entity<'g>>) {
        let with_intersections = !self.intersection_functors.is_empty()
            || !self.element_and_intersection_functors.is_empty();
        for element in elements {
            self.apply_local_all(&element);
            if !with_intersections {
                continue;
            }
            for intersection in self.view.intersection_iter(&element) {
                match intersection.outside().filter(|_| intersection.neighbor()) {
                    Some(outside) => {
                        self.apply_local_intersection_all(&intersection, &element, &outside)
                    }
                    None => self.apply_local_intersection_all(&intersection, &element, &element),
                }
            }
        }
    }

    fn prepare_all(&self) {
        for (f, _) in &self.element_functors {
            f.prepare();
        }
        for (f, _) in &self.intersection_functors {
            f.prepare();
        }
        for (f, _, _) in &self.element_and_intersection_functors {
            f.prepare();
        }
    }

    fn apply_local_all(&self, element: &V::Entity<'g>) {
        for (f, filter) in &self.element_functors {
            if filter.contains(self.view, element) {
                f.apply_local(element);
            }
        }
        for (f, filter, _) in &self.element_and_intersection_functors {
            if filter.contains(self.view, element) {
                f.apply_local_element(element);
            }
        }
    }

    fn apply_local_intersection_all(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    ) {
        for (f, filter) in &self.intersection_functors {
            if filter.contains(self.view, intersection) {
                f.apply_local(intersection, inside, outside);
            }
        }
        for (f, _, filter) in &self.element_and_intersection_functors {
            if filter.contains(self.view, intersection) {
                f.apply_local_intersection(intersection, inside, outside);
            }
        }
    }

    fn finalize_all(&self) {
        for (f, _, _) in &self.element_and_intersection_functors {
            f.finalize();
        }
        for (f, _) in &self.element_functors {
            f.finalize();
        }
        for (f, _) in &self.intersection_functors {
            f.finalize();
        }
        self.walked.store(true, Ordering::Relaxed);
    }
}

// Lambda functors carry `'g` in their type, which must outlive `'w`
impl<'w, 'g: 'w, V: GridView + 'g> Walker<'w, 'g, V> {
    /// Append a closure applied to the cells accepted by the filter
    pub fn append_element_lambda(
        &mut self,
        apply: impl Fn(&V::Entity<'g>) + Sync + 'w,
        filter: ElementFilter<'w, 'g, V>,
    ) -> &mut Self {
        self.append_element(ElementLambdaFunctor::new(apply), filter)
    }

    /// Append a closure applied to the intersections accepted by the filter
    pub fn append_intersection_lambda(
        &mut self,
        apply: impl Fn(&V::Intersection<'g>, &V::Entity<'g>, &V::Entity<'g>) + Sync + 'w,
        filter: IntersectionFilter<'w, 'g, V>,
    ) -> &mut Self {
        self.append_intersection(IntersectionLambdaFunctor::new(apply), filter)
    }

    /// Append closures applied to cells and intersections
    pub fn append_element_and_intersection_lambda(
        &mut self,
        element: impl Fn(&V::Entity<'g>) + Sync + 'w,
        intersection: impl Fn(&V::Intersection<'g>, &V::Entity<'g>, &V::Entity<'g>) + Sync + 'w,
        element_filter: ElementFilter<'w, 'g, V>,
        intersection_filter: IntersectionFilter<'w, 'g, V>,
    ) -> &mut Self {
        self.append_element_and_intersection(
            ElementAndIntersectionLambdaFunctor::new(element, intersection),
            element_filter,
            intersection_filter,
        )
    }
}

impl<'g, V: GridView + Sync + 'g> ElementAndIntersectionFunctor<'g, V> for Walker<'_, 'g, V> {
    fn prepare(&self) {
        self.prepare_all()
    }
    fn apply_local_element(&self, element: &V::Entity<'g>) {
        self.apply_local_all(element)
    }
    fn apply_local_intersection(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    ) {
        self.apply_local_intersection_all(intersection, inside, outside)
    }
    fn finalize(&self) {
        self.finalize_all()
    }
}

impl<'g, V: GridView + 'g> Drop for Walker<'_, 'g, V> {
    fn drop(&mut self) {
        if !self.walked.load(Ordering::Relaxed) && self.functor_count() > 0 {
            warn!(
                "Walker dropped with {} functors that were never walked",
                self.functor_count()
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        grid::{SingleTypeGrid, SingleTypeGridEntity},
        reference_cell::ReferenceCellType,
        shapes::unit_square,
        traits::{Entity, Geometry},
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    struct CellCounter {
        prepared: AtomicUsize,
        count: AtomicUsize,
        finalized: AtomicUsize,
    }

    impl CellCounter {
        fn new() -> Self {
            Self {
                prepared: AtomicUsize::new(0),
                count: AtomicUsize::new(0),
                finalized: AtomicUsize::new(0),
            }
        }
    }

    impl<'g> ElementFunctor<'g, SingleTypeGrid<f64>> for CellCounter {
        fn prepare(&self) {
            self.prepared.fetch_add(1, Ordering::Relaxed);
        }
        fn apply_local(&self, _element: &<SingleTypeGrid<f64> as GridView>::Entity<'g>) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
        fn finalize(&self) {
            self.finalized.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_walk_elements() {
        let grid = unit_square::<f64>(3, 3, ReferenceCellType::Quadrilateral).unwrap();
        let all = CellCounter::new();
        let boundary = CellCounter::new();
        let mut walker = Walker::new(&grid);
        walker
            .append_element(&all, ElementFilter::All)
            .append_element(&boundary, ElementFilter::Boundary);
        assert_eq!(walker.functor_count(), 2);
        walker.walk(true);
        assert_eq!(walker.functor_count(), 0);
        assert_eq!(all.count.load(Ordering::Relaxed), 9);
        assert_eq!(boundary.count.load(Ordering::Relaxed), 8);
        assert_eq!(all.prepared.load(Ordering::Relaxed), 1);
        assert_eq!(all.finalized.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_walk_intersections() {
        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Triangle).unwrap();
        let inner = AtomicUsize::new(0);
        let boundary = AtomicUsize::new(0);
        let self_outside = AtomicUsize::new(0);
        let mut walker = Walker::new(&grid);
        walker
            .append_intersection_lambda(
                |_, _, _| {
                    inner.fetch_add(1, Ordering::Relaxed);
                },
                IntersectionFilter::InnerOnce,
            )
            .append_intersection_lambda(
                |i, inside, outside| {
                    boundary.fetch_add(1, Ordering::Relaxed);
                    assert!(i.boundary());
                    if inside == outside {
                        self_outside.fetch_add(1, Ordering::Relaxed);
                    }
                },
                IntersectionFilter::Boundary,
            );
        walker.walk(true);
        assert_eq!(inner.load(Ordering::Relaxed), 8);
        assert_eq!(boundary.load(Ordering::Relaxed), 8);
        assert_eq!(self_outside.load(Ordering::Relaxed), 8);
    }

    #[test]
    fn test_element_and_intersection_lambda_hooks() {
        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Quadrilateral).unwrap();
        let log = Mutex::new(vec![]);
        let volume = Mutex::new(0.0);
        let mut walker = Walker::new(&grid);
        walker.append_element_and_intersection(
            ElementAndIntersectionLambdaFunctor::<SingleTypeGrid<f64>>::new(
                |e| *volume.lock().unwrap() += e.geometry().volume(),
                |_, _, _| {},
            )
            .with_prepare(|| log.lock().unwrap().push("prepare"))
            .with_finalize(|| log.lock().unwrap().push("finalize")),
            ElementFilter::All,
            IntersectionFilter::No,
        );
        walker.walk(true);
        assert_eq!(*log.lock().unwrap(), vec!["prepare", "finalize"]);
        assert!((*volume.lock().unwrap() - 1.0f64).abs() < 1e-10);
    }

    #[test]
    fn test_walk_parallel() {
        let grid = unit_square::<f64>(8, 8, ReferenceCellType::Triangle).unwrap();
        let counter = CellCounter::new();
        let indices = Mutex::new(vec![]);
        let mut walker = Walker::new(&grid);
        walker
            .append_element(&counter, ElementFilter::All)
            .append_element_lambda(
                |e| indices.lock().unwrap().push(e.local_index()),
                ElementFilter::All,
            );
        walker.walk_parallel(5, true);
        assert_eq!(counter.count.load(Ordering::Relaxed), 128);
        assert_eq!(counter.prepared.load(Ordering::Relaxed), 1);
        let mut indices = indices.lock().unwrap().clone();
        indices.sort();
        assert_eq!(indices, (0..128).collect::<Vec<_>>());
    }

    #[test]
    fn test_nested_walker() {
        let grid = unit_square::<f64>(3, 3, ReferenceCellType::Quadrilateral).unwrap();
        let inner_count = CellCounter::new();
        let outer_count = CellCounter::new();
        let mut inner = Walker::new(&grid);
        inner.append_element(&inner_count, ElementFilter::Boundary);
        let mut outer = Walker::new(&grid);
        outer.append_element(&outer_count, ElementFilter::All);
        outer
            .append_walker(
                &inner,
                ElementFilter::lambda(
                    |_: &SingleTypeGrid<f64>, e: &SingleTypeGridEntity<'_, f64>| {
                        e.local_index() % 2 == 0
                    },
                ),
                IntersectionFilter::All,
            )
            .unwrap();
        outer.walk(true);
        assert_eq!(outer_count.count.load(Ordering::Relaxed), 9);
        let expected = grid
            .entity_iter(0)
            .filter(|e| e.local_index() % 2 == 0 && e.has_boundary_intersections())
            .count();
        assert_eq!(inner_count.count.load(Ordering::Relaxed), expected);
        assert_eq!(inner_count.prepared.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_append_walker_over_other_view() {
        let grid = unit_square::<f64>(2, 2, ReferenceCellType::Quadrilateral).unwrap();
        let other_grid = unit_square::<f64>(2, 2, ReferenceCellType::Quadrilateral).unwrap();
        let inner = Walker::new(&other_grid);
        let mut outer = Walker::new(&grid);
        assert!(matches!(
            outer.append_walker(&inner, ElementFilter::All, IntersectionFilter::All),
            Err(GridError::Misuse(_))
        ));
    }
}
