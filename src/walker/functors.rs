//! Functors applied by a walker
use crate::traits::GridView;

/// A functor applied to cells
pub trait ElementFunctor<'g, V: GridView + 'g>: Sync {
    /// Called once before the walk
    fn prepare(&self) {}

    /// Apply to a cell
    fn apply_local(&self, element: &V::Entity<'g>);

    /// Called once after the walk
    fn finalize(&self) {}
}

/// A functor applied to intersections
///
/// For intersections without a neighbour, `outside` is the inside cell.
pub trait IntersectionFunctor<'g, V: GridView + 'g>: Sync {
    /// Called once before the walk
    fn prepare(&self) {}

    /// Apply to an intersection
    fn apply_local(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    );

    /// Called once after the walk
    fn finalize(&self) {}
}

/// A functor applied to cells and to intersections
pub trait ElementAndIntersectionFunctor<'g, V: GridView + 'g>: Sync {
    /// Called once before the walk
    fn prepare(&self) {}

    /// Apply to a cell
    fn apply_local_element(&self, element: &V::Entity<'g>);

    /// Apply to an intersection
    fn apply_local_intersection(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    );

    /// Called once after the walk
    fn finalize(&self) {}
}

impl<'g, V: GridView + 'g, F: ElementFunctor<'g, V> + ?Sized> ElementFunctor<'g, V> for &F {
    fn prepare(&self) {
        (**self).prepare()
    }
    fn apply_local(&self, element: &V::Entity<'g>) {
        (**self).apply_local(element)
    }
    fn finalize(&self) {
        (**self).finalize()
    }
}

impl<'g, V: GridView + 'g, F: IntersectionFunctor<'g, V> + ?Sized> IntersectionFunctor<'g, V>
    for &F
{
    fn prepare(&self) {
        (**self).prepare()
    }
    fn apply_local(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    ) {
        (**self).apply_local(intersection, inside, outside)
    }
    fn finalize(&self) {
        (**self).finalize()
    }
}

impl<'g, V: GridView + 'g, F: ElementAndIntersectionFunctor<'g, V> + ?Sized>
    ElementAndIntersectionFunctor<'g, V> for &F
{
    fn prepare(&self) {
        (**self).prepare()
    }
    fn apply_local_element(&self, element: &V::Entity<'g>) {
        (**self).apply_local_element(element)
    }
    fn apply_local_intersection(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    ) {
        (**self).apply_local_intersection(intersection, inside, outside)
    }
    fn finalize(&self) {
        (**self).finalize()
    }
}

type Hook<'w> = Box<dyn Fn() + Sync + 'w>;

fn noop<'w>() -> Hook<'w> {
    Box::new(|| {})
}

/// An element functor made from closures
///
/// The prepare and finalize hooks do nothing unless they are set.
pub struct ElementLambdaFunctor<'w, 'g, V: GridView + 'g> {
    apply: Box<dyn Fn(&V::Entity<'g>) + Sync + 'w>,
    prepare: Hook<'w>,
    finalize: Hook<'w>,
}

impl<'w, 'g, V: GridView + 'g> ElementLambdaFunctor<'w, 'g, V> {
    /// Create new
    pub fn new(apply: impl Fn(&V::Entity<'g>) + Sync + 'w) -> Self {
        Self {
            apply: Box::new(apply),
            prepare: noop(),
            finalize: noop(),
        }
    }

    /// Set the hook called before the walk
    pub fn with_prepare(mut self, prepare: impl Fn() + Sync + 'w) -> Self {
        self.prepare = Box::new(prepare);
        self
    }

    /// Set the hook called after the walk
    pub fn with_finalize(mut self, finalize: impl Fn() + Sync + 'w) -> Self {
        self.finalize = Box::new(finalize);
        self
    }
}

impl<'g, V: GridView + 'g> ElementFunctor<'g, V> for ElementLambdaFunctor<'_, 'g, V> {
    fn prepare(&self) {
        (self.prepare)()
    }
    fn apply_local(&self, element: &V::Entity<'g>) {
        (self.apply)(element)
    }
    fn finalize(&self) {
        (self.finalize)()
    }
}

type IntersectionLambda<'w, 'g, V> = Box<
    dyn Fn(
            &<V as GridView>::Intersection<'g>,
            &<V as GridView>::Entity<'g>,
            &<V as GridView>::Entity<'g>,
        ) + Sync
        + 'w,
>;

/// An intersection functor made from closures
///
/// The prepare and finalize hooks do nothing unless they are set.
pub struct IntersectionLambdaFunctor<'w, 'g, V: GridView + 'g> {
    apply: IntersectionLambda<'w, 'g, V>,
    prepare: Hook<'w>,
    finalize: Hook<'w>,
}

impl<'w, 'g, V: GridView + 'g> IntersectionLambdaFunctor<'w, 'g, V> {
    /// Create new
    pub fn new(
        apply: impl Fn(&V::Intersection<'g>, &V::Entity<'g>, &V::Entity<'g>) + Sync + 'w,
    ) -> Self {
        Self {
            apply: Box::new(apply),
            prepare: noop(),
            finalize: noop(),
        }
    }

    /// Set the hook called before the walk
    pub fn with_prepare(mut self, prepare: impl Fn() + Sync + 'w) -> Self {
        self.prepare = Box::new(prepare);
        self
    }

    /// Set the hook called after the walk
    pub fn with_finalize(mut self, finalize: impl Fn() + Sync + 'w) -> Self {
        self.finalize = Box::new(finalize);
        self
    }
}

impl<'g, V: GridView + 'g> IntersectionFunctor<'g, V> for IntersectionLambdaFunctor<'_, 'g, V> {
    fn prepare(&self) {
        (self.prepare)()
    }
    fn apply_local(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    ) {
        (self.apply)(intersection, inside, outside)
    }
    fn finalize(&self) {
        (self.finalize)()
    }
}

/// A functor for cells and intersections made from closures
pub struct ElementAndIntersectionLambdaFunctor<'w, 'g, V: GridView + 'g> {
    element: ElementLambdaFunctor<'w, 'g, V>,
    intersection: IntersectionLambdaFunctor<'w, 'g, V>,
}

impl<'w, 'g, V: GridView + 'g> ElementAndIntersectionLambdaFunctor<'w, 'g, V> {
    /// Create new
    pub fn new(
        element: impl Fn(&V::Entity<'g>) + Sync + 'w,
        intersection: impl Fn(&V::Intersection<'g>, &V::Entity<'g>, &V::Entity<'g>) + Sync + 'w,
    ) -> Self {
        Self {
            element: ElementLambdaFunctor::new(element),
            intersection: IntersectionLambdaFunctor::new(intersection),
        }
    }

    /// Set the hook called before the walk
    pub fn with_prepare(mut self, prepare: impl Fn() + Sync + 'w) -> Self {
        self.element = self.element.with_prepare(prepare);
        self
    }

    /// Set the hook called after the walk
    pub fn with_finalize(mut self, finalize: impl Fn() + Sync + 'w) -> Self {
        self.element = self.element.with_finalize(finalize);
        self
    }
}

impl<'g, V: GridView + 'g> ElementAndIntersectionFunctor<'g, V>
    for ElementAndIntersectionLambdaFunctor<'_, 'g, V>
{
    fn prepare(&self) {
        ElementFunctor::prepare(&self.element)
    }
    fn apply_local_element(&self, element: &V::Entity<'g>) {
        ElementFunctor::apply_local(&self.element, element)
    }
    fn apply_local_intersection(
        &self,
        intersection: &V::Intersection<'g>,
        inside: &V::Entity<'g>,
        outside: &V::Entity<'g>,
    ) {
        IntersectionFunctor::apply_local(&self.intersection, intersection, inside, outside)
    }
    fn finalize(&self) {
        ElementFunctor::finalize(&self.element)
    }
}
