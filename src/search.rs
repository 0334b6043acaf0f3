//! Point location
use crate::{
    reference_cell::{self, ReferenceCellType},
    traits::{Entity, Geometry, GridView, Point},
    types::{float_eq, tolerance, RealScalar},
};
use itertools::izip;
use num::{Float, One, Zero};
use std::cmp::Ordering;

#[derive(Debug)]
struct SearchEntry<T: RealScalar> {
    entity_type: ReferenceCellType,
    index: usize,
    center: Vec<T>,
    corners: Vec<Vec<T>>,
    // Extent along the first axis
    lower: T,
    upper: T,
}

/// Find entities of one codimension of a grid by location
///
/// For cells, a point is located in the cell that contains it. For entities of higher
/// codimension, a point is matched to the entity whose center coincides with it.
///
/// Entities are sorted by where they start along the first axis, so each point is only compared
/// with the entities whose extent along that axis can contain it.
#[derive(Debug)]
pub struct EntitySearch<'a, G: GridView> {
    grid: &'a G,
    codim: usize,
    entries: Vec<SearchEntry<G::T>>,
    width: G::T,
}

impl<'a, G: GridView> EntitySearch<'a, G> {
    /// Create new
    pub fn new(grid: &'a G, codim: usize) -> Self {
        let mut entries = grid
            .entity_iter(codim)
            .map(|e| {
                let geometry = e.geometry();
                let center = geometry.center();
                let x0 = center.first().copied().unwrap_or_else(G::T::zero);
                let corners = if codim == 0 {
                    geometry.points().map(|p| p.to_vec()).collect()
                } else {
                    vec![]
                };
                let (lower, upper) = corners
                    .iter()
                    .filter_map(|c: &Vec<G::T>| c.first())
                    .fold((x0, x0), |(lo, hi), x| (lo.min(*x), hi.max(*x)));
                SearchEntry {
                    entity_type: e.entity_type(),
                    index: e.local_index(),
                    center,
                    corners,
                    lower,
                    upper,
                }
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.lower.partial_cmp(&b.lower).unwrap_or(Ordering::Equal));
        let width = entries
            .iter()
            .fold(G::T::zero(), |w, e| w.max(e.upper - e.lower));
        Self {
            grid,
            codim,
            entries,
            width,
        }
    }

    /// The codimension that is searched
    pub fn codim(&self) -> usize {
        self.codim
    }

    /// Find an entity for each point
    pub fn search(&self, points: &[Vec<G::T>]) -> Vec<Option<G::Entity<'a>>> {
        points.iter().map(|p| self.search_point(p)).collect()
    }

    /// Find the entity for a point
    pub fn search_point(&self, point: &[G::T]) -> Option<G::Entity<'a>> {
        let mut candidates = self.candidates(*point.first()?);
        let entry = if self.codim == 0 {
            candidates.find(|e| cell_contains(e.entity_type, &e.corners, point))
        } else {
            candidates.find(|e| {
                e.center.len() == point.len()
                    && izip!(&e.center, point).all(|(a, b)| float_eq(*a, *b))
            })
        }?;
        self.grid.entity(entry.entity_type, entry.index)
    }

    /// The entries whose extent along the first axis contains `x0`
    fn candidates(&self, x0: G::T) -> impl Iterator<Item = &SearchEntry<G::T>> {
        let tol = tolerance::<G::T>() * (G::T::one() + x0.abs() + self.width);
        let start = self
            .entries
            .partition_point(|e| e.lower < x0 - self.width - tol);
        self.entries[start..]
            .iter()
            .take_while(move |e| e.lower <= x0 + tol)
            .filter(move |e| e.upper >= x0 - tol)
    }
}

// Solve a small dense system by Gaussian elimination with partial pivoting
fn solve<T: RealScalar>(mut m: Vec<Vec<T>>, mut rhs: Vec<T>) -> Option<Vec<T>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|a, b| {
            m[*a][col]
                .abs()
                .partial_cmp(&m[*b][col].abs())
                .unwrap_or(Ordering::Equal)
        })?;
        if m[pivot][col].abs() <= T::epsilon() {
            return None;
        }
        m.swap(pivot, col);
        rhs.swap(pivot, col);
        for row in col + 1..n {
            let factor = m[row][col] / m[col][col];
            for k in col..n {
                let v = m[col][k];
                m[row][k] = m[row][k] - factor * v;
            }
            let r = rhs[col];
            rhs[row] = rhs[row] - factor * r;
        }
    }
    let mut x = vec![T::zero(); n];
    for row in (0..n).rev() {
        let mut s = rhs[row];
        for k in row + 1..n {
            s = s - m[row][k] * x[k];
        }
        x[row] = s / m[row][row];
    }
    Some(x)
}

/// Does an affine cell with the given corners contain a point?
pub(crate) fn cell_contains<T: RealScalar>(
    cell_type: ReferenceCellType,
    corners: &[Vec<T>],
    point: &[T],
) -> bool {
    let tdim = reference_cell::dim(cell_type);
    if corners.is_empty() {
        return false;
    }
    let origin = &corners[0];
    if tdim == 0 {
        return izip!(origin, point).all(|(a, b)| float_eq(*a, *b));
    }
    let simplex = reference_cell::is_simplex(cell_type);
    let spanning = (0..tdim)
        .map(|d| {
            let i = if simplex { d + 1 } else { 1 << d };
            izip!(&corners[i], origin)
                .map(|(a, b)| *a - *b)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let offset = izip!(point, origin)
        .map(|(a, b)| *a - *b)
        .collect::<Vec<_>>();

    let dot = |a: &[T], b: &[T]| izip!(a, b).fold(T::zero(), |acc, (x, y)| acc + *x * *y);
    // Normal equations, so cells embedded in higher dimensional spaces are handled too
    let gram = spanning
        .iter()
        .map(|a| spanning.iter().map(|b| dot(a, b)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let rhs = spanning.iter().map(|a| dot(a, &offset)).collect::<Vec<_>>();
    let Some(local) = solve(gram, rhs) else {
        return false;
    };

    let tol = T::from(1e-10).unwrap_or_else(T::epsilon);
    let scale = offset.iter().fold(T::one(), |acc, x| acc.max(x.abs()));
    let residual = (0..point.len()).fold(T::zero(), |acc, i| {
        let mapped = izip!(&spanning, &local).fold(T::zero(), |s, (v, x)| s + v[i] * *x);
        acc.max((mapped - offset[i]).abs())
    });
    if residual > tol * scale {
        return false;
    }
    if simplex {
        local.iter().all(|x| *x >= -tol)
            && local.iter().fold(T::zero(), |s, x| s + *x) <= T::one() + tol
    } else {
        local.iter().all(|x| *x >= -tol && *x <= T::one() + tol)
    }
}
