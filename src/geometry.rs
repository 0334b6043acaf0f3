//! Grid geometry
mod entity_geometry;
mod local_geometry;
mod point;
pub use entity_geometry::EntityGeometry;
pub use local_geometry::LocalGeometry;
pub use point::{Point, PointIter};

use crate::{
    reference_cell::{self, ReferenceCellType},
    types::RealScalar,
};
use itertools::izip;

fn dot<T: RealScalar>(a: &[T], b: &[T]) -> T {
    izip!(a, b).fold(T::zero(), |acc, (x, y)| acc + *x * *y)
}

fn difference<T: RealScalar>(a: &[T], b: &[T]) -> Vec<T> {
    izip!(a, b).map(|(x, y)| *x - *y).collect()
}

// Determinant by Gaussian elimination with partial pivoting
fn determinant<T: RealScalar>(mut m: Vec<Vec<T>>) -> T {
    let n = m.len();
    let mut det = T::one();
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col] == T::zero() {
            return T::zero();
        }
        if pivot != col {
            m.swap(pivot, col);
            det = -det;
        }
        det = det * m[col][col];
        for row in col + 1..n {
            let factor = m[row][col] / m[col][col];
            for k in col..n {
                let v = m[col][k];
                m[row][k] = m[row][k] - factor * v;
            }
        }
    }
    det
}

/// The volume of an affine entity from its corners
///
/// The corners must be ordered as the vertices of the reference cell. Cube type entities are
/// treated as parallelotopes spanned by the edges at the first corner.
pub fn affine_volume<T: RealScalar>(entity_type: ReferenceCellType, corners: &[&[T]]) -> T {
    let tdim = reference_cell::dim(entity_type);
    if tdim == 0 {
        return T::one();
    }
    let spanning = if reference_cell::is_simplex(entity_type) {
        (1..tdim + 1).collect::<Vec<_>>()
    } else {
        (0..tdim).map(|d| 1 << d).collect::<Vec<_>>()
    };
    let vectors = spanning
        .iter()
        .map(|i| difference(corners[*i], corners[0]))
        .collect::<Vec<_>>();
    let gram = vectors
        .iter()
        .map(|a| vectors.iter().map(|b| dot(a, b)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let measure = determinant(gram).max(T::zero()).sqrt();
    if reference_cell::is_simplex(entity_type) {
        let mut factorial = T::one();
        let mut k = T::one();
        for _ in 1..tdim {
            k = k + T::one();
            factorial = factorial * k;
        }
        measure / factorial
    } else {
        measure
    }
}

/// The unit normal of a facet pointing away from a point inside the cell
///
/// The normal is the component of (facet center - `inside_center`) orthogonal to the facet.
pub fn unit_outer_normal<T: RealScalar>(corners: &[Vec<T>], inside_center: &[T]) -> Vec<T> {
    let dim = inside_center.len();
    let mut center = vec![T::zero(); dim];
    let mut n = T::zero();
    for c in corners {
        for (a, b) in izip!(center.iter_mut(), c) {
            *a = *a + *b;
        }
        n = n + T::one();
    }
    for a in center.iter_mut() {
        *a = *a / n;
    }
    let mut normal = difference(&center, inside_center);

    // Orthonormal basis of the tangent space of the facet
    let mut basis: Vec<Vec<T>> = vec![];
    for c in corners.iter().skip(1) {
        let mut t = difference(c, &corners[0]);
        for e in &basis {
            let proj = dot(&t, e);
            for (ti, ei) in izip!(t.iter_mut(), e) {
                *ti = *ti - proj * *ei;
            }
        }
        let norm = dot(&t, &t).sqrt();
        if norm > T::epsilon() {
            basis.push(t.iter().map(|x| *x / norm).collect());
        }
    }
    for e in &basis {
        let proj = dot(&normal, e);
        for (ni, ei) in izip!(normal.iter_mut(), e) {
            *ni = *ni - proj * *ei;
        }
    }
    let norm = dot(&normal, &normal).sqrt();
    if norm > T::zero() {
        for x in normal.iter_mut() {
            *x = *x / norm;
        }
    }
    normal
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_volume_triangle() {
        let corners: [&[f64]; 3] = [&[0.0, 0.0], &[2.0, 0.0], &[0.0, 1.0]];
        assert_relative_eq!(
            affine_volume(ReferenceCellType::Triangle, &corners),
            1.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_volume_quadrilateral_in_3d() {
        let corners: [&[f64]; 4] = [
            &[0.0, 0.0, 1.0],
            &[0.5, 0.0, 1.0],
            &[0.0, 0.0, 3.0],
            &[0.5, 0.0, 3.0],
        ];
        assert_relative_eq!(
            affine_volume(ReferenceCellType::Quadrilateral, &corners),
            1.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_volume_tetrahedron() {
        let corners: [&[f64]; 4] = [
            &[0.0, 0.0, 0.0],
            &[1.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0],
        ];
        assert_relative_eq!(
            affine_volume(ReferenceCellType::Tetrahedron, &corners),
            1.0 / 6.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_normal_edge() {
        let corners = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        let n = unit_outer_normal(&corners, &[0.5, 0.5]);
        assert_relative_eq!(n[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(n[1], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_normal_slanted_face() {
        let corners = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        let n = unit_outer_normal(&corners, &[0.0, 0.0, 0.0]);
        let s = 1.0 / f64::sqrt(3.0);
        for x in n {
            assert_relative_eq!(x, s, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_normal_point() {
        let corners = vec![vec![0.0]];
        let n = unit_outer_normal(&corners, &[0.25]);
        assert_relative_eq!(n[0], -1.0, epsilon = 1e-10);
    }
}
