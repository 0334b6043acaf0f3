//! Types

mod error;
mod ownership;
pub use error::{GridError, GridResult};
pub use ownership::{Ownership, Partition, PartitionIter};

use approx::RelativeEq;
use num::Float;
use std::fmt::Debug;

/// Scalar type used for coordinates
pub trait RealScalar:
    Float + RelativeEq<Epsilon = Self> + Debug + Default + Send + Sync + 'static
{
}

impl<T: Float + RelativeEq<Epsilon = T> + Debug + Default + Send + Sync + 'static> RealScalar
    for T
{
}

/// Convert a number to the scalar type
pub(crate) fn scalar<T: RealScalar, N: num::ToPrimitive + Copy + Debug>(n: N) -> GridResult<T> {
    T::from(n).ok_or_else(|| {
        GridError::InvalidConfiguration(format!("{n:?} cannot be represented as a coordinate"))
    })
}

/// Tolerance used when comparing coordinates
pub(crate) fn tolerance<T: RealScalar>() -> T {
    T::from(1e-10).unwrap_or_else(T::epsilon)
}

/// Compare two coordinates up to [tolerance]
pub(crate) fn float_eq<T: RealScalar>(a: T, b: T) -> bool {
    let tol = tolerance::<T>();
    a.relative_eq(&b, tol, tol)
}
