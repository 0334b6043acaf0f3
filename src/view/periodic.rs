//! Periodic grid view
mod builder;
mod index_set;
mod intersection;
mod iterator;
mod view;

pub use builder::{PeriodicNeighbor, PeriodicTables};
pub use index_set::PeriodicIndexSet;
pub use intersection::{PeriodicIntersection, PeriodicIntersectionIter};
pub use iterator::PeriodicEntityIter;
pub use view::{DomainBox, PeriodicDirections, PeriodicGridView};
