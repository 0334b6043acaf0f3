//! Subdomain grid view
mod entity;
mod index_set;
mod intersection;
mod tables;
mod view;

pub use entity::{SubdomainEntity, SubdomainEntityIter};
pub use index_set::SubdomainIndexSet;
pub use intersection::{SubdomainIntersection, SubdomainIntersectionIter};
pub use tables::SubdomainTables;
pub use view::SubdomainView;
