//! Views of grids
pub mod periodic;
pub mod subdomain;

pub use periodic::{PeriodicDirections, PeriodicGridView};
pub use subdomain::SubdomainView;
