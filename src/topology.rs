//! Grid topology
pub mod single_type;
