//! Grid file formats
mod dgf;
#[cfg(feature = "serde")]
mod ron;

pub use dgf::{dgf_grid, DgfGridConfig};
