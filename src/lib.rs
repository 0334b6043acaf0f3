//! n-dimensional grids and grid views
//!
//! Grids with a single cell type can be created from a box ([shapes]), read from DGF or RON files,
//! and built point by point. A [PeriodicGridView] wraps any grid so that opposite faces of the
//! domain are identified, and a [SubdomainView] restricts a grid to a subset of its cells. A
//! [Walker] applies functors to the cells and intersections of any grid view.
#![cfg_attr(feature = "strict", deny(warnings), deny(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod boundary;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod reference_cell;
pub mod search;
pub mod shapes;
pub mod topology;
pub mod traits;
pub mod types;
pub mod view;
pub mod walker;

pub use grid::{SingleTypeGrid, SingleTypeGridBuilder};
pub use view::{PeriodicDirections, PeriodicGridView, SubdomainView};
pub use walker::Walker;
