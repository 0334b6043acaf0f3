//! Traits

mod builder;
mod entity;
mod geometry;
mod grid_view;
mod index_set;
mod intersection;
mod io;

pub use builder::Builder;
pub use entity::Entity;
pub use geometry::{Geometry, Point};
pub use grid_view::GridView;
pub use index_set::IndexSet;
pub use intersection::Intersection;
pub use io::DGFImport;
#[cfg(feature = "serde")]
pub(crate) use io::ConvertToSerializable;
#[cfg(feature = "serde")]
pub use io::{RONExport, RONImport};
