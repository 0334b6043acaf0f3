//! Single type grid
mod builder;
mod grid;

pub use builder::SingleTypeGridBuilder;
#[cfg(feature = "serde")]
pub use grid::SerializableGrid;
pub use grid::{
    SingleTypeGrid, SingleTypeGridEntity, SingleTypeGridEntityIter, SingleTypeIndexSet,
    SingleTypeIntersection, SingleTypeIntersectionIter,
};
