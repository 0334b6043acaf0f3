//! Grids
pub mod single_type;

pub use single_type::{
    SingleTypeGrid, SingleTypeGridBuilder, SingleTypeGridEntity, SingleTypeIntersection,
};
