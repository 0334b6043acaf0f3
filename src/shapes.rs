//! Functions to create simple example grids

mod cube;

pub use cube::{cube_grid, unit_cube, unit_interval, unit_square, CubeGridConfig};
