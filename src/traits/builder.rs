//! Grid builder
use crate::types::{GridResult, RealScalar};

pub trait Builder {
    //! Object that can be used to build a mesh

    /// The type of the grid that the builder creates
    type Grid;
    /// The floating point type used for coordinates
    type T: RealScalar;
    /// The type of the data that is input to add a cell
    type CellData<'a>;

    /// Add a point to the grid
    fn add_point(&mut self, id: usize, data: &[Self::T]) -> GridResult<()>;

    /// Add a cell to the grid
    fn add_cell(&mut self, id: usize, cell_data: Self::CellData<'_>) -> GridResult<()>;

    /// Number of points added so far
    fn point_count(&self) -> usize;

    /// Number of cells added so far
    fn cell_count(&self) -> usize;

    /// Create the grid
    fn create_grid(&self) -> GridResult<Self::Grid>;
}
