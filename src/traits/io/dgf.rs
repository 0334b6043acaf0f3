//! DGF I/O
use crate::{traits::GridView, types::GridResult};
use std::fs;

pub trait DGFImport: Sized + GridView {
    //! Grid import for the Dune grid format

    /// Create a grid from the contents of a DGF file
    fn from_dgf_string(s: &str) -> GridResult<Self>;

    /// Import from a DGF file
    fn import_from_dgf(filename: &str) -> GridResult<Self> {
        let content = fs::read_to_string(filename)?;
        Self::from_dgf_string(&content)
    }
}
