//! RON I/O
use crate::{traits::GridView, types::GridResult};
use std::fs;

pub trait ConvertToSerializable: Sized {
    //! Convert to/from a RON string
    type SerializableType: serde::Serialize;
    /// Convert to ron
    fn to_serializable(&self) -> Self::SerializableType;
    /// Convert from ron
    ///
    /// The serialized data is validated, so this fails on data that does not describe a grid.
    fn from_serializable(s: Self::SerializableType) -> GridResult<Self>;
}

pub trait RONExport: GridView {
    //! Grid export for RON

    /// Generate the RON string for a grid
    fn to_ron_string(&self) -> GridResult<String>;

    /// Export as RON
    fn export_as_ron(&self, filename: &str) -> GridResult<()> {
        let ron_s = self.to_ron_string()?;
        fs::write(filename, ron_s)?;
        Ok(())
    }
}

pub trait RONImport: Sized + GridView {
    //! Grid import for RON

    /// Create a grid from a RON string
    fn from_ron_string(s: &str) -> GridResult<Self>;

    /// Import from RON
    fn import_from_ron(filename: &str) -> GridResult<Self> {
        let content = fs::read_to_string(filename)?;
        Self::from_ron_string(&content)
    }
}
