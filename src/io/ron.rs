//! RON I/O
use crate::{
    traits::{ConvertToSerializable, GridView, RONExport, RONImport},
    types::GridResult,
};

impl<G: GridView + ConvertToSerializable> RONExport for G {
    fn to_ron_string(&self) -> GridResult<String> {
        Ok(ron::to_string(&self.to_serializable())?)
    }
}

impl<G: GridView + ConvertToSerializable> RONImport for G
where
    for<'a> G::SerializableType: serde::Deserialize<'a>,
{
    fn from_ron_string(s: &str) -> GridResult<Self> {
        Self::from_serializable(ron::from_str(s)?)
    }
}
