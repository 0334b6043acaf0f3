mod dgf;
#[cfg(feature = "serde")]
mod ron;

pub use dgf::DGFImport;
#[cfg(feature = "serde")]
pub use ron::{ConvertToSerializable, RONExport, RONImport};
