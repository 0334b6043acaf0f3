//! Errors

/// Errors raised while building or traversing grids and grid views
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    /// A precondition on the input data or configuration does not hold
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The grid is not compatible with the requested operation
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// An API was used in a way that is not allowed
    #[error("You are using this wrong: {0}")]
    Misuse(String),
    /// A grid file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
    /// Reading or writing a file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A RON string could not be deserialized
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Ron(#[from] ron::error::SpannedError),
    /// A value could not be serialized to RON
    #[cfg(feature = "serde")]
    #[error(transparent)]
    RonSerialize(#[from] ron::Error),
}

/// Result type
pub type GridResult<T> = std::result::Result<T, GridError>;
