//! Error types for NetCDF parsing operations.

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Command execution error (ncdump reader)
    #[error("Command execution failed: {0}")]
    CommandError(String),
}

impl NetCdfError {
    /// Create a MissingData error.
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingData(what.into())
    }

    /// Create an InvalidFormat error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}
