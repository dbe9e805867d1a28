//! Error types for grid processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while averaging a grid.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// The grid file does not exist.
    #[error("grid file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Failed to open the grid or read its header.
    #[error("failed to open grid: {0}")]
    OpenFailed(String),

    /// No candidate variable and no data variable at all.
    #[error("no such variable: {0}")]
    NoSuchVariable(String),

    /// Latitude/longitude axes missing or unusable.
    #[error("axis selection failed: {0}")]
    AxisSelection(String),

    /// Failed to read variable data.
    #[error("failed to read grid data: {0}")]
    ReadFailed(String),
}

impl GridProcessorError {
    /// Create an OpenFailed error.
    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenFailed(msg.into())
    }

    /// Create an AxisSelection error.
    pub fn axis(msg: impl Into<String>) -> Self {
        Self::AxisSelection(msg.into())
    }

    /// Create a ReadFailed error.
    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    /// Whether the error means "the file is not there" rather than "the file is bad".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound(_))
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "not_found",
            Self::OpenFailed(_) => "open_failed",
            Self::NoSuchVariable(_) => "no_such_variable",
            Self::AxisSelection(_) => "axis_selection",
            Self::ReadFailed(_) => "read_failed",
        }
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
