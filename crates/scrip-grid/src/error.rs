//! Error types for grid generation and grid file handling.

use thiserror::Error;

/// Errors that can occur while building or loading a SCRIP grid.
#[derive(Error, Debug)]
pub enum GridError {
    /// Grid dimensions must both be positive.
    #[error("invalid grid dimensions: nx={nx}, ny={ny} (both must be > 0)")]
    InvalidDimensions { nx: usize, ny: usize },

    /// The generated cell areas do not sum to the solid angle of the sphere.
    #[error("sum of cell areas {actual} does not equal the sphere's solid angle {expected}")]
    AreaSumInvariantViolation { expected: f64, actual: f64 },

    /// A user supplied mask has the wrong shape.
    #[error("mask shape {actual:?} does not match grid shape {expected:?}")]
    MaskShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A loaded grid is structurally inconsistent.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A required variable is missing from a grid file.
    #[error("missing variable: {0}")]
    MissingVariable(String),

    /// NetCDF library error.
    #[error("NetCDF error: {0}")]
    NetCdf(String),
}

impl GridError {
    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable(name.into())
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for GridError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCdf(err.to_string())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
