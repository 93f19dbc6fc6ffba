//! Error types for weight application and regridding.

use scrip_grid::GridError;
use thiserror::Error;

/// Errors that can occur while building a regridder or transforming data.
#[derive(Error, Debug)]
pub enum RegridError {
    /// Array or operator dimensions disagree.
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: String,
        actual: String,
    },

    /// A weight table entry points outside the grid.
    #[error("weight {axis} index {index} is out of range (grid has {bound} cells)")]
    WeightIndexOutOfRange {
        axis: &'static str,
        index: i64,
        bound: usize,
    },

    /// The weight table itself is malformed.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// Invalid regrid options.
    #[error("configuration error: {0}")]
    Config(String),

    /// Grid description error.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// A required variable is missing from a weight file.
    #[error("missing variable: {0}")]
    MissingVariable(String),

    /// NetCDF library error.
    #[error("NetCDF error: {0}")]
    NetCdf(String),
}

impl RegridError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(
        what: impl Into<String>,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    /// Create an InvalidWeights error.
    pub fn invalid_weights(msg: impl Into<String>) -> Self {
        Self::InvalidWeights(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for RegridError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCdf(err.to_string())
    }
}

/// Result type for regrid operations.
pub type Result<T> = std::result::Result<T, RegridError>;
