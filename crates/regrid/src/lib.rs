//! Regridding with Precomputed Sparse Weights
//!
//! This crate moves gridded fields from a source grid to a destination grid
//! using a sparse weight matrix computed ahead of time by an external tool
//! (ESMF, SCRIP, ...). It does not compute weights.
//!
//! # Architecture
//!
//! ```text
//! src ScripGrid ─┐
//! dst ScripGrid ─┼─► Regridder::new ─► SparseWeights (n_dst x n_src, CSR)
//! WeightTable  ──┘                         │
//!                                          ▼
//! Field (..., ny_src, nx_src) ─► Regridder::transform
//!                                   │
//!                                   ├─► NaN → 0, finite indicator
//!                                   ├─► apply_weights(data), apply_weights(indicator)
//!                                   ├─► data / coverage (NaN where coverage is 0)
//!                                   └─► destination mask → NaN
//!                                          │
//!                                          ▼
//!                          Field (..., ny_dst, nx_dst)
//! ```
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use regrid::{Field, Regridder, WeightTable};
//! use scrip_grid::{latlon_to_scrip, DEFAULT_LON0};
//!
//! let grid = latlon_to_scrip(2, 2, DEFAULT_LON0, None).unwrap();
//! let regridder = Regridder::new(&grid, &grid, &WeightTable::identity(4)).unwrap();
//!
//! let field = Field::new(array![[1.0, 2.0], [3.0, 4.0]].into_dyn(), ["lat", "lon"]).unwrap();
//! let out = regridder.regrid(&field).unwrap();
//! assert_eq!(out.data, field.data);
//! ```

pub mod config;
pub mod error;
pub mod field;
#[cfg(feature = "netcdf")]
pub mod io;
pub mod numeric;
pub mod regridder;
pub mod sparse;
pub mod weights;

// Re-export commonly used types at crate root
pub use config::RegridOptions;
pub use error::{RegridError, Result};
pub use field::{AttrValue, Field};
pub use numeric::{InvalidValueGuard, InvalidValuePolicy};
pub use regridder::Regridder;
pub use sparse::{apply_weights, SparseWeights};
pub use weights::WeightTable;
