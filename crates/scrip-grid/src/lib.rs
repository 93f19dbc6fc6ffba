//! SCRIP Grid Descriptions for Regular Latitude-Longitude Grids
//!
//! This crate produces the grid files consumed by external weight generators
//! (ESMF, SCRIP) and by the `regrid` crate:
//!
//! - **Cell centers and corners** for an `nx` by `ny` global lat-lon grid,
//!   corners ordered counterclockwise (SW, SE, NE, NW)
//! - **Exact cell areas** in steradians, checked to cover the whole sphere
//! - **Cell mask** (1 = active, 0 = excluded)
//!
//! With the `netcdf` feature, grids can be written to and read from SCRIP
//! NetCDF files.
//!
//! # Example
//!
//! ```
//! use scrip_grid::{latlon_to_scrip, DEFAULT_LON0};
//!
//! let grid = latlon_to_scrip(4, 2, DEFAULT_LON0, None).unwrap();
//! assert_eq!(grid.grid_dims, [4, 2]);
//! assert_eq!(grid.dims(), (2, 4));
//! ```

pub mod error;
pub mod generate;
#[cfg(feature = "netcdf")]
pub mod io;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{GridError, Result};
pub use generate::{latlon_to_scrip, LatLonGridSpec, DEFAULT_LON0};
pub use types::{
    check_area_sum, Corner, GridAttributes, GridLayout, ScripGrid, AREA_SUM_RTOL, CORNERS_PER_CELL,
    SPHERE_SOLID_ANGLE,
};
