//! Core types for SCRIP grid descriptions.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Solid angle of the full sphere in steradians.
pub const SPHERE_SOLID_ANGLE: f64 = 4.0 * std::f64::consts::PI;

/// Relative tolerance used when checking that cell areas cover the sphere.
pub const AREA_SUM_RTOL: f64 = 1e-7;

/// Number of corners per SCRIP cell.
pub const CORNERS_PER_CELL: usize = 4;

/// Corner positions within a cell, in counterclockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    SouthWest = 0,
    SouthEast = 1,
    NorthEast = 2,
    NorthWest = 3,
}

/// Global (file-level) attributes of a SCRIP grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAttributes {
    pub title: String,
    pub created_by: String,
    pub date_created: String,
    pub conventions: String,
}

impl Default for GridAttributes {
    fn default() -> Self {
        Self {
            title: String::new(),
            created_by: String::new(),
            date_created: String::new(),
            conventions: "SCRIP".to_string(),
        }
    }
}

/// A structured grid in SCRIP layout.
///
/// All per-cell arrays are flattened row-major over `(ny, nx)`: latitude is
/// the outer index and longitude the inner one. Corners are stored as
/// `[ny * nx, 4]` in SW, SE, NE, NW order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScripGrid {
    /// Grid dimensions as `[nx, ny]`.
    pub grid_dims: [usize; 2],
    /// Cell center latitudes (degrees).
    pub grid_center_lat: Array1<f64>,
    /// Cell center longitudes (degrees).
    pub grid_center_lon: Array1<f64>,
    /// Cell corner latitudes (degrees).
    pub grid_corner_lat: Array2<f64>,
    /// Cell corner longitudes (degrees).
    pub grid_corner_lon: Array2<f64>,
    /// Cell mask (1 = active, 0 = masked).
    pub grid_imask: Array1<i32>,
    /// Cell area (steradians).
    pub grid_area: Array1<f64>,
    /// File-level metadata.
    pub attrs: GridAttributes,
}

impl ScripGrid {
    /// Number of cells along longitude.
    pub fn nx(&self) -> usize {
        self.grid_dims[0]
    }

    /// Number of cells along latitude.
    pub fn ny(&self) -> usize {
        self.grid_dims[1]
    }

    /// Grid shape in working orientation, `(ny, nx)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.ny(), self.nx())
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all cell areas.
    pub fn total_area(&self) -> f64 {
        self.grid_area.sum()
    }

    /// The mask reshaped to `(ny, nx)`.
    pub fn mask_2d(&self) -> Result<Array2<i32>> {
        reshape_mask(&self.grid_imask, self.dims())
    }

    /// Shape and mask only, as needed by a regridder.
    pub fn layout(&self) -> GridLayout {
        GridLayout {
            grid_dims: self.grid_dims,
            grid_imask: self.grid_imask.clone(),
        }
    }

    /// Check whether the corners of cell `index` wind counterclockwise.
    ///
    /// Uses the shoelace formula in the local (lon, lat) plane, which is
    /// sufficient for the convex quadrilaterals of a lat-lon grid.
    pub fn is_counterclockwise(&self, index: usize) -> bool {
        signed_area(
            self.grid_corner_lon.row(index),
            self.grid_corner_lat.row(index),
        ) > 0.0
    }

    /// Check that every per-cell array agrees with `grid_dims`.
    ///
    /// Only the layout is checked. Regional grids, corner longitudes that
    /// wrap at ±180 or 0/360, and areas that do not cover the sphere are all
    /// valid SCRIP; the full-sphere checks belong to grid generation.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        if n == 0 {
            return Err(GridError::InvalidDimensions {
                nx: self.nx(),
                ny: self.ny(),
            });
        }

        let lengths = [
            ("grid_center_lat", self.grid_center_lat.len()),
            ("grid_center_lon", self.grid_center_lon.len()),
            ("grid_imask", self.grid_imask.len()),
            ("grid_area", self.grid_area.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(GridError::invalid_grid(format!(
                    "{} has {} entries, expected nx * ny = {}",
                    name, len, n
                )));
            }
        }

        for (name, corners) in [
            ("grid_corner_lat", &self.grid_corner_lat),
            ("grid_corner_lon", &self.grid_corner_lon),
        ] {
            if corners.dim() != (n, CORNERS_PER_CELL) {
                return Err(GridError::invalid_grid(format!(
                    "{} has shape {:?}, expected ({}, {})",
                    name,
                    corners.dim(),
                    n,
                    CORNERS_PER_CELL
                )));
            }
        }

        Ok(())
    }
}

/// Shape and mask of a SCRIP grid.
///
/// This is all a regridder reads from a grid file, so any SCRIP file works
/// here whether or not it carries corners and areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Grid dimensions as `[nx, ny]`.
    pub grid_dims: [usize; 2],
    /// Cell mask flattened row-major over `(ny, nx)`.
    pub grid_imask: Array1<i32>,
}

impl GridLayout {
    /// Create a layout, checking the dimensions and the mask length.
    pub fn new(grid_dims: [usize; 2], grid_imask: Array1<i32>) -> Result<Self> {
        let [nx, ny] = grid_dims;
        if nx == 0 || ny == 0 {
            return Err(GridError::InvalidDimensions { nx, ny });
        }
        if grid_imask.len() != nx * ny {
            return Err(GridError::invalid_grid(format!(
                "grid_imask has {} entries, expected nx * ny = {}",
                grid_imask.len(),
                nx * ny
            )));
        }
        Ok(Self {
            grid_dims,
            grid_imask,
        })
    }

    pub fn nx(&self) -> usize {
        self.grid_dims[0]
    }

    pub fn ny(&self) -> usize {
        self.grid_dims[1]
    }

    /// Grid shape in working orientation, `(ny, nx)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.ny(), self.nx())
    }

    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The mask reshaped to `(ny, nx)`.
    pub fn mask_2d(&self) -> Result<Array2<i32>> {
        reshape_mask(&self.grid_imask, self.dims())
    }
}

fn reshape_mask(imask: &Array1<i32>, dims: (usize, usize)) -> Result<Array2<i32>> {
    imask
        .clone()
        .into_shape(dims)
        .map_err(|e| GridError::invalid_grid(format!("grid_imask: {}", e)))
}

/// Fail unless `total` equals the sphere's solid angle within [`AREA_SUM_RTOL`].
pub fn check_area_sum(total: f64) -> Result<()> {
    let expected = SPHERE_SOLID_ANGLE;
    if (total - expected).abs() <= AREA_SUM_RTOL * expected.abs() {
        Ok(())
    } else {
        Err(GridError::AreaSumInvariantViolation {
            expected,
            actual: total,
        })
    }
}

fn signed_area(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let n = x.len();
    let mut acc = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        acc += x[i] * y[j] - x[j] * y[i];
    }
    acc / 2.0
}
