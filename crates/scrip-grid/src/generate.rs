//! SCRIP grid generation for regular latitude-longitude grids.

use chrono::Local;
use ndarray::{Array1, Array2};

use crate::error::{GridError, Result};
use crate::types::{check_area_sum, Corner, GridAttributes, ScripGrid, CORNERS_PER_CELL};

/// Default longitude of the western grid boundary.
pub const DEFAULT_LON0: f64 = -180.0;

/// Parameters describing a regular lat-lon grid.
#[derive(Debug, Clone)]
pub struct LatLonGridSpec {
    /// Number of cells along longitude.
    pub nx: usize,
    /// Number of cells along latitude.
    pub ny: usize,
    /// Longitude on the western grid boundary (degrees).
    pub lon0: f64,
    /// Optional cell mask of shape `(ny, nx)`; all ones when absent.
    pub mask: Option<Array2<i32>>,
}

impl LatLonGridSpec {
    /// Describe an `nx` by `ny` grid starting at -180 degrees.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            lon0: DEFAULT_LON0,
            mask: None,
        }
    }

    /// Set the western boundary longitude.
    pub fn with_lon0(mut self, lon0: f64) -> Self {
        self.lon0 = lon0;
        self
    }

    /// Set the cell mask.
    pub fn with_mask(mut self, mask: Array2<i32>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Cell width in degrees.
    pub fn dx(&self) -> f64 {
        360.0 / self.nx as f64
    }

    /// Cell height in degrees.
    pub fn dy(&self) -> f64 {
        180.0 / self.ny as f64
    }

    /// Build the grid.
    ///
    /// Fails if the dimensions are zero, the mask has the wrong shape, or the
    /// cell areas do not add up to the full sphere.
    pub fn generate(&self) -> Result<ScripGrid> {
        let (nx, ny) = (self.nx, self.ny);
        if nx == 0 || ny == 0 {
            return Err(GridError::InvalidDimensions { nx, ny });
        }

        let mask = match &self.mask {
            Some(mask) if mask.dim() != (ny, nx) => {
                return Err(GridError::MaskShapeMismatch {
                    expected: (ny, nx),
                    actual: mask.dim(),
                });
            }
            Some(mask) => mask.clone(),
            None => Array2::ones((ny, nx)),
        };

        let dx = self.dx();
        let dy = self.dy();
        let lat = Array1::from_shape_fn(ny, |j| -90.0 + dy / 2.0 + j as f64 * dy);
        let lon = Array1::from_shape_fn(nx, |i| self.lon0 + dx / 2.0 + i as f64 * dx);

        let n = nx * ny;
        let mut center_lat = Array1::<f64>::zeros(n);
        let mut center_lon = Array1::<f64>::zeros(n);
        let mut corner_lat = Array2::<f64>::zeros((n, CORNERS_PER_CELL));
        let mut corner_lon = Array2::<f64>::zeros((n, CORNERS_PER_CELL));
        let mut area = Array1::<f64>::zeros(n);

        for j in 0..ny {
            for i in 0..nx {
                let k = j * nx + i;
                let (yc, xc) = (lat[j], lon[i]);
                center_lat[k] = yc;
                center_lon[k] = xc;

                let (south, north) = (yc - dy / 2.0, yc + dy / 2.0);
                let (west, east) = (xc - dx / 2.0, xc + dx / 2.0);

                for (corner, y, x) in [
                    (Corner::SouthWest, south, west),
                    (Corner::SouthEast, south, east),
                    (Corner::NorthEast, north, east),
                    (Corner::NorthWest, north, west),
                ] {
                    corner_lat[[k, corner as usize]] = y;
                    corner_lon[[k, corner as usize]] = x;
                }

                area[k] = (north.to_radians().sin() - south.to_radians().sin())
                    * (east.to_radians() - west.to_radians());
            }
        }

        check_area_sum(area.sum())?;

        // Logical (row-major) order regardless of the mask's memory layout.
        let grid_imask: Array1<i32> = mask.iter().copied().collect();

        tracing::debug!(nx, ny, lon0 = self.lon0, "generated lat-lon SCRIP grid");

        Ok(ScripGrid {
            grid_dims: [nx, ny],
            grid_center_lat: center_lat,
            grid_center_lon: center_lon,
            grid_corner_lat: corner_lat,
            grid_corner_lon: corner_lon,
            grid_imask,
            grid_area: area,
            attrs: GridAttributes {
                title: format!("{} x {} (lat x lon) grid", dy, dx),
                created_by: "latlon_to_scrip".to_string(),
                date_created: Local::now().to_string(),
                conventions: "SCRIP".to_string(),
            },
        })
    }
}

/// Generate a SCRIP grid for a regular `nx` by `ny` lat-lon grid.
///
/// `lon0` is the longitude of the western boundary. `mask` must have shape
/// `(ny, nx)` when given; cells set to 0 are excluded by weight generators.
pub fn latlon_to_scrip(
    nx: usize,
    ny: usize,
    lon0: f64,
    mask: Option<Array2<i32>>,
) -> Result<ScripGrid> {
    LatLonGridSpec {
        nx,
        ny,
        lon0,
        mask,
    }
    .generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SPHERE_SOLID_ANGLE;

    #[test]
    fn test_four_by_two_grid() {
        let grid = latlon_to_scrip(4, 2, DEFAULT_LON0, None).unwrap();

        assert_eq!(grid.grid_dims, [4, 2]);
        assert_eq!(grid.len(), 8);
        assert!((grid.total_area() - SPHERE_SOLID_ANGLE).abs() < 1e-6 * SPHERE_SOLID_ANGLE);

        let lats: Vec<f64> = grid.grid_center_lat.to_vec();
        assert_eq!(lats, vec![-45.0, -45.0, -45.0, -45.0, 45.0, 45.0, 45.0, 45.0]);
        let lons: Vec<f64> = grid.grid_center_lon.iter().take(4).copied().collect();
        assert_eq!(lons, vec![-135.0, -45.0, 45.0, 135.0]);
    }

    #[test]
    fn test_corner_order() {
        let grid = latlon_to_scrip(4, 2, DEFAULT_LON0, None).unwrap();

        // First cell spans lon [-180, -90], lat [-90, 0].
        assert_eq!(grid.grid_corner_lon.row(0).to_vec(), vec![-180.0, -90.0, -90.0, -180.0]);
        assert_eq!(grid.grid_corner_lat.row(0).to_vec(), vec![-90.0, -90.0, 0.0, 0.0]);
    }

    #[test]
    fn test_area_sum_many_sizes() {
        for (nx, ny) in [(1, 1), (3, 7), (360, 180), (144, 96), (17, 5)] {
            let grid = latlon_to_scrip(nx, ny, DEFAULT_LON0, None).unwrap();
            let total = grid.total_area();
            assert!(
                (total - SPHERE_SOLID_ANGLE).abs() < 1e-6 * SPHERE_SOLID_ANGLE,
                "{}x{}: area sum {}",
                nx,
                ny,
                total
            );
        }
    }

    #[test]
    fn test_all_cells_counterclockwise() {
        let grid = latlon_to_scrip(12, 6, 0.0, None).unwrap();
        assert!((0..grid.len()).all(|i| grid.is_counterclockwise(i)));
    }

    #[test]
    fn test_lon0_shifts_centers() {
        let grid = LatLonGridSpec::new(4, 2).with_lon0(0.0).generate().unwrap();
        let lons: Vec<f64> = grid.grid_center_lon.iter().take(4).copied().collect();
        assert_eq!(lons, vec![45.0, 135.0, 225.0, 315.0]);
    }

    #[test]
    fn test_default_mask_is_all_ones() {
        let grid = latlon_to_scrip(3, 2, DEFAULT_LON0, None).unwrap();
        assert!(grid.grid_imask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_custom_mask_is_flattened_row_major() {
        let mut mask = Array2::ones((2, 3));
        mask[[1, 0]] = 0;
        let grid = LatLonGridSpec::new(3, 2).with_mask(mask).generate().unwrap();
        assert_eq!(grid.grid_imask.to_vec(), vec![1, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let mask = Array2::ones((3, 2));
        let err = LatLonGridSpec::new(3, 2).with_mask(mask).generate().unwrap_err();
        assert!(matches!(
            err,
            GridError::MaskShapeMismatch {
                expected: (2, 3),
                actual: (3, 2)
            }
        ));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            latlon_to_scrip(0, 4, DEFAULT_LON0, None),
            Err(GridError::InvalidDimensions { nx: 0, ny: 4 })
        ));
    }

    #[test]
    fn test_metadata() {
        let grid = latlon_to_scrip(4, 2, DEFAULT_LON0, None).unwrap();
        assert_eq!(grid.attrs.title, "90 x 90 (lat x lon) grid");
        assert_eq!(grid.attrs.created_by, "latlon_to_scrip");
        assert_eq!(grid.attrs.conventions, "SCRIP");
        assert!(!grid.attrs.date_created.is_empty());
    }
}
