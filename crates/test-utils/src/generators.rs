//! Test data generators for synthetic fields and remapping weights.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use ndarray::{Array2, ArrayD, IxDyn};

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(5, 10);
/// assert_eq!(grid.dim(), (5, 10));
/// assert_eq!(grid[[0, 1]], 1000.0); // row=0, col=1
/// assert_eq!(grid[[1, 0]], 1.0);    // row=1, col=0
/// ```
pub fn create_test_grid(ny: usize, nx: usize) -> Array2<f64> {
    Array2::from_shape_fn((ny, nx), |(row, col)| (col * 1000 + row) as f64)
}

/// Creates a test grid with temperature-like values in Kelvin.
///
/// Values vary smoothly from about 250K at the poles to 310K at the equator.
pub fn create_temperature_grid(ny: usize, nx: usize) -> Array2<f64> {
    Array2::from_shape_fn((ny, nx), |(row, _col)| {
        let lat_factor = 1.0 - (2.0 * (row as f64 + 0.5) / ny as f64 - 1.0).abs();
        250.0 + lat_factor * 60.0
    })
}

/// Creates a field of shape `extra + (ny, nx)` where each horizontal slice is
/// the [`create_test_grid`] pattern offset by `100_000 * slice_index`.
pub fn create_batched_field(extra: &[usize], ny: usize, nx: usize) -> ArrayD<f64> {
    let mut shape = extra.to_vec();
    shape.push(ny);
    shape.push(nx);

    let slice_len = ny * nx;
    let values: Vec<f64> = (0..shape.iter().product::<usize>())
        .map(|k| {
            let (slice, cell) = (k / slice_len.max(1), k % slice_len.max(1));
            let (row, col) = (cell / nx.max(1), cell % nx.max(1));
            (slice * 100_000 + col * 1000 + row) as f64
        })
        .collect();

    ArrayD::from_shape_vec(IxDyn(&shape), values).expect("shape and value count agree")
}

/// Sparse weight triplets with 1-based indices, as stored in weight files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTriplets {
    pub row: Vec<i64>,
    pub col: Vec<i64>,
    pub s: Vec<f64>,
}

impl WeightTriplets {
    pub fn push(&mut self, row: usize, col: usize, weight: f64) {
        self.row.push(row as i64 + 1);
        self.col.push(col as i64 + 1);
        self.s.push(weight);
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Drop every entry whose (1-based) destination index is `row`.
    pub fn without_row(mut self, row: i64) -> Self {
        let keep: Vec<bool> = self.row.iter().map(|&r| r != row).collect();
        let mut it = keep.iter();
        self.row.retain(|_| *it.next().unwrap_or(&true));
        let mut it = keep.iter();
        self.col.retain(|_| *it.next().unwrap_or(&true));
        let mut it = keep.iter();
        self.s.retain(|_| *it.next().unwrap_or(&true));
        self
    }
}

/// Identity weights for a grid with `n` cells.
pub fn identity_triplets(n: usize) -> WeightTriplets {
    let mut triplets = WeightTriplets::default();
    for k in 0..n {
        triplets.push(k, k, 1.0);
    }
    triplets
}

/// First-order conservative weights between two global lat-lon grids.
///
/// Both grids start at -180 degrees longitude and cover the whole sphere.
/// Each weight is the area of the source/destination cell overlap divided
/// by the destination cell area, so rows sum to one.
pub fn conservative_latlon_triplets(src: (usize, usize), dst: (usize, usize)) -> WeightTriplets {
    let (nx_src, ny_src) = src;
    let (nx_dst, ny_dst) = dst;
    let mut triplets = WeightTriplets::default();

    for jd in 0..ny_dst {
        let (s_d, n_d) = lat_bounds(jd, ny_dst);
        for id in 0..nx_dst {
            let (w_d, e_d) = lon_bounds(id, nx_dst);
            let dst_area = cell_area(s_d, n_d, w_d, e_d);

            for js in 0..ny_src {
                let (s_s, n_s) = lat_bounds(js, ny_src);
                let (south, north) = (s_s.max(s_d), n_s.min(n_d));
                if north - south <= 1e-9 {
                    continue;
                }
                for is in 0..nx_src {
                    let (w_s, e_s) = lon_bounds(is, nx_src);
                    let (west, east) = (w_s.max(w_d), e_s.min(e_d));
                    if east - west <= 1e-9 {
                        continue;
                    }
                    let overlap = cell_area(south, north, west, east);
                    triplets.push(jd * nx_dst + id, js * nx_src + is, overlap / dst_area);
                }
            }
        }
    }

    triplets
}

fn lat_bounds(j: usize, ny: usize) -> (f64, f64) {
    let dy = 180.0 / ny as f64;
    (-90.0 + j as f64 * dy, -90.0 + (j + 1) as f64 * dy)
}

fn lon_bounds(i: usize, nx: usize) -> (f64, f64) {
    let dx = 360.0 / nx as f64;
    (-180.0 + i as f64 * dx, -180.0 + (i + 1) as f64 * dx)
}

fn cell_area(south: f64, north: f64, west: f64, east: f64) -> f64 {
    (north.to_radians().sin() - south.to_radians().sin()) * (east - west).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(2, 3);
        assert_eq!(grid[[0, 0]], 0.0);
        assert_eq!(grid[[1, 2]], 2001.0);
    }

    #[test]
    fn test_temperature_grid_range() {
        let grid = create_temperature_grid(18, 36);
        assert!(grid.iter().all(|&t| (250.0..=310.0).contains(&t)));
    }

    #[test]
    fn test_batched_field() {
        let field = create_batched_field(&[2, 3], 2, 2);
        assert_eq!(field.shape(), &[2, 3, 2, 2]);
        assert_eq!(field[[0, 0, 0, 1]], 1000.0);
        assert_eq!(field[[1, 2, 1, 0]], 500_001.0);
    }

    #[test]
    fn test_identity_triplets() {
        let t = identity_triplets(3);
        assert_eq!(t.row, vec![1, 2, 3]);
        assert_eq!(t.col, vec![1, 2, 3]);
        assert_eq!(t.s, vec![1.0; 3]);
    }

    #[test]
    fn test_conservative_rows_sum_to_one() {
        let t = conservative_latlon_triplets((8, 4), (4, 2));
        let mut sums = vec![0.0; 8];
        for (&r, &w) in t.row.iter().zip(&t.s) {
            sums[(r - 1) as usize] += w;
        }
        assert!(sums.iter().all(|&s| (s - 1.0).abs() < 1e-12));
        // Each coarse cell covers 2 x 2 fine cells.
        assert_eq!(t.len(), 32);
    }

    #[test]
    fn test_without_row() {
        let t = identity_triplets(3).without_row(2);
        assert_eq!(t.row, vec![1, 3]);
        assert_eq!(t.col, vec![1, 3]);
        assert_eq!(t.len(), 2);
    }
}
