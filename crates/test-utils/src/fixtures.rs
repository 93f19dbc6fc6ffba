//! Common grid sizes for regridding tests.
//!
//! Sizes are `(nx, ny)`, matching the order of SCRIP `grid_dims`.

/// One cell per hemisphere and quadrant (4 x 2).
pub const QUADRANTS: (usize, usize) = (4, 2);

/// Smallest grid with distinct rows and columns (2 x 2).
pub const TINY: (usize, usize) = (2, 2);

/// 10 degree global grid.
pub const TEN_DEGREE: (usize, usize) = (36, 18);

/// 5 degree global grid.
pub const FIVE_DEGREE: (usize, usize) = (72, 36);

/// Common leading dimension names.
pub mod dims {
    pub const TIME: &str = "time";
    pub const LEVEL: &str = "lev";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
}
