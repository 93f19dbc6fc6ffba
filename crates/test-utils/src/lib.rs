//! Shared test utilities for the scrip-regrid workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic field generators
//! - Weight triplet generators (identity, conservative lat-lon)
//! - Common grid sizes
//! - Approximate-equality assertions
//! - Log capture for `tracing` output
//!
//! Weight generators return plain 1-based `(row, col, S)` vectors so the
//! crate does not depend on the crates under test.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod logs;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use logs::{capture_logs, CapturedLogs};

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Elementwise approximate equality of two arrays, treating NaN == NaN.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_array_approx_eq;
///
/// assert_array_approx_eq!(out.data, expected, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_array_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = &$left;
        let right = &$right;
        assert_eq!(left.shape(), right.shape(), "array shapes differ");
        for (index, (l, r)) in left.iter().zip(right.iter()).enumerate() {
            let (l, r): (f64, f64) = (*l, *r);
            if l.is_nan() || r.is_nan() {
                assert!(
                    l.is_nan() && r.is_nan(),
                    "NaN mismatch at flat index {}: left {:?}, right {:?}",
                    index,
                    l,
                    r
                );
            } else {
                assert!(
                    (l - r).abs() <= $epsilon,
                    "mismatch at flat index {}: left {:?}, right {:?}",
                    index,
                    l,
                    r
                );
            }
        }
    }};
}
