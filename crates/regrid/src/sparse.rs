//! Sparse remapping operator and its application to batched fields.
//!
//! The operator maps the flattened source grid (`ny_src * nx_src` cells) to
//! the flattened destination grid (`ny_dst * nx_dst` cells). It is stored
//! row-compressed (CSR), which streams each destination row over a
//! contiguous, row-major slice of source values.

use ndarray::{Array2, ArrayD, ArrayViewD, IxDyn};
use sprs::{CsMat, TriMat};

use crate::error::{RegridError, Result};
use crate::field::horizontal_dims;

/// A sparse `(n_dst, n_src)` weight matrix in compressed-row form.
#[derive(Debug, Clone)]
pub struct SparseWeights {
    matrix: CsMat<f64>,
}

impl SparseWeights {
    /// Build the operator from 0-based `(row, col, value)` triplets.
    ///
    /// Duplicate `(row, col)` entries are summed. Explicitly stored zeros
    /// are kept.
    pub fn from_triplets(
        shape: (usize, usize),
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
    ) -> Result<Self> {
        let (n_rows, n_cols) = shape;
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(RegridError::invalid_weights(format!(
                "row, col and S must have equal lengths (got {}, {}, {})",
                rows.len(),
                cols.len(),
                values.len()
            )));
        }

        // TriMat panics on out-of-range indices.
        if let Some(&r) = rows.iter().find(|&&r| r >= n_rows) {
            return Err(RegridError::WeightIndexOutOfRange {
                axis: "row",
                index: r as i64,
                bound: n_rows,
            });
        }
        if let Some(&c) = cols.iter().find(|&&c| c >= n_cols) {
            return Err(RegridError::WeightIndexOutOfRange {
                axis: "col",
                index: c as i64,
                bound: n_cols,
            });
        }

        let mut triplets = TriMat::with_capacity(shape, values.len());
        for ((&r, &c), &v) in rows.iter().zip(cols).zip(values) {
            triplets.add_triplet(r, c, v);
        }

        Ok(Self {
            matrix: triplets.to_csr(),
        })
    }

    /// The `n` by `n` identity operator.
    pub fn identity(n: usize) -> Self {
        Self {
            matrix: CsMat::eye(n),
        }
    }

    /// The underlying CSR matrix.
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// `(rows, cols)` = `(n_dst, n_src)`.
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.rows()
    }

    pub fn n_cols(&self) -> usize {
        self.matrix.cols()
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }
}

/// Apply regridding weights to data.
///
/// `indata` has shape `(..., shape_in.0, shape_in.1)`; the result has shape
/// `(..., shape_out.0, shape_out.1)` with the leading ("extra") dimensions
/// unchanged. Non-finite input values propagate through the operator, so a
/// NaN source reaches every destination cell with a stored entry for it,
/// even through a zero weight.
///
/// Input that is not in standard (C) layout is copied first and a warning is
/// logged, since the row-compressed operator is fastest on row-major data.
pub fn apply_weights(
    weights: &SparseWeights,
    indata: ArrayViewD<f64>,
    shape_in: (usize, usize),
    shape_out: (usize, usize),
) -> Result<ArrayD<f64>> {
    let shape_horiz = horizontal_dims(indata.shape()).ok_or_else(|| {
        RegridError::shape_mismatch("ndim of input data", ">= 2 (..., ny, nx)", indata.ndim())
    })?;
    let extra_shape = indata.shape()[..indata.ndim() - 2].to_vec();

    if shape_horiz != shape_in {
        return Err(RegridError::shape_mismatch(
            "horizontal shape of input data vs regridder",
            shape_in,
            shape_horiz,
        ));
    }
    if shape_in.0 * shape_in.1 != weights.n_cols() {
        return Err(RegridError::shape_mismatch(
            "ny_in * nx_in vs weights columns",
            weights.n_cols(),
            shape_in.0 * shape_in.1,
        ));
    }
    if shape_out.0 * shape_out.1 != weights.n_rows() {
        return Err(RegridError::shape_mismatch(
            "ny_out * nx_out vs weights rows",
            weights.n_rows(),
            shape_out.0 * shape_out.1,
        ));
    }

    if !indata.is_standard_layout() {
        tracing::warn!("Input array is not C-contiguous. Will affect performance.");
    }
    let indata = indata.as_standard_layout();

    let n_extra: usize = extra_shape.iter().product();
    let (n_dst, n_src) = weights.shape();

    tracing::debug!(
        n_extra,
        n_src,
        n_dst,
        nnz = weights.nnz(),
        "applying sparse weights"
    );

    let indata_flat = indata
        .view()
        .into_shape((n_extra, n_src))
        .map_err(|e| RegridError::shape_mismatch("flattened input", (n_extra, n_src), e))?;

    // (n_dst, n_src) x (n_src, n_extra), then back to one row per slice.
    let outdata_t: Array2<f64> = weights.matrix() * &indata_flat.t();
    let outdata_flat = outdata_t.reversed_axes().as_standard_layout().into_owned();

    let mut out_shape = extra_shape;
    out_shape.push(shape_out.0);
    out_shape.push(shape_out.1);
    outdata_flat
        .into_shape(IxDyn(&out_shape))
        .map_err(|e| RegridError::shape_mismatch("output", &out_shape, e))
}
