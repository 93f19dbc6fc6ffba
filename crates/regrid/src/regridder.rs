//! Regridding of fields with a precomputed sparse weight operator.

use std::fmt;

use ndarray::{Array2, ArrayD, ArrayViewD, Zip};
use scrip_grid::{GridLayout, ScripGrid};

use crate::config::RegridOptions;
use crate::error::{RegridError, Result};
use crate::field::{horizontal_dims, Field};
use crate::numeric::{checked_divide, InvalidValueGuard};
use crate::sparse::{apply_weights, SparseWeights};
use crate::weights::WeightTable;

/// Transforms fields from a source grid to a destination grid.
///
/// Built once from the two grid descriptions and a weight table; immutable
/// afterwards and reusable for any number of transforms.
#[derive(Debug, Clone)]
pub struct Regridder {
    src_label: String,
    dst_label: String,
    dims_src: (usize, usize),
    dims_dst: (usize, usize),
    /// Destination mask in `(nx, ny)` orientation.
    mask_dst: Array2<i32>,
    weights: SparseWeights,
}

impl Regridder {
    /// Build a regridder from source and destination grids and their weights.
    pub fn new(src: &ScripGrid, dst: &ScripGrid, weights: &WeightTable) -> Result<Self> {
        Self::with_labels(src, dst, weights, src.attrs.title.clone(), dst.attrs.title.clone())
    }

    /// Like [`Regridder::new`], with explicit names for the two grids.
    pub fn with_labels(
        src: &ScripGrid,
        dst: &ScripGrid,
        weights: &WeightTable,
        src_label: impl Into<String>,
        dst_label: impl Into<String>,
    ) -> Result<Self> {
        Self::from_layouts(&src.layout(), &dst.layout(), weights, src_label, dst_label)
    }

    /// Build a regridder from grid shapes and masks alone.
    ///
    /// Cell geometry plays no part in applying precomputed weights, so
    /// regional or curvilinear grids work the same as global ones.
    pub fn from_layouts(
        src: &GridLayout,
        dst: &GridLayout,
        weights: &WeightTable,
        src_label: impl Into<String>,
        dst_label: impl Into<String>,
    ) -> Result<Self> {
        // grid_dims is stored as [nx, ny]
        let dims_src = src.dims();
        let dims_dst = dst.dims();

        let n_dst = dst.len();
        let n_src = src.len();
        if dst.grid_imask.len() != n_dst {
            return Err(RegridError::shape_mismatch(
                "destination grid_imask length vs ny * nx",
                n_dst,
                dst.grid_imask.len(),
            ));
        }
        let mask_dst = dst.mask_2d()?.reversed_axes();

        tracing::info!("source grid dims: {:?}", dims_src);
        tracing::info!("destination grid dims: {:?}", dims_dst);

        let weights = weights.to_sparse(n_dst, n_src)?;

        Ok(Self {
            src_label: src_label.into(),
            dst_label: dst_label.into(),
            dims_src,
            dims_dst,
            mask_dst,
            weights,
        })
    }

    /// Source grid shape `(ny, nx)`.
    pub fn dims_src(&self) -> (usize, usize) {
        self.dims_src
    }

    /// Destination grid shape `(ny, nx)`.
    pub fn dims_dst(&self) -> (usize, usize) {
        self.dims_dst
    }

    /// Destination mask, transposed to `(nx, ny)`.
    pub fn mask_dst(&self) -> &Array2<i32> {
        &self.mask_dst
    }

    pub fn weights(&self) -> &SparseWeights {
        &self.weights
    }

    /// Regrid a field with default options.
    pub fn regrid(&self, field: &Field) -> Result<Field> {
        self.transform(field, &RegridOptions::default())
    }

    /// Regrid a field.
    ///
    /// The output keeps the input's name, dimension names, attributes and
    /// the coordinates of its leading dimensions. The horizontal dimensions
    /// take the destination grid shape.
    pub fn transform(&self, field: &Field, options: &RegridOptions) -> Result<Field> {
        if field.dims.len() != field.data.ndim() {
            return Err(RegridError::shape_mismatch(
                "number of dimension names vs data dimensions",
                field.data.ndim(),
                field.dims.len(),
            ));
        }

        let data = self.transform_array(field.data.view(), options)?;

        let coords = field
            .extra_dims()
            .iter()
            .filter_map(|d| field.coords.get(d).map(|c| (d.clone(), c.clone())))
            .collect();

        Ok(Field {
            name: field.name.clone(),
            dims: field.dims.clone(),
            attrs: field.attrs.clone(),
            coords,
            data,
        })
    }

    /// Regrid a bare array of shape `(..., ny_src, nx_src)`.
    pub fn transform_array(
        &self,
        data: ArrayViewD<f64>,
        options: &RegridOptions,
    ) -> Result<ArrayD<f64>> {
        options.validate()?;
        self.check_source_shape(&data)?;

        let mut data_dst = if options.renormalize {
            self.remap_renormalized(data, options.min_coverage)?
        } else {
            apply_weights(&self.weights, data, self.dims_src, self.dims_dst)?
        };

        if options.apply_mask {
            self.mask_destination(&mut data_dst)?;
        }

        Ok(data_dst)
    }

    fn check_source_shape(&self, data: &ArrayViewD<f64>) -> Result<()> {
        if horizontal_dims(data.shape()) != Some(self.dims_src) {
            return Err(RegridError::shape_mismatch(
                "horizontal shape of input data vs regridder",
                self.dims_src,
                data.shape(),
            ));
        }
        Ok(())
    }

    /// Remap `data` and its finite-indicator, then divide by the coverage.
    fn remap_renormalized(
        &self,
        data: ArrayViewD<f64>,
        min_coverage: f64,
    ) -> Result<ArrayD<f64>> {
        let ones_src = data.mapv(|v| if v.is_nan() { 0.0 } else { 1.0 });
        let data_src = data.mapv(|v| if v.is_nan() { 0.0 } else { v });

        let data_dst = apply_weights(&self.weights, data_src.view(), self.dims_src, self.dims_dst)?;
        let ones_dst = apply_weights(&self.weights, ones_src.view(), self.dims_src, self.dims_dst)?;

        // Cells without (enough) coverage divide 0 by 0 here; they become NaN below.
        let _guard = InvalidValueGuard::ignore();
        let mut out = checked_divide(data_dst.view(), ones_dst.view());
        Zip::from(&mut out).and(&ones_dst).for_each(|v, &coverage| {
            if !(coverage > 0.0 && coverage > min_coverage) {
                *v = f64::NAN;
            }
        });
        Ok(out)
    }

    /// Set masked destination cells to NaN in every horizontal slice.
    fn mask_destination(&self, data: &mut ArrayD<f64>) -> Result<()> {
        // Back to (ny, nx), broadcast over the leading dimensions.
        let mask = self.mask_dst.t();
        let mask = mask.broadcast(data.raw_dim()).ok_or_else(|| {
            RegridError::shape_mismatch("destination mask vs output", mask.shape(), data.shape())
        })?;
        Zip::from(data).and(&mask).for_each(|v, &m| {
            if m == 0 {
                *v = f64::NAN;
            }
        });
        Ok(())
    }
}

impl fmt::Display for Regridder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regridder {} --> {}", self.src_label, self.dst_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use scrip_grid::{latlon_to_scrip, DEFAULT_LON0};

    fn identity_regridder(mask: Option<Array2<i32>>) -> Regridder {
        let src = latlon_to_scrip(2, 2, DEFAULT_LON0, None).unwrap();
        let dst = latlon_to_scrip(2, 2, DEFAULT_LON0, mask).unwrap();
        Regridder::new(&src, &dst, &WeightTable::identity(4)).unwrap()
    }

    #[test]
    fn test_labels_default_to_grid_titles() {
        let regridder = identity_regridder(None);
        assert_eq!(
            regridder.to_string(),
            "regridder 90 x 180 (lat x lon) grid --> 90 x 180 (lat x lon) grid"
        );
    }

    #[test]
    fn test_infinity_is_not_treated_as_missing() {
        let regridder = identity_regridder(None);
        let data = array![[1.0, f64::INFINITY], [f64::NAN, 4.0]].into_dyn();
        let out = regridder
            .transform_array(data.view(), &RegridOptions::default())
            .unwrap();
        assert_eq!(out[[0, 1]], f64::INFINITY);
        assert!(out[[1, 0]].is_nan());
        assert_eq!(out[[1, 1]], 4.0);
    }

    #[test]
    fn test_mask_without_renormalize() {
        let mut mask = Array2::ones((2, 2));
        mask[[0, 0]] = 0;
        let regridder = identity_regridder(Some(mask));
        let data = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let out = regridder
            .transform_array(
                data.view(),
                &RegridOptions::default().with_renormalize(false),
            )
            .unwrap();
        assert!(out[[0, 0]].is_nan());
        assert_eq!(out[[1, 1]], 4.0);
    }

    #[test]
    fn test_one_dimensional_input_rejected() {
        let regridder = identity_regridder(None);
        let data = array![1.0, 2.0, 3.0, 4.0].into_dyn();
        assert!(matches!(
            regridder.transform_array(data.view(), &RegridOptions::default()),
            Err(RegridError::ShapeMismatch { .. })
        ));
    }
}
