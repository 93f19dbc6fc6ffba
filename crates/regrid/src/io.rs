//! NetCDF loaders for weight files and file-based regridder construction.

use std::path::Path;

use scrip_grid::GridLayout;

use crate::error::{RegridError, Result};
use crate::regridder::Regridder;
use crate::weights::WeightTable;

impl WeightTable {
    /// Read `row`, `col` and `S` from an ESMF/SCRIP weight file.
    pub fn read_netcdf(path: impl AsRef<Path>) -> Result<Self> {
        let file = netcdf::open(path.as_ref())?;
        let row: Vec<i64> = read_var(&file, "row")?;
        let col: Vec<i64> = read_var(&file, "col")?;
        let s: Vec<f64> = read_var(&file, "S")?;
        Self::new(row, col, s)
    }

    /// Write the table as an `n_s`-long weight file.
    pub fn write_netcdf(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::info!("writing {}", path.display());

        let mut file = netcdf::create(path)?;
        file.add_dimension("n_s", self.len())?;

        let row: Vec<i32> = to_i32(self.rows())?;
        let col: Vec<i32> = to_i32(self.cols())?;
        file.add_variable::<i32>("row", &["n_s"])?.put_values(&row, ..)?;
        file.add_variable::<i32>("col", &["n_s"])?.put_values(&col, ..)?;
        file.add_variable::<f64>("S", &["n_s"])?.put_values(self.weights(), ..)?;
        Ok(())
    }
}

impl Regridder {
    /// Build a regridder from a source grid file, a destination grid file
    /// and a weight file.
    ///
    /// Only `grid_dims` and `grid_imask` are read from the grid files.
    pub fn from_files(
        src_grid_file: impl AsRef<Path>,
        dst_grid_file: impl AsRef<Path>,
        weight_file: impl AsRef<Path>,
    ) -> Result<Self> {
        let (src_path, dst_path) = (src_grid_file.as_ref(), dst_grid_file.as_ref());

        let src = GridLayout::read_netcdf(src_path)?;
        let dst = GridLayout::read_netcdf(dst_path)?;
        let weights = WeightTable::read_netcdf(weight_file)?;

        Self::from_layouts(&src, &dst, &weights, base_name(src_path), base_name(dst_path))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn to_i32(values: &[i64]) -> Result<Vec<i32>> {
    values
        .iter()
        .map(|&v| {
            i32::try_from(v).map_err(|_| {
                RegridError::invalid_weights(format!("index {} does not fit in i32", v))
            })
        })
        .collect()
}

fn read_var<T>(file: &netcdf::File, name: &str) -> Result<Vec<T>>
where
    T: netcdf::NcTypeDescriptor + Copy,
{
    let var = file
        .variable(name)
        .ok_or_else(|| RegridError::MissingVariable(name.to_string()))?;
    Ok(var.get_values(..)?)
}
