//! NetCDF read/write of SCRIP grid files.
//!
//! Files follow the layout expected by SCRIP/ESMF weight generators:
//! dimensions `grid_rank`, `grid_size` and `grid_corners`, and the
//! `grid_*` variables of [`ScripGrid`]. No `_FillValue` attributes are
//! written.

use std::path::Path;

use ndarray::{Array1, Array2};

use crate::error::{GridError, Result};
use crate::types::{GridAttributes, GridLayout, ScripGrid, CORNERS_PER_CELL};

impl ScripGrid {
    /// Write the grid to a NetCDF file, replacing any existing file.
    pub fn write_netcdf(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::info!("writing {}", path.display());

        let n = self.len();
        let mut file = netcdf::create(path)?;

        file.add_dimension("grid_rank", 2)?;
        file.add_dimension("grid_size", n)?;
        file.add_dimension("grid_corners", CORNERS_PER_CELL)?;

        {
            let dims: Vec<i32> = self
                .grid_dims
                .iter()
                .map(|&d| i32::try_from(d))
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| GridError::invalid_grid("grid_dims do not fit in i32"))?;
            let mut var = file.add_variable::<i32>("grid_dims", &["grid_rank"])?;
            var.put_values(&dims, ..)?;
        }

        for (name, values) in [
            ("grid_center_lat", &self.grid_center_lat),
            ("grid_center_lon", &self.grid_center_lon),
        ] {
            let mut var = file.add_variable::<f64>(name, &["grid_size"])?;
            var.put_attribute("units", "degrees")?;
            var.put_values(&values.to_vec(), ..)?;
        }

        for (name, values) in [
            ("grid_corner_lat", &self.grid_corner_lat),
            ("grid_corner_lon", &self.grid_corner_lon),
        ] {
            let flat: Vec<f64> = values.iter().copied().collect();
            let mut var = file.add_variable::<f64>(name, &["grid_size", "grid_corners"])?;
            var.put_attribute("units", "degrees")?;
            var.put_values(&flat, ..)?;
        }

        {
            let mut var = file.add_variable::<i32>("grid_imask", &["grid_size"])?;
            var.put_attribute("units", "unitless")?;
            var.put_values(&self.grid_imask.to_vec(), ..)?;
        }

        {
            let mut var = file.add_variable::<f64>("grid_area", &["grid_size"])?;
            var.put_attribute("units", "radians^2")?;
            var.put_attribute("long_name", "area weights")?;
            var.put_values(&self.grid_area.to_vec(), ..)?;
        }

        file.add_attribute("title", self.attrs.title.as_str())?;
        file.add_attribute("created_by", self.attrs.created_by.as_str())?;
        file.add_attribute("date_created", self.attrs.date_created.as_str())?;
        file.add_attribute("conventions", self.attrs.conventions.as_str())?;

        Ok(())
    }

    /// Read a complete grid from a SCRIP NetCDF file.
    ///
    /// Array lengths are checked against `grid_dims`; see
    /// [`ScripGrid::validate`].
    pub fn read_netcdf(path: impl AsRef<Path>) -> Result<Self> {
        let file = netcdf::open(path.as_ref())?;

        let grid_dims = read_grid_dims(&file)?;
        let n = grid_dims[0] * grid_dims[1];

        let corners = |name: &str| -> Result<Array2<f64>> {
            let flat: Vec<f64> = read_var(&file, name)?;
            Array2::from_shape_vec((n, CORNERS_PER_CELL), flat)
                .map_err(|e| GridError::invalid_grid(format!("{}: {}", name, e)))
        };

        let grid = ScripGrid {
            grid_dims,
            grid_center_lat: Array1::from(read_var::<f64>(&file, "grid_center_lat")?),
            grid_center_lon: Array1::from(read_var::<f64>(&file, "grid_center_lon")?),
            grid_corner_lat: corners("grid_corner_lat")?,
            grid_corner_lon: corners("grid_corner_lon")?,
            grid_imask: Array1::from(read_var::<i32>(&file, "grid_imask")?),
            grid_area: Array1::from(read_var::<f64>(&file, "grid_area")?),
            attrs: GridAttributes {
                title: read_string_attr(&file, "title"),
                created_by: read_string_attr(&file, "created_by"),
                date_created: read_string_attr(&file, "date_created"),
                conventions: read_string_attr(&file, "conventions"),
            },
        };

        grid.validate()?;
        Ok(grid)
    }
}

impl GridLayout {
    /// Read `grid_dims` and `grid_imask` from a SCRIP NetCDF file.
    ///
    /// Other variables are not touched, so files without corners or areas
    /// load fine.
    pub fn read_netcdf(path: impl AsRef<Path>) -> Result<Self> {
        let file = netcdf::open(path.as_ref())?;
        let grid_dims = read_grid_dims(&file)?;
        let grid_imask = Array1::from(read_var::<i32>(&file, "grid_imask")?);
        Self::new(grid_dims, grid_imask)
    }
}

fn read_grid_dims(file: &netcdf::File) -> Result<[usize; 2]> {
    let dims: Vec<i32> = read_var(file, "grid_dims")?;
    if dims.len() != 2 || dims.iter().any(|&d| d <= 0) {
        return Err(GridError::invalid_grid(format!(
            "grid_dims must hold two positive integers, got {:?}",
            dims
        )));
    }
    Ok([dims[0] as usize, dims[1] as usize])
}

fn read_var<T>(file: &netcdf::File, name: &str) -> Result<Vec<T>>
where
    T: netcdf::NcTypeDescriptor + Copy,
{
    let var = file
        .variable(name)
        .ok_or_else(|| GridError::missing_variable(name))?;
    Ok(var.get_values(..)?)
}

fn read_string_attr(file: &netcdf::File, name: &str) -> String {
    match file.attribute(name).and_then(|attr| attr.value().ok()) {
        Some(netcdf::AttributeValue::Str(s)) => s,
        _ => String::new(),
    }
}
