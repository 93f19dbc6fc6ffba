//! Labelled multi-dimensional fields.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayD};
use serde::{Deserialize, Serialize};

use crate::error::{RegridError, Result};

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A gridded field whose last two dimensions are latitude and longitude.
///
/// Leading dimensions (time, level, member, ...) are carried through a
/// regrid unchanged, together with their coordinate values. Missing values
/// are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Option<String>,
    pub dims: Vec<String>,
    pub attrs: BTreeMap<String, AttrValue>,
    /// 1-D coordinate values keyed by dimension name.
    pub coords: BTreeMap<String, Array1<f64>>,
    pub data: ArrayD<f64>,
}

impl Field {
    /// Create a field, checking that there is one name per array dimension.
    pub fn new<S: Into<String>>(
        data: ArrayD<f64>,
        dims: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(RegridError::shape_mismatch(
                "number of dimension names vs data dimensions",
                data.ndim(),
                dims.len(),
            ));
        }
        Ok(Self {
            name: None,
            dims,
            attrs: BTreeMap::new(),
            coords: BTreeMap::new(),
            data,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Attach coordinate values to one of the field's dimensions.
    pub fn with_coord(mut self, dim: &str, values: Array1<f64>) -> Result<Self> {
        let axis = self
            .dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| RegridError::shape_mismatch("coordinate dimension", &self.dims, dim))?;
        let len = self.data.shape()[axis];
        if values.len() != len {
            return Err(RegridError::shape_mismatch(
                format!("length of coordinate '{}'", dim),
                len,
                values.len(),
            ));
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Shape of the two trailing (horizontal) dimensions, if there are two.
    pub fn horizontal_shape(&self) -> Option<(usize, usize)> {
        horizontal_dims(self.data.shape())
    }

    /// Names of the leading (non-horizontal) dimensions.
    pub fn extra_dims(&self) -> &[String] {
        &self.dims[..self.dims.len().saturating_sub(2)]
    }
}

/// The trailing `(ny, nx)` of an array shape, if it has at least two axes.
pub fn horizontal_dims(shape: &[usize]) -> Option<(usize, usize)> {
    match shape {
        [.., ny, nx] => Some((*ny, *nx)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};

    #[test]
    fn test_new_checks_dim_names() {
        let data = Array::<f64, _>::zeros((2, 3, 4)).into_dyn();
        assert!(Field::new(data.clone(), ["time", "lat", "lon"]).is_ok());
        assert!(matches!(
            Field::new(data, ["lat", "lon"]),
            Err(RegridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_horizontal_shape_and_extra_dims() {
        let data = Array::<f64, _>::zeros((2, 3, 4)).into_dyn();
        let field = Field::new(data, ["time", "lat", "lon"]).unwrap();
        assert_eq!(field.horizontal_shape(), Some((3, 4)));
        assert_eq!(field.extra_dims(), &["time".to_string()]);

        let flat = Field::new(Array::<f64, _>::zeros(4).into_dyn(), ["x"]).unwrap();
        assert_eq!(flat.horizontal_shape(), None);
        assert!(flat.extra_dims().is_empty());
    }

    #[test]
    fn test_with_coord_validates_length() {
        let data = Array::<f64, _>::zeros((2, 3, 4)).into_dyn();
        let field = Field::new(data, ["time", "lat", "lon"]).unwrap();

        let field = field.with_coord("time", array![0.0, 6.0]).unwrap();
        assert_eq!(field.coords["time"], array![0.0, 6.0]);

        assert!(field.clone().with_coord("time", array![0.0]).is_err());
        assert!(field.with_coord("level", array![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_attrs() {
        let field = Field::new(array![[1.0]].into_dyn(), ["lat", "lon"])
            .unwrap()
            .with_name("tas")
            .with_attr("units", "K")
            .with_attr("scale", 2.0);
        assert_eq!(field.name.as_deref(), Some("tas"));
        assert_eq!(field.attrs["units"], AttrValue::Str("K".to_string()));
        assert_eq!(field.attrs["scale"], AttrValue::Float(2.0));
    }

    #[test]
    fn test_horizontal_dims() {
        assert_eq!(horizontal_dims(&[5, 2, 3]), Some((2, 3)));
        assert_eq!(horizontal_dims(&[2, 3]), Some((2, 3)));
        assert_eq!(horizontal_dims(&[3]), None);
        assert_eq!(horizontal_dims(&[]), None);
    }
}
