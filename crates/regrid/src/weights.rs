//! Precomputed remapping weight tables.

use serde::{Deserialize, Serialize};

use crate::error::{RegridError, Result};
use crate::sparse::SparseWeights;

/// Weight triplets as produced by an external weight generator.
///
/// `row` holds destination cell indices and `col` source cell indices, both
/// 1-based as in ESMF/SCRIP weight files. `S` is the weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    row: Vec<i64>,
    col: Vec<i64>,
    #[serde(rename = "S")]
    s: Vec<f64>,
}

impl WeightTable {
    /// Create a table from aligned 1-based `row`, `col` and weight arrays.
    pub fn new(row: Vec<i64>, col: Vec<i64>, s: Vec<f64>) -> Result<Self> {
        let table = Self { row, col, s };
        table.check_aligned()?;
        Ok(table)
    }

    /// Identity weights for a grid with `n` cells.
    pub fn identity(n: usize) -> Self {
        let index: Vec<i64> = (1..=n as i64).collect();
        Self {
            row: index.clone(),
            col: index,
            s: vec![1.0; n],
        }
    }

    /// 1-based destination indices.
    pub fn rows(&self) -> &[i64] {
        &self.row
    }

    /// 1-based source indices.
    pub fn cols(&self) -> &[i64] {
        &self.col
    }

    pub fn weights(&self) -> &[f64] {
        &self.s
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Build the `(n_dst, n_src)` sparse operator, converting to 0-based indices.
    pub fn to_sparse(&self, n_dst: usize, n_src: usize) -> Result<SparseWeights> {
        self.check_aligned()?;
        let rows = to_zero_based(&self.row, "row", n_dst)?;
        let cols = to_zero_based(&self.col, "col", n_src)?;
        SparseWeights::from_triplets((n_dst, n_src), &rows, &cols, &self.s)
    }

    fn check_aligned(&self) -> Result<()> {
        if self.row.len() != self.col.len() || self.row.len() != self.s.len() {
            return Err(RegridError::invalid_weights(format!(
                "row, col and S must have equal lengths (got {}, {}, {})",
                self.row.len(),
                self.col.len(),
                self.s.len()
            )));
        }
        Ok(())
    }
}

fn to_zero_based(indices: &[i64], axis: &'static str, bound: usize) -> Result<Vec<usize>> {
    indices
        .iter()
        .map(|&i| {
            if i >= 1 && (i as u64) <= bound as u64 {
                Ok((i - 1) as usize)
            } else {
                Err(RegridError::WeightIndexOutOfRange {
                    axis,
                    index: i,
                    bound,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_table() {
        let table = WeightTable::identity(3);
        assert_eq!(table.rows(), &[1, 2, 3]);
        assert_eq!(table.cols(), &[1, 2, 3]);
        assert_eq!(table.weights(), &[1.0, 1.0, 1.0]);

        let sparse = table.to_sparse(3, 3).unwrap();
        assert_eq!(
            sparse.matrix().to_dense(),
            SparseWeights::identity(3).matrix().to_dense()
        );
    }

    #[test]
    fn test_one_based_conversion() {
        let table = WeightTable::new(vec![1, 2], vec![4, 1], vec![0.5, 2.0]).unwrap();
        let sparse = table.to_sparse(2, 4).unwrap();
        assert_eq!(sparse.nnz(), 2);
        assert_eq!(sparse.matrix().get(0, 3), Some(&0.5));
        assert_eq!(sparse.matrix().get(1, 0), Some(&2.0));
    }

    #[test]
    fn test_zero_index_rejected() {
        let table = WeightTable::new(vec![0], vec![1], vec![1.0]).unwrap();
        assert!(matches!(
            table.to_sparse(1, 1),
            Err(RegridError::WeightIndexOutOfRange { axis: "row", index: 0, bound: 1 })
        ));
    }

    #[test]
    fn test_index_past_grid_rejected() {
        let table = WeightTable::new(vec![1], vec![5], vec![1.0]).unwrap();
        assert!(matches!(
            table.to_sparse(1, 4),
            Err(RegridError::WeightIndexOutOfRange { axis: "col", index: 5, bound: 4 })
        ));
    }

    #[test]
    fn test_misaligned_rejected() {
        assert!(matches!(
            WeightTable::new(vec![1, 2], vec![1], vec![1.0]),
            Err(RegridError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_json_uses_capital_s() {
        let table = WeightTable::identity(1);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["S"], serde_json::json!([1.0]));
        assert_eq!(json["row"], serde_json::json!([1]));
    }
}
