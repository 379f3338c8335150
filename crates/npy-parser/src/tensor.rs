//! Immutable shape-aware tensors and their nested-array views.

use crate::dtype::{DType, TensorData};
use crate::{NpyError, NpyResult};
use lake_common::Grid;

/// Decoded multi-dimensional array: a flat typed buffer plus its shape.
///
/// Invariant: `data.len() == product(shape)` (an empty shape holds one
/// element). Created once by decode and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: TensorData,
    shape: Vec<usize>,
}

/// Nested semantic view of a tensor with at most 3 axes.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedArray {
    Scalar(f64),
    D1(Vec<f64>),
    D2(Vec<Vec<f64>>),
    D3(Vec<Vec<Vec<f64>>>),
}

impl Tensor {
    /// Wrap a buffer, checking it matches `shape`.
    pub fn new(data: TensorData, shape: Vec<usize>) -> NpyResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(NpyError::Shape(format!(
                "buffer holds {} elements but shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major flat offset of `indices`.
    fn offset(&self, indices: &[usize]) -> NpyResult<usize> {
        if indices.len() != self.shape.len() {
            return Err(NpyError::Index(format!(
                "expected {} indices, got {}",
                self.shape.len(),
                indices.len()
            )));
        }

        let mut offset = 0;
        for (dim, (&idx, &len)) in indices.iter().zip(&self.shape).enumerate() {
            if idx >= len {
                return Err(NpyError::Index(format!(
                    "index {} at dim {} exceeds dim length {}",
                    idx, dim, len
                )));
            }
            offset = offset * len + idx;
        }
        Ok(offset)
    }

    /// Element at `indices`, widened to f64.
    pub fn at(&self, indices: &[usize]) -> NpyResult<f64> {
        let offset = self.offset(indices)?;
        Ok(self.data.value(offset))
    }

    /// Convert to nested arrays. Only tensors of rank 3 or less are supported.
    pub fn to_array(&self) -> NpyResult<NestedArray> {
        let values = self.data.to_f64_vec();
        match *self.shape.as_slice() {
            [] => Ok(NestedArray::Scalar(values[0])),
            [_] => Ok(NestedArray::D1(values)),
            [rows, cols] => Ok(NestedArray::D2(chunk_rows(&values, rows, cols))),
            [depth, rows, cols] => {
                let plane = rows * cols;
                let planes = (0..depth)
                    .map(|z| chunk_rows(&values[z * plane..(z + 1) * plane], rows, cols))
                    .collect();
                Ok(NestedArray::D3(planes))
            }
            _ => Err(NpyError::UnsupportedRank(self.rank())),
        }
    }

    /// View a rank-2 tensor as a grid.
    pub fn to_grid(&self) -> NpyResult<Grid> {
        match *self.shape.as_slice() {
            [rows, cols] => Grid::new(rows, cols, self.data.to_f64_vec())
                .map_err(|e| NpyError::Shape(e.to_string())),
            _ => Err(NpyError::Shape(format!(
                "expected a 2D tensor, got shape {:?}",
                self.shape
            ))),
        }
    }

    /// Split into 2D planes: a rank-2 tensor is one plane, a rank-3 tensor
    /// `[n, rows, cols]` is `n` planes.
    pub fn to_grids(&self) -> NpyResult<Vec<Grid>> {
        match *self.shape.as_slice() {
            [_, _] => Ok(vec![self.to_grid()?]),
            [depth, rows, cols] => {
                let values = self.data.to_f64_vec();
                let plane = rows * cols;
                (0..depth)
                    .map(|z| {
                        Grid::new(rows, cols, values[z * plane..(z + 1) * plane].to_vec())
                            .map_err(|e| NpyError::Shape(e.to_string()))
                    })
                    .collect()
            }
            _ => Err(NpyError::Shape(format!(
                "expected a 2D or 3D tensor, got shape {:?}",
                self.shape
            ))),
        }
    }
}

/// `rows` rows of `cols` values each; zero-width rows are kept as empty rows.
fn chunk_rows(values: &[f64], rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|r| values[r * cols..(r + 1) * cols].to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(shape: &[usize]) -> Tensor {
        let n: usize = shape.iter().product();
        let data = TensorData::I32((0..n as i32).collect());
        Tensor::new(data, shape.to_vec()).unwrap()
    }

    #[test]
    fn test_new_checks_length() {
        let err = Tensor::new(TensorData::U8(vec![1, 2, 3]), vec![2, 2]).unwrap_err();
        assert!(matches!(err, NpyError::Shape(_)));
    }

    #[test]
    fn test_at_row_major() {
        let t = tensor(&[2, 3]);
        assert_eq!(t.at(&[0, 0]).unwrap(), 0.0);
        assert_eq!(t.at(&[0, 2]).unwrap(), 2.0);
        assert_eq!(t.at(&[1, 0]).unwrap(), 3.0);
        assert_eq!(t.at(&[1, 2]).unwrap(), 5.0);
    }

    #[test]
    fn test_at_rejects_bad_indices() {
        let t = tensor(&[2, 3]);
        assert!(matches!(t.at(&[1]), Err(NpyError::Index(_))));
        assert!(matches!(t.at(&[2, 0]), Err(NpyError::Index(_))));
        assert!(matches!(t.at(&[0, 3]), Err(NpyError::Index(_))));
    }

    #[test]
    fn test_scalar_tensor() {
        let t = Tensor::new(TensorData::F64(vec![4.5]), vec![]).unwrap();
        assert_eq!(t.at(&[]).unwrap(), 4.5);
        assert_eq!(t.to_array().unwrap(), NestedArray::Scalar(4.5));
    }

    #[test]
    fn test_to_array_rank3() {
        let t = tensor(&[2, 2, 2]);
        assert_eq!(
            t.to_array().unwrap(),
            NestedArray::D3(vec![
                vec![vec![0.0, 1.0], vec![2.0, 3.0]],
                vec![vec![4.0, 5.0], vec![6.0, 7.0]],
            ])
        );
    }

    #[test]
    fn test_to_array_rank4_fails() {
        let t = tensor(&[1, 2, 1, 2]);
        assert!(matches!(t.to_array(), Err(NpyError::UnsupportedRank(4))));
    }

    #[test]
    fn test_to_grids_splits_planes() {
        let t = tensor(&[2, 2, 3]);
        let grids = t.to_grids().unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[1].get(0, 0), Some(6.0));
        assert_eq!(grids[1].get(1, 2), Some(11.0));
        assert!(tensor(&[4]).to_grids().is_err());
    }
}
