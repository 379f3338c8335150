//! Row-major scalar grids for lake snapshot data.

use crate::{LakeError, LakeResult};

/// A regular `rows x cols` grid of scalar values in row-major order.
///
/// Non-finite values (NaN) mark land / no-data cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Create a grid from flat row-major values.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> LakeResult<Self> {
        if values.len() != rows * cols {
            return Err(LakeError::Shape(format!(
                "expected {} values for a {}x{} grid, got {}",
                rows * cols,
                rows,
                cols,
                values.len()
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Create a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> LakeResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (j, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(LakeError::Shape(format!(
                    "row {} has {} columns, expected {}",
                    j,
                    row.len(),
                    n_cols
                )));
            }
            values.extend(row);
        }
        Self::new(n_rows, n_cols, values)
    }

    /// Grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Raw cell value, `None` when the index is outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }

    /// Cell value if the (possibly negative) index is inside the grid and the
    /// value is finite.
    pub fn finite(&self, row: isize, col: isize) -> Option<f64> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize).filter(|v| v.is_finite())
    }

    /// New grid with the row order reversed (row 0 becomes the last row).
    pub fn flip_vertical(&self) -> Grid {
        let mut values = Vec::with_capacity(self.values.len());
        for row in self.values.chunks(self.cols.max(1)).rev() {
            values.extend_from_slice(row);
        }
        Grid {
            rows: self.rows,
            cols: self.cols,
            values,
        }
    }

    /// New grid with `f` applied to every cell.
    pub fn map<F>(&self, f: F) -> Grid
    where
        F: Fn(f64) -> f64,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Minimum and maximum over finite cells.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Value under a pointer at `(x, y)` on a `width x height` raster showing
    /// this grid. `None` outside the raster or over no-data cells.
    pub fn value_at_pixel(&self, x: f64, y: f64, width: f64, height: f64) -> Option<f64> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let col = (x / width * self.cols as f64).floor();
        let row = (y / height * self.rows as f64).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        self.get(row as usize, col as usize).filter(|v| !v.is_nan())
    }
}
