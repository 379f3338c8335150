//! Regular-grid vector fields.

use crate::{FlowError, FlowResult};
use lake_common::{bilinear, Grid};
use rand::Rng;
use tracing::debug;

/// Two equal-shaped component grids with a fixed cell size in raster units.
///
/// A cell is *wet* when both components are finite there. The wet cell list
/// is computed once at construction; the field is immutable afterwards.
#[derive(Debug, Clone)]
pub struct VectorField {
    u: Grid,
    v: Grid,
    dx: f64,
    dy: f64,
    /// `(row, col)` of every wet cell, row-major
    wet_cells: Vec<(usize, usize)>,
}

impl VectorField {
    /// Build a field from `u`/`v` grids with `dx x dy` raster units per cell.
    pub fn new(u: Grid, v: Grid, dx: f64, dy: f64) -> FlowResult<Self> {
        if u.shape() != v.shape() {
            return Err(FlowError::ShapeMismatch {
                u_rows: u.rows(),
                u_cols: u.cols(),
                v_rows: v.rows(),
                v_cols: v.cols(),
            });
        }
        if u.is_empty() {
            return Err(FlowError::EmptyGrid);
        }
        if !(dx.is_finite() && dy.is_finite() && dx > 0.0 && dy > 0.0) {
            return Err(FlowError::InvalidCellSize { dx, dy });
        }

        let mut wet_cells = Vec::new();
        for row in 0..u.rows() {
            for col in 0..u.cols() {
                let (r, c) = (row as isize, col as isize);
                if u.finite(r, c).is_some() && v.finite(r, c).is_some() {
                    wet_cells.push((row, col));
                }
            }
        }

        debug!(
            rows = u.rows(),
            cols = u.cols(),
            wet = wet_cells.len(),
            "Built vector field"
        );

        Ok(Self {
            u,
            v,
            dx,
            dy,
            wet_cells,
        })
    }

    /// Square cells: `dy = dx`.
    pub fn with_square_cells(u: Grid, v: Grid, dx: f64) -> FlowResult<Self> {
        Self::new(u, v, dx, dx)
    }

    pub fn u(&self) -> &Grid {
        &self.u
    }

    pub fn v(&self) -> &Grid {
        &self.v
    }

    pub fn n_rows(&self) -> usize {
        self.u.rows()
    }

    pub fn n_cols(&self) -> usize {
        self.u.cols()
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn wet_cells(&self) -> &[(usize, usize)] {
        &self.wet_cells
    }

    /// Raster extent covered by the field: `(cols * dx, rows * dy)`.
    pub fn extent(&self) -> (f64, f64) {
        (self.n_cols() as f64 * self.dx, self.n_rows() as f64 * self.dy)
    }

    /// Uniformly random wet cell with uniform jitter inside it, in raster
    /// coordinates. `None` when the field has no wet cells.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(f64, f64)> {
        if self.wet_cells.is_empty() {
            return None;
        }
        let (row, col) = self.wet_cells[rng.gen_range(0..self.wet_cells.len())];
        let x = self.dx * (col as f64 + rng.gen::<f64>());
        let y = self.dy * (row as f64 + rng.gen::<f64>());
        Some((x, y))
    }

    /// Whether the raster point falls outside the grid or on a dry cell.
    pub fn out_of_bounds(&self, x: f64, y: f64) -> bool {
        let col = (x / self.dx).floor();
        let row = (y / self.dy).floor();
        if !(col.is_finite() && row.is_finite()) {
            return true;
        }
        let (r, c) = (row as isize, col as isize);
        self.u.finite(r, c).is_none() || self.v.finite(r, c).is_none()
    }

    /// Bilinearly interpolated `(u, v)` at a raster point.
    ///
    /// The point is converted to fractional cell coordinates
    /// `(x / dx, y / dy)` before interpolation.
    pub fn get_flow(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = x / self.dx;
        let fy = y / self.dy;
        (bilinear(&self.u, fx, fy, 0.0), bilinear(&self.v, fx, fy, 0.0))
    }

    /// Current speed per cell, NaN on dry cells.
    pub fn speed_grid(&self) -> Grid {
        let values = self
            .u
            .values()
            .iter()
            .zip(self.v.values())
            .map(|(&u, &v)| {
                if u.is_finite() && v.is_finite() {
                    u.hypot(v)
                } else {
                    f64::NAN
                }
            })
            .collect();
        Grid::new(self.n_rows(), self.n_cols(), values)
            .unwrap_or_else(|_| Grid::filled(self.n_rows(), self.n_cols(), f64::NAN))
    }
}
