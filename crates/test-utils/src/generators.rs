//! Test data generators for synthetic lake snapshots.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use lake_common::Grid;

/// Creates a grid where each cell is `row * 10 + col`.
///
/// # Example
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(3, 4);
/// assert_eq!(grid.get(2, 1), Some(21.0));
/// ```
pub fn create_index_grid(rows: usize, cols: usize) -> Grid {
    let values = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r * 10 + c) as f64))
        .collect();
    Grid::new(rows, cols, values).unwrap_or_else(|_| Grid::filled(rows, cols, 0.0))
}

/// Creates a temperature grid in °C warming from the top-left (4°C) to the
/// bottom-right (20°C).
pub fn create_water_temperature_grid(rows: usize, cols: usize) -> Grid {
    let mut values = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let x_factor = col as f64 / cols.max(1) as f64;
            let y_factor = row as f64 / rows.max(1) as f64;
            values.push(4.0 + x_factor * 8.0 + y_factor * 8.0);
        }
    }
    Grid::new(rows, cols, values).unwrap_or_else(|_| Grid::filled(rows, cols, 0.0))
}

/// Marks the outer ring of cells as land (NaN), leaving a wet interior.
pub fn with_dry_border(grid: &Grid) -> Grid {
    let (rows, cols) = grid.shape();
    let values = grid
        .values()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let (r, c) = (i / cols.max(1), i % cols.max(1));
            if r == 0 || c == 0 || r + 1 == rows || c + 1 == cols {
                f64::NAN
            } else {
                v
            }
        })
        .collect();
    Grid::new(rows, cols, values).unwrap_or_else(|_| grid.clone())
}

/// Uniform `(u, v)` current over a fully wet grid.
pub fn create_uniform_flow(rows: usize, cols: usize, u: f64, v: f64) -> (Grid, Grid) {
    (Grid::filled(rows, cols, u), Grid::filled(rows, cols, v))
}

/// Circular gyre: currents rotate counter-clockwise around the grid center
/// with speed growing linearly from the center.
pub fn create_gyre_flow(rows: usize, cols: usize, strength: f64) -> (Grid, Grid) {
    let cy = rows as f64 / 2.0;
    let cx = cols as f64 / 2.0;
    let mut u = Vec::with_capacity(rows * cols);
    let mut v = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let dx = col as f64 - cx;
            let dy = row as f64 - cy;
            u.push(-dy * strength);
            v.push(dx * strength);
        }
    }
    (
        Grid::new(rows, cols, u).unwrap_or_else(|_| Grid::filled(rows, cols, 0.0)),
        Grid::new(rows, cols, v).unwrap_or_else(|_| Grid::filled(rows, cols, 0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_grid() {
        let grid = create_index_grid(2, 3);
        assert_eq!(grid.values(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_temperature_range() {
        let grid = create_water_temperature_grid(10, 10);
        let (lo, hi) = grid.finite_range().unwrap();
        assert!(lo >= 4.0);
        assert!(hi <= 20.0);
    }

    #[test]
    fn test_dry_border() {
        let grid = with_dry_border(&Grid::filled(4, 4, 1.0));
        assert!(grid.get(0, 0).unwrap().is_nan());
        assert!(grid.get(3, 2).unwrap().is_nan());
        assert_eq!(grid.get(1, 1), Some(1.0));
        assert_eq!(grid.get(2, 2), Some(1.0));
    }

    #[test]
    fn test_gyre_is_zero_at_center() {
        let (u, v) = create_gyre_flow(4, 4, 0.1);
        assert_eq!(u.get(2, 2), Some(0.0));
        assert_eq!(v.get(2, 2), Some(0.0));
    }
}
