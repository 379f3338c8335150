//! Bilinear interpolation with corner fallback.

use crate::Grid;

/// Bilinear interpolation at fractional grid coordinates `(x, y)`, where `x`
/// runs along columns and `y` along rows.
///
/// Corners that are outside the grid or non-finite are substituted: `f10`,
/// `f01` and `f11` fall back to `f00`, and `f00` falls back to `default`.
/// At integer coordinates the result is the grid value itself.
pub fn bilinear(grid: &Grid, x: f64, y: f64, default: f64) -> f64 {
    let i = x.floor();
    let j = y.floor();
    let (col, row) = (i as isize, j as isize);

    let f00 = grid.finite(row, col).unwrap_or(default);
    let f10 = grid.finite(row, col + 1).unwrap_or(f00);
    let f01 = grid.finite(row + 1, col).unwrap_or(f00);
    let f11 = grid.finite(row + 1, col + 1).unwrap_or(f00);

    let dx = x - i;
    let dy = y - j;
    f00 + (f10 - f00) * dx + (f01 - f00) * dy + (f11 - f10 - f01 + f00) * dx * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::from_rows(vec![vec![10.0, 20.0], vec![30.0, 40.0]]).unwrap()
    }

    #[test]
    fn test_exact_at_integer_coordinates() {
        let g = grid();
        assert_eq!(bilinear(&g, 0.0, 0.0, 0.0), 10.0);
        assert_eq!(bilinear(&g, 1.0, 0.0, 0.0), 20.0);
        assert_eq!(bilinear(&g, 0.0, 1.0, 0.0), 30.0);
        assert_eq!(bilinear(&g, 1.0, 1.0, 0.0), 40.0);
    }

    #[test]
    fn test_center_blend() {
        assert_eq!(bilinear(&grid(), 0.5, 0.5, 0.0), 25.0);
    }

    #[test]
    fn test_missing_corners_fall_back_to_f00() {
        let g = Grid::from_rows(vec![vec![10.0, f64::NAN], vec![f64::NAN, f64::NAN]]).unwrap();
        assert_eq!(bilinear(&g, 0.5, 0.5, 0.0), 10.0);
    }

    #[test]
    fn test_missing_f00_uses_default() {
        let g = Grid::from_rows(vec![vec![f64::NAN, 4.0]]).unwrap();
        // f00 = 7 (default), f10 = 4, f01/f11 out of grid -> f00
        assert_eq!(bilinear(&g, 0.5, 0.0, 7.0), 5.5);
        // fully outside the grid
        assert_eq!(bilinear(&g, -3.0, -3.0, 0.0), 0.0);
    }
}
