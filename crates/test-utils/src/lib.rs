//! Test support shared by the lake-viz crates.
//!
//! - [`npy`]: writes `.npy` files byte for byte, so decoder tests do not
//!   depend on checked-in binaries
//! - [`generators`]: synthetic temperature grids and current fields
//! - [`fixtures`]: shoreline polygons and raster sizes
//!
//! Pull it in as a dev-dependency (`test-utils = { path = "../test-utils" }`).

pub mod fixtures;
pub mod generators;
pub mod npy;

pub use fixtures::*;
pub use generators::*;
pub use npy::*;

/// Fails unless `|left - right| <= epsilon`. Operands are widened to `f64`.
///
/// ```ignore
/// assert_approx_eq!(speed, 0.5, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (l, r, eps) = ($left as f64, $right as f64, $epsilon as f64);
        let delta = (l - r).abs();
        if delta.is_nan() || delta > eps {
            panic!(
                "assertion failed: {} ≈ {}\n  left:  {:?}\n  right: {:?}\n  delta {:?} exceeds {:?}",
                stringify!($left),
                stringify!($right),
                l,
                r,
                delta,
                eps
            );
        }
    }};
}

/// Asserts that one RGBA pixel of a row-major byte buffer matches.
///
/// ```ignore
/// assert_pixel_eq!(buffer, width, (x, y), [255, 0, 0, 255]);
/// ```
#[macro_export]
macro_rules! assert_pixel_eq {
    ($buf:expr, $width:expr, ($x:expr, $y:expr), $rgba:expr) => {{
        let idx = (($y as usize) * ($width as usize) + ($x as usize)) * 4;
        let actual: [u8; 4] = [$buf[idx], $buf[idx + 1], $buf[idx + 2], $buf[idx + 3]];
        let expected: [u8; 4] = $rgba;
        if actual != expected {
            panic!(
                "pixel ({}, {}) mismatch\n  actual: `{:?}`,\n expected: `{:?}`",
                $x, $y, actual, expected
            );
        }
    }};
}
