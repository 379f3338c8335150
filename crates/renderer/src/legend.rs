//! Legend rendering: colour bars, tick values and wet-cell swatches.

use crate::{ColorScale, PixelBuffer, ValueScale};
use flow_field::VectorField;
use lake_common::dataset::round_to;

/// Swatch colour for wet cells when no palette is given.
pub const WET_CELL_GREY: [u8; 4] = [50, 50, 50, 255];

/// Vertical colour bar: the top row is the end of the palette, the bottom
/// row its start. Row `j` uses percent `(h - 1 - j) / (h - 1)`.
pub fn render_legend_bar(width: u32, height: u32, palette: &ColorScale) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height);
    let denom = height.saturating_sub(1).max(1) as f64;
    for j in 0..height {
        let percent = (height - 1 - j) as f64 / denom;
        let rgba = palette.color(percent).rgba();
        for i in 0..width {
            buffer.set_pixel(i, j, rgba);
        }
    }
    buffer
}

/// One labelled position along a legend bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendTick {
    /// 0 at the bottom of the bar, 1 at the top
    pub percent: f64,
    pub value: f64,
}

/// `count` evenly spaced ticks from `min` to `max`, values rounded to
/// `decimals` places.
pub fn legend_ticks(min: f64, max: f64, count: usize, decimals: u32) -> Vec<LegendTick> {
    let scale = ValueScale::linear(min, max);
    let denom = count.saturating_sub(1).max(1) as f64;
    (0..count)
        .map(|i| {
            let percent = i as f64 / denom;
            LegendTick {
                percent,
                value: round_to(scale.value_at(percent), decimals),
            }
        })
        .collect()
}

/// Fill each wet cell of `field` as a `dx x dy` rectangle at
/// `offset + (col * dx, row * dy)`.
///
/// With a palette the cell is coloured by its current speed, otherwise it
/// is filled with [`WET_CELL_GREY`].
pub fn paint_wet_cells(
    buffer: &mut PixelBuffer,
    field: &VectorField,
    offset: (f64, f64),
    palette: Option<(&ValueScale, &ColorScale)>,
) {
    let speeds = field.speed_grid();
    let (dx, dy) = (field.dx(), field.dy());
    for &(row, col) in field.wet_cells() {
        let rgba = match palette {
            Some((scale, colors)) => {
                let speed = speeds.get(row, col).unwrap_or(0.0);
                colors.color(scale.normalize(speed)).rgba()
            }
            None => WET_CELL_GREY,
        };
        buffer.fill_rect(
            offset.0 + col as f64 * dx,
            offset.1 + row as f64 * dy,
            dx,
            dy,
            rgba,
        );
    }
}
