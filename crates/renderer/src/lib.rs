//! Raster rendering for lake condition maps.
//!
//! - [`gradient`]: colour scales and value normalization
//! - [`mask`]: shoreline polygon and interior pixels
//! - [`heatmap`]: masked nearest-neighbour heatmaps with an LRU image cache
//! - [`trails`]: particle trail strokes
//! - [`legend`]: colour bars, ticks and wet-cell swatches
//! - [`png`]: PNG encoding

pub mod buffer;
pub mod error;
pub mod gradient;
pub mod heatmap;
pub mod legend;
pub mod mask;
pub mod png;
pub mod trails;

pub use buffer::PixelBuffer;
pub use error::{RenderError, RenderResult};
pub use gradient::{ColorScale, PaletteDefinition, Rgb, ValueScale};
pub use heatmap::{HeatmapCacheStats, HeatmapRasterizer, PaintOutcome};
pub use legend::{legend_ticks, paint_wet_cells, render_legend_bar, LegendTick};
pub use mask::{point_in_polygon, GeographyMask};
pub use trails::{draw_particles, TrailStyle};
