//! Lake conditions visualization service.
//!
//! Renders water temperature heatmaps and animated surface flow from
//! snapshots published by the lake data pipeline.

pub mod animation;
pub mod config;
pub mod scheduler;
pub mod status;
pub mod temperature;

pub use animation::{FlowAnimation, FlowLegendBox, FlowStyle};
pub use config::LakeVizConfig;
pub use scheduler::{RepeatingTask, TickControl};
pub use status::ViewState;
pub use temperature::TemperatureMap;
