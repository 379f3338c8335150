//! Service configuration.
//!
//! Loaded from a YAML file (every field has a default), then selectively
//! overridden from the command line.

use anyhow::{Context, Result};
use flow_field::ParticleConfig;
use renderer::{ColorScale, PaletteDefinition, ValueScale};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use storage::{HttpSnapshotSource, HttpSourceConfig, LocalSnapshotSource, SnapshotSource};
use tracing::{debug, info};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeVizConfig {
    pub source: SourceConfig,
    /// JSON file with the shoreline polygon as `[[x, y], ...]`
    pub shoreline_path: PathBuf,
    /// Width of rendered maps in pixels; height follows the grid aspect
    pub raster_width: u32,
    /// Heatmap images kept in memory; unbounded when unset
    pub heatmap_cache_capacity: Option<usize>,
    /// Whole-load timeout for one snapshot
    pub load_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub temperature: TemperatureConfig,
    pub flow: FlowConfig,
}

impl Default for LakeVizConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            shoreline_path: PathBuf::from("config/shoreline.json"),
            raster_width: 600,
            heatmap_cache_capacity: Some(32),
            load_timeout_secs: 60,
            output_dir: PathBuf::from("output"),
            temperature: TemperatureConfig::default(),
            flow: FlowConfig::default(),
        }
    }
}

/// Where snapshots are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// `<root>/<category>/*.npy`
    Local { root: PathBuf },
    /// S3-style bucket
    Http(HttpSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http(HttpSourceConfig::default())
    }
}

impl SourceConfig {
    /// Construct the configured source.
    pub fn build(&self) -> Result<Arc<dyn SnapshotSource>> {
        let source: Arc<dyn SnapshotSource> = match self {
            SourceConfig::Local { root } => Arc::new(LocalSnapshotSource::new(root.clone())),
            SourceConfig::Http(http) => Arc::new(
                HttpSnapshotSource::new(http).context("Failed to create HTTP snapshot source")?,
            ),
        };
        info!(source = %source.describe(), "Snapshot source ready");
        Ok(source)
    }
}

/// Temperature heatmap settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Built-in palette name, used when `palette` is unset
    pub palette_name: String,
    pub palette: Option<PaletteDefinition>,
    pub min: f64,
    pub max: f64,
    pub units: String,
    pub legend_ticks: usize,
    pub decimal_places: u32,
    pub legend_width: u32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            palette_name: "ice_to_fire".to_string(),
            palette: None,
            min: 40.0,
            max: 70.0,
            units: "° F".to_string(),
            legend_ticks: 16,
            decimal_places: 0,
            legend_width: 24,
        }
    }
}

impl TemperatureConfig {
    pub fn value_scale(&self) -> ValueScale {
        ValueScale::linear(self.min, self.max)
    }

    pub fn color_scale(&self) -> Result<ColorScale> {
        resolve_palette(self.palette.as_ref(), &self.palette_name)
    }
}

/// Flow animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub palette_name: String,
    pub palette: Option<PaletteDefinition>,
    /// Speed domain in m/s
    pub min_speed: f64,
    pub max_speed: f64,
    pub particle_count: usize,
    pub particles: ParticleSettings,
    pub tick_interval_ms: u64,
    /// Speeds (m/s) shown as legend boxes
    pub legend_speeds: Vec<f64>,
    pub legend_particle_count: usize,
    pub legend_box_width: f64,
    /// Legend box height as a fraction of its width
    pub legend_box_aspect: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            palette_name: "dark_ocean".to_string(),
            palette: None,
            min_speed: 0.0,
            max_speed: 0.5,
            particle_count: 3500,
            particles: ParticleSettings::default(),
            tick_interval_ms: 50,
            legend_speeds: vec![0.1016, 0.2032, 0.3048, 0.508],
            legend_particle_count: 60,
            legend_box_width: 68.0 * 1.5,
            legend_box_aspect: 0.35,
        }
    }
}

impl FlowConfig {
    pub fn value_scale(&self) -> ValueScale {
        ValueScale::linear(self.min_speed, self.max_speed)
    }

    pub fn color_scale(&self) -> Result<ColorScale> {
        resolve_palette(self.palette.as_ref(), &self.palette_name)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// Particle constants as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub max_age: u32,
    pub max_history: usize,
    pub speed_scale: f64,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        let defaults = ParticleConfig::default();
        Self {
            max_age: defaults.max_age,
            max_history: defaults.max_history,
            speed_scale: defaults.speed_scale,
        }
    }
}

impl From<ParticleSettings> for ParticleConfig {
    fn from(settings: ParticleSettings) -> Self {
        ParticleConfig {
            max_age: settings.max_age,
            max_history: settings.max_history,
            speed_scale: settings.speed_scale,
        }
    }
}

fn resolve_palette(palette: Option<&PaletteDefinition>, name: &str) -> Result<ColorScale> {
    match palette {
        Some(def) => def
            .to_scale()
            .with_context(|| format!("Invalid palette definition {:?}", def.colors)),
        None => ColorScale::builtin(name).with_context(|| format!("Unknown palette '{}'", name)),
    }
}

impl LakeVizConfig {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.raster_width > 0, "raster_width must be positive");
        anyhow::ensure!(
            self.temperature.max > self.temperature.min,
            "temperature max must exceed min"
        );
        anyhow::ensure!(self.flow.max_speed > self.flow.min_speed, "flow max_speed must exceed min_speed");
        anyhow::ensure!(self.flow.legend_box_width > 0.0, "legend_box_width must be positive");
        self.temperature.color_scale()?;
        self.flow.color_scale()?;
        Ok(())
    }

    pub fn heatmap_capacity(&self) -> Option<NonZeroUsize> {
        self.heatmap_cache_capacity.and_then(NonZeroUsize::new)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}
