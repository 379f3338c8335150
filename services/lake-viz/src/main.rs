//! lake-viz command-line front end.
//!
//! - `list`: show available snapshots, newest first
//! - `temperature`: render a temperature heatmap and legend bar to PNG
//! - `flow`: animate surface currents into a sequence of PNG frames

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::try_join_all;
use lake_common::{parse_date_query, DataCategory, DatasetStatus, LakeError, Snapshot, SnapshotEntry};
use lake_viz::animation::FlowStyle;
use lake_viz::config::SourceConfig;
use lake_viz::{
    FlowAnimation, FlowLegendBox, LakeVizConfig, RepeatingTask, TemperatureMap, TickControl,
    ViewState,
};
use renderer::{GeographyMask, HeatmapRasterizer, TrailStyle};
use storage::{HttpSourceConfig, SnapshotLoader, SnapshotSource};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

type Loader = SnapshotLoader<dyn SnapshotSource>;

#[derive(Parser, Debug)]
#[command(name = "lake-viz")]
#[command(about = "Render lake temperature maps and animated surface flow")]
struct Args {
    /// Configuration file (YAML); defaults are used when it is missing
    #[arg(long, env = "LAKE_VIZ_CONFIG", default_value = "config/lake-viz.yaml")]
    config: PathBuf,

    /// Read snapshots from this directory instead of the configured source
    #[arg(long, env = "LAKE_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Read snapshots from this bucket URL instead of the configured source
    #[arg(long, env = "LAKE_BASE_URL", conflicts_with = "data_root")]
    base_url: Option<String>,

    /// Output directory for rendered images
    #[arg(short, long, env = "LAKE_VIZ_OUTPUT")]
    output: Option<PathBuf>,

    /// Raster width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available snapshots, newest first
    List {
        /// temperature or flow
        category: DataCategory,
    },
    /// Render a water temperature map
    Temperature {
        /// Snapshot hour as YYYYMMDDHH; newest when omitted
        #[arg(long)]
        date: Option<String>,
    },
    /// Animate surface flow into PNG frames
    Flow {
        /// Snapshot hour as YYYYMMDDHH; newest when omitted
        #[arg(long)]
        date: Option<String>,

        /// Number of frames to render
        #[arg(long, default_value = "40")]
        frames: u64,

        /// Seed particle placement for reproducible frames
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    let config = load_config(&args)?;
    let source = config.source.build()?;
    let loader: Arc<Loader> = Arc::new(SnapshotLoader::new(source, config.load_timeout()));

    match &args.command {
        Command::List { category } => run_list(&loader, *category).await,
        Command::Temperature { date } => run_temperature(&config, &loader, date.as_deref()).await,
        Command::Flow { date, frames, seed } => {
            run_flow(&config, &loader, date.as_deref(), *frames, *seed).await
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> Result<LakeVizConfig> {
    let mut config = LakeVizConfig::load_or_default(&args.config)?;

    if let Some(root) = &args.data_root {
        config.source = SourceConfig::Local { root: root.clone() };
    }
    if let Some(base_url) = &args.base_url {
        let timeout_secs = match &config.source {
            SourceConfig::Http(http) => http.timeout_secs,
            SourceConfig::Local { .. } => HttpSourceConfig::default().timeout_secs,
        };
        config.source = SourceConfig::Http(HttpSourceConfig {
            base_url: base_url.clone(),
            timeout_secs,
        });
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(width) = args.width {
        config.raster_width = width;
    }

    config.validate()?;
    Ok(config)
}

async fn run_list(loader: &Loader, category: DataCategory) -> Result<()> {
    match loader.list(category).await {
        Ok(entries) if entries.is_empty() => {
            report(ViewState::NoFiles, category);
        }
        Ok(entries) => {
            for entry in entries {
                println!("{}  {}", entry.timestamp.format("%Y%m%d%H"), entry.path);
            }
        }
        Err(e) => {
            warn!(error = %e, "Listing failed");
            report(ViewState::FilesUnavailable, category);
        }
    }
    Ok(())
}

fn report(state: ViewState, category: DataCategory) {
    if let Some(message) = state.message(category) {
        println!("{}", message);
    }
}

/// Resolve the requested snapshot and load it, reporting progress the way
/// the map views do. `None` when there is nothing to show.
async fn fetch_snapshot(
    loader: &Loader,
    category: DataCategory,
    date: Option<&str>,
) -> Result<Option<(SnapshotEntry, Snapshot)>> {
    let at = date
        .map(parse_date_query)
        .transpose()
        .map_err(LakeError::from)
        .context("Invalid --date")?;

    report(ViewState::ListingFiles, category);
    let entry = match loader.resolve(category, at).await {
        Ok(entry) => entry,
        Err(e) => {
            warn!(error = %e, %category, "No snapshot selected");
            report(ViewState::from_listing_error(&e), category);
            return Ok(None);
        }
    };

    report(ViewState::Downloading, category);
    match loader.load(&entry.path, category).await.into_status() {
        Some(DatasetStatus::Ready(snapshot)) => Ok(Some((entry, snapshot))),
        Some(DatasetStatus::Unavailable(reason)) => {
            error!(path = %entry.path, %reason, "Snapshot failed to load");
            report(ViewState::DownloadFailed, category);
            Ok(None)
        }
        Some(DatasetStatus::Loading) | None => Ok(None),
    }
}

async fn run_temperature(config: &LakeVizConfig, loader: &Loader, date: Option<&str>) -> Result<()> {
    let Some((entry, snapshot)) = fetch_snapshot(loader, DataCategory::Temperature, date).await? else {
        return Ok(());
    };
    let Snapshot::Temperature(grid) = snapshot else {
        anyhow::bail!("{} did not decode as a temperature snapshot", entry.path);
    };

    let settings = &config.temperature;
    let map = TemperatureMap::new(
        grid,
        settings.value_scale(),
        settings.color_scale()?,
        settings.units.clone(),
        settings.decimal_places,
    );

    let mask = Arc::new(load_mask(&config.shoreline_path)?);
    let mut rasterizer = HeatmapRasterizer::with_capacity(mask, config.heatmap_capacity());
    let key = entry.timestamp.format("%Y%m%d%H").to_string();
    let image = map.render(&mut rasterizer, config.raster_width, Some(&key))?;
    let (bar, ticks) = map.legend(settings.legend_width, image.height(), settings.legend_ticks);

    tokio::fs::create_dir_all(&config.output_dir).await?;
    let map_path = config.output_dir.join(format!("temperature-{}.png", key));
    let legend_path = config.output_dir.join(format!("temperature-{}-legend.png", key));
    tokio::fs::write(&map_path, image.to_png()?).await?;
    tokio::fs::write(&legend_path, bar.to_png()?).await?;

    info!(map = %map_path.display(), legend = %legend_path.display(), "Wrote temperature map");
    let labels: Vec<String> = ticks.iter().rev().map(|t| format!("{}", t.value)).collect();
    println!("{}", map_path.display());
    println!("legend ({}): {}", settings.units, labels.join(" "));
    Ok(())
}

async fn run_flow(
    config: &LakeVizConfig,
    loader: &Loader,
    date: Option<&str>,
    frames: u64,
    seed: Option<u64>,
) -> Result<()> {
    let Some((entry, snapshot)) = fetch_snapshot(loader, DataCategory::Flow, date).await? else {
        return Ok(());
    };
    let Snapshot::Flow { u, v } = snapshot else {
        anyhow::bail!("{} did not decode as a flow snapshot", entry.path);
    };

    let settings = &config.flow;
    let style = FlowStyle {
        scale: settings.value_scale(),
        palette: settings.color_scale()?,
        particles: settings.particles.into(),
        trail: TrailStyle::default(),
        seed,
    };
    let key = entry.timestamp.format("%Y%m%d%H").to_string();
    let mask = Arc::new(load_mask(&config.shoreline_path)?);

    let mut animation = FlowAnimation::new(
        u,
        v,
        config.raster_width,
        mask,
        config.heatmap_capacity(),
        settings.particle_count,
        style.clone(),
        format!("current-map-{}", key),
    )?;

    let out_dir = config.output_dir.join(format!("flow-{}", key));
    tokio::fs::create_dir_all(&out_dir).await?;
    write_legend_boxes(config, &style, frames, &out_dir).await?;

    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Result<Vec<u8>, LakeError>)>();
    let task = RepeatingTask::spawn("flow-animation", settings.tick_interval(), move |n| {
        let png = animation
            .tick()
            .and_then(|frame| frame.to_png().map_err(LakeError::from));
        let failed = png.is_err();
        if tx.send((n, png)).is_err() || failed || n + 1 >= frames {
            TickControl::Stop
        } else {
            TickControl::Continue
        }
    });

    let token = task.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping animation");
            token.cancel();
        }
    });

    let mut written = 0u64;
    while let Some((n, png)) = rx.recv().await {
        let png = png.with_context(|| format!("Frame {} failed", n))?;
        tokio::fs::write(out_dir.join(format!("frame-{:04}.png", n)), png).await?;
        written += 1;
    }
    let ticks = task.join().await;

    info!(frames = written, ticks, dir = %out_dir.display(), "Wrote flow animation");
    println!("{}", out_dir.display());
    Ok(())
}

/// Run each legend box for `frames` ticks and save its final frame.
async fn write_legend_boxes(
    config: &LakeVizConfig,
    style: &FlowStyle,
    frames: u64,
    out_dir: &Path,
) -> Result<()> {
    let settings = &config.flow;
    let mut writes = Vec::with_capacity(settings.legend_speeds.len());

    for (i, &speed) in settings.legend_speeds.iter().enumerate() {
        let mut legend = FlowLegendBox::new(
            speed,
            settings.legend_box_width,
            settings.legend_box_aspect,
            settings.legend_particle_count,
            style.clone(),
        )?;
        for _ in 0..frames.max(1) {
            legend.tick()?;
        }
        println!("legend {}: {}", i, legend.label());
        let png = legend.frame().to_png()?;
        let path = out_dir.join(format!("legend-{}.png", i));
        writes.push(async move { tokio::fs::write(path, png).await });
    }

    try_join_all(writes).await.context("Failed to write legend boxes")?;
    Ok(())
}

fn load_mask(path: &Path) -> Result<GeographyMask> {
    GeographyMask::from_file(path)
        .with_context(|| format!("Failed to load shoreline from {}", path.display()))
}
