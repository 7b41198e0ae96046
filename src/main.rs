mod canvas;
mod clock;
mod colors;
mod config;
mod dashboard;
mod error;
mod geo;
mod help;
mod history;
mod layout;
mod quality;
mod settings;
mod sources;
mod surface;
mod terminal;
mod visibility;
mod weather;

use clap::{Args, Parser, Subcommand};
use config::{CliOverrides, DashboardConfig};
use error::{Result, SkytraceError};
use settings::Settings;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use surface::SurfaceKind;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skytrace")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal weather, route trace and location dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct CommonArgs {
    /// Config file (default: <config dir>/skytrace/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network classification: slow-2g, 2g, 3g or 4g
    #[arg(short, long)]
    network: Option<String>,

    /// Measured downlink in Mbps
    #[arg(short, long)]
    downlink: Option<f64>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Replay a route from a JSON file instead of simulating one
    #[arg(short, long)]
    route_file: Option<PathBuf>,

    /// Device pixel ratio for supersampling (1-4)
    #[arg(long)]
    dpr: Option<u32>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive dashboard
    Run {
        #[command(flatten)]
        common: CommonArgs,

        /// Animation step delay in seconds
        #[arg(short, long)]
        time: Option<f32>,
    },

    /// Render a single surface and print it to stdout
    Frame {
        #[command(flatten)]
        common: CommonArgs,

        /// Surface to render: weather, route or map
        #[arg(short = 'S', long, default_value = "weather")]
        surface: String,

        /// Width in cells
        #[arg(short = 'W', long, default_value = "60")]
        width: u16,

        /// Height in cells
        #[arg(short = 'H', long, default_value = "18")]
        height: u16,

        /// Animation frames to advance before printing
        #[arg(short, long, default_value = "1")]
        frames: u32,
    },
}

fn init_logging(log_file: Option<&PathBuf>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The interactive dashboard owns the terminal, so logs go to a file or nowhere.
    let _ = match (log_file, interactive) {
        (Some(path), _) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        (None, true) => builder.with_writer(io::sink).try_init(),
        (None, false) => builder.with_writer(io::stderr).try_init(),
    };
    Ok(())
}

fn resolve(common: &CommonArgs, frame_interval: Option<f32>) -> Result<DashboardConfig> {
    let settings = match &common.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    let overrides = CliOverrides {
        network: common.network.clone(),
        downlink: common.downlink,
        seed: common.seed,
        route_file: common.route_file.clone(),
        device_pixel_ratio: common.dpr,
        frame_interval,
    };
    DashboardConfig::resolve(&settings, &overrides)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { common, time } => {
            init_logging(common.log_file.as_ref(), true)?;
            let config = resolve(&common, time)?;
            dashboard::run(config)?;
        }
        Commands::Frame {
            common,
            surface,
            width,
            height,
            frames,
        } => {
            init_logging(common.log_file.as_ref(), false)?;
            let kind = SurfaceKind::parse(&surface).ok_or_else(|| {
                SkytraceError::InvalidArgument(format!(
                    "unknown surface: {} (available: weather, route, map)",
                    surface
                ))
            })?;
            if width < 8 || height < 4 {
                warn!(width, height, "frame too small, nothing to draw");
                return Err(SkytraceError::InvalidArgument(format!(
                    "frame must be at least 8x4 cells, got {}x{}",
                    width, height
                )));
            }
            let config = resolve(&common, None)?;
            let output = dashboard::render_frame(config, kind, width, height, frames)?;
            print!("{}", output);
        }
    }

    Ok(())
}
