use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::animations::easing::RateFunc;
use crate::config::{parse_resolution, OutputFormat, Quality, RenderConfig};
use crate::error::ConfigError;

/// Animate the effect of a 2×2 linear transform on a set of vectors.
///
/// Example: eigenvis "[[2, 0], [0, 1]]" "[[1, 0], [0, 1], [0.7, 0.7]]"
#[derive(Debug, Parser)]
#[command(name = "eigenvis", version)]
pub struct Cli {
    /// Transform matrix as a nested list, e.g. "[[2, 0], [0, 1]]"
    #[arg(value_name = "TRANSFORM_MATRIX")]
    pub transform_matrix: String,

    /// Vectors as a list of pairs, e.g. "[[1, 0], [0, 1]]"
    #[arg(value_name = "VECTORS")]
    pub vectors: String,

    /// Resolution and frame-rate preset
    #[arg(short, long, value_enum)]
    pub quality: Option<Quality>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory the animation is written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub fps: Option<u32>,

    /// Frame size as WIDTHxHEIGHT
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub resolution: Option<String>,

    /// Easing applied to the transform
    #[arg(long, value_enum)]
    pub rate_func: Option<RateFunc>,

    /// Seconds taken by the transform animation
    #[arg(long)]
    pub run_time: Option<f32>,

    /// Leave faded copies of the vectors at their starting positions
    #[arg(long)]
    pub ghost_vectors: bool,

    /// Play the animation in a window instead of writing files
    #[arg(short, long)]
    pub preview: bool,

    /// Config file, defaults to ./eigenvis.toml when present
    #[arg(short, long, env = "EIGENVIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Loads the layered config and applies flags on top.
    pub fn render_config(&self) -> Result<RenderConfig, ConfigError> {
        let config = match &self.config {
            Some(path) => RenderConfig::load_from(path)?,
            None => RenderConfig::load()?,
        };
        self.apply(config)
    }

    pub fn apply(&self, mut config: RenderConfig) -> Result<RenderConfig, ConfigError> {
        if let Some(resolution) = &self.resolution {
            (config.width, config.height) = parse_resolution(resolution)?;
            config.quality = None;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
            config.quality = None;
        }
        if self.quality.is_some() {
            config.quality = self.quality;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(rate_func) = self.rate_func {
            config.rate_func = rate_func;
        }
        if let Some(run_time) = self.run_time {
            config.transform_run_time = run_time;
        }
        if self.ghost_vectors {
            config.leave_ghost_vectors = true;
        }
        config.validated()
    }
}
