//! Render configuration
//!
//! Loaded from several sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `eigenvis.toml` in the working directory, or the file passed with `--config`
//! 3. Environment variables (`EIGENVIS_KEY`)
//! 4. Command-line flags

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::animations::easing::RateFunc;
use crate::error::ConfigError;
use crate::geometry::Color;
use crate::scene::SceneOptions;

pub const DEFAULT_CONFIG_FILE: &str = "eigenvis.toml";
pub const ENV_PREFIX: &str = "EIGENVIS_";

/// Resolution and frame-rate presets, named after manim's quality flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    Medium,
    High,
    Production,
}

impl Quality {
    /// `(width, height, fps)`
    pub fn preset(self) -> (u32, u32, u32) {
        match self {
            Quality::Low => (854, 480, 15),
            Quality::Medium => (1280, 720, 30),
            Quality::High => (1920, 1080, 60),
            Quality::Production => (2560, 1440, 60),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One PNG per frame.
    #[default]
    Png,
    /// A looping animated GIF.
    Gif,
    /// Only the final frame, as a PNG.
    LastFrame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Overrides width, height and fps when set.
    pub quality: Option<Quality>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    pub background: Color,
    pub vector_color: Color,
    /// Seconds taken by the transform animation.
    pub transform_run_time: f32,
    pub rate_func: RateFunc,
    pub leave_ghost_vectors: bool,
    pub show_background_plane: bool,
    /// MSAA sample count, 1 disables anti-aliasing.
    pub samples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quality: None,
            width: 1280,
            height: 720,
            fps: 30,
            format: OutputFormat::default(),
            output_dir: PathBuf::from("media"),
            background: Color::BLACK,
            vector_color: Color::WHITE,
            transform_run_time: 1.0,
            rate_func: RateFunc::default(),
            leave_ghost_vectors: false,
            show_background_plane: true,
            samples: 4,
        }
    }
}

impl RenderConfig {
    /// Load from `eigenvis.toml` in the working directory and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract::<Self>()?
            .validated()
    }

    /// Load from a specific file. A missing file is not an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::figment(path.as_ref()).extract::<Self>()?.validated()
    }

    fn figment(path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RenderConfig::default()));
        if path.exists() {
            log::debug!("reading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        // EIGENVIS_FPS=60 -> fps = 60
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Applies the quality preset and checks value ranges.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if let Some(quality) = self.quality {
            (self.width, self.height, self.fps) = quality.preset();
        }
        for (field, value) in [
            ("width", self.width as f64),
            ("height", self.height as f64),
            ("fps", self.fps as f64),
            ("samples", self.samples as f64),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.transform_run_time < 0.0 || !self.transform_run_time.is_finite() {
            return Err(ConfigError::NotPositive {
                field: "transform_run_time",
                value: self.transform_run_time as f64,
            });
        }
        // wgpu only guarantees 1x and 4x MSAA for our target format
        if self.samples != 1 {
            self.samples = 4;
        }
        Ok(self)
    }

    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            show_background_plane: self.show_background_plane,
            leave_ghost_vectors: self.leave_ghost_vectors,
            vector_color: self.vector_color,
            ..SceneOptions::default()
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Parses `WIDTHxHEIGHT`.
pub fn parse_resolution(text: &str) -> Result<(u32, u32), ConfigError> {
    let err = || ConfigError::Resolution(text.to_owned());
    let (w, h) = text.split_once(['x', 'X']).ok_or_else(err)?;
    let w = w.trim().parse().map_err(|_| err())?;
    let h = h.trim().parse().map_err(|_| err())?;
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default().validated().unwrap();
        assert_eq!((config.width, config.height, config.fps), (1280, 720, 30));
        assert_eq!(config.output_dir, PathBuf::from("media"));
        assert_eq!(config.rate_func, RateFunc::Smooth);
    }

    #[test]
    fn test_config_serialization() {
        let toml = toml::to_string(&RenderConfig::default()).unwrap();
        assert!(toml.contains("background = \"#000000\""));
        assert!(toml.contains("rate_func = \"smooth\""));
    }

    #[test]
    fn quality_preset_wins_over_explicit_size() {
        let config = RenderConfig {
            quality: Some(Quality::Low),
            width: 10,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!((config.width, config.height, config.fps), (854, 480, 15));
    }

    #[test]
    fn zero_fps_is_rejected() {
        let err = RenderConfig {
            fps: 0,
            ..Default::default()
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "fps", .. }));
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r##"
                    fps = 24
                    format = "gif"
                    vector_color = "#FFFF00"
                "##,
            )?;
            jail.set_env("EIGENVIS_FPS", "12");

            let config = RenderConfig::load().unwrap();
            assert_eq!(config.fps, 12);
            assert_eq!(config.format, OutputFormat::Gif);
            assert_eq!(config.vector_color.to_hex(), "#FFFF00");
            assert_eq!(config.width, 1280);
            Ok(())
        });
    }

    #[test]
    fn bad_color_in_file_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", r#"background = "blue""#)?;
            assert!(RenderConfig::load_from("custom.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_| {
            let config = RenderConfig::load_from("nope.toml").unwrap();
            assert_eq!(config.fps, 30);
            Ok(())
        });
    }

    #[test]
    fn resolution_parsing() {
        assert_eq!(parse_resolution("640x360").unwrap(), (640, 360));
        assert_eq!(parse_resolution("1920X1080").unwrap(), (1920, 1080));
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("axb").is_err());
    }
}
