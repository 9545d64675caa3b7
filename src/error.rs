//! Error taxonomy.
//!
//! Shape and parse errors are detected before any rendering work begins.
//! Render errors come from the wgpu/image backend and are passed through
//! with their source attached.

use std::path::PathBuf;

use thiserror::Error;

/// The input matrix or one of the input vectors has the wrong dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("transform matrix has {found} rows, expected {expected}")]
    RowCount { found: usize, expected: usize },

    #[error("row {row} of the transform matrix has {found} columns, expected {expected}")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("vector {index} has {found} components, expected {expected}")]
    VectorLength {
        index: usize,
        found: usize,
        expected: usize,
    },
}

impl ShapeError {
    /// The dimension that was actually supplied.
    pub fn found(&self) -> usize {
        match self {
            ShapeError::RowCount { found, .. }
            | ShapeError::RowLength { found, .. }
            | ShapeError::VectorLength { found, .. } => *found,
        }
    }

    pub fn expected(&self) -> usize {
        match self {
            ShapeError::RowCount { expected, .. }
            | ShapeError::RowLength { expected, .. }
            | ShapeError::VectorLength { expected, .. } => *expected,
        }
    }
}

/// Command-line text that is not a nested list of numbers.
#[derive(Debug, Error)]
#[error("could not parse {what} from {input:?}: {source}")]
pub struct ParseError {
    pub what: &'static str,
    pub input: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid resolution {0:?}, expected WIDTHxHEIGHT")]
    Resolution(String),

    #[error("invalid color {0:?}, expected #RRGGBB")]
    Color(String),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("unable to open a GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to map the readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("readback channel closed before the buffer was mapped")]
    BufferMapCanceled,

    #[error("frame size {width}x{height} exceeds the device limit of {max} pixels per side")]
    FrameTooLarge { width: u32, height: u32, max: u32 },

    #[error("frame {0} produced a truncated image")]
    Frame(usize),

    #[error("failed to create preview window: {0}")]
    Window(String),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error returned by [`crate::make_animation`] and [`crate::run`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
