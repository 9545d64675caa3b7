//! Animate what a 2×2 linear transform does to a set of vectors.
//!
//! The inputs are validated into a [`TransformScene`], which is then played
//! through a [`SceneBackend`]: [`Movie`] renders offscreen with wgpu and writes
//! PNG frames, a GIF or a single image; [`Preview`] plays it in a window;
//! [`Timeline`] only records what was asked for.

pub mod animations;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod request;
pub mod scene;

pub use animations::Timeline;
pub use cli::Cli;
pub use config::RenderConfig;
pub use error::{Error, Result, ShapeError};
pub use renderer::{Movie, Preview};
pub use request::{TransformMatrix, VectorList};
pub use scene::{DrawableVector, SceneBackend, SceneOptions, TransformScene};

/// Validates the inputs and renders them through `backend` with default options.
///
/// Nothing reaches the backend unless both the matrix and every vector are
/// two-dimensional.
pub fn make_animation<B: SceneBackend>(
    transform_matrix: Vec<Vec<f64>>,
    vectors: Vec<Vec<f64>>,
    backend: &mut B,
) -> Result<()> {
    make_animation_with(
        transform_matrix,
        vectors,
        SceneOptions::default(),
        backend,
    )
}

pub fn make_animation_with<B: SceneBackend>(
    transform_matrix: Vec<Vec<f64>>,
    vectors: Vec<Vec<f64>>,
    options: SceneOptions,
    backend: &mut B,
) -> Result<()> {
    let matrix = TransformMatrix::from_rows(transform_matrix)?;
    let vectors = VectorList::from_rows(vectors)?;

    let scene = TransformScene::new(matrix, &vectors, options);
    scene.render(backend)?;
    Ok(())
}

/// Runs the command line: parse, load config, render.
pub fn run(cli: &Cli) -> Result<()> {
    let matrix = request::parse_matrix(&cli.transform_matrix)?;
    let vectors = request::parse_vectors(&cli.vectors)?;
    let config = cli.render_config()?;
    log::debug!("{config:?}");

    let options = config.scene_options();
    if cli.preview {
        make_animation_with(matrix, vectors, options, &mut Preview::new(config))
    } else {
        make_animation_with(matrix, vectors, options, &mut Movie::new(config))
    }
}
