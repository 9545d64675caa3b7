//! The transform scene and the capability interface it renders through.

use std::time::Duration;

use cgmath::Vector2;

use crate::error::RenderError;
use crate::geometry::Color;
use crate::request::{TransformMatrix, VectorList};

/// How long the final frame is held after the transform finishes.
pub const HOLD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub show_coordinates: bool,
    pub show_basis_vectors: bool,
    pub show_background_plane: bool,
    /// Keep faded copies of the vectors at their starting positions.
    pub leave_ghost_vectors: bool,
    pub vector_color: Color,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            show_coordinates: true,
            show_basis_vectors: false,
            show_background_plane: true,
            leave_ghost_vectors: false,
            vector_color: Color::WHITE,
        }
    }
}

/// A vector as the engine draws it: always anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawableVector {
    pub coords: Vector2<f32>,
    pub color: Color,
}

impl DrawableVector {
    pub fn new(coords: Vector2<f32>, color: Color) -> Self {
        Self { coords, color }
    }
}

/// What a scene needs from a rendering engine.
///
/// Calls arrive in order: `configure`, any number of `register_vector`,
/// `apply_transform` and `hold`, then a single blocking `finish`.
pub trait SceneBackend {
    fn configure(&mut self, options: &SceneOptions);
    fn register_vector(&mut self, vector: DrawableVector);
    fn apply_transform(&mut self, matrix: &TransformMatrix);
    fn hold(&mut self, duration: Duration);
    fn finish(&mut self) -> Result<(), RenderError>;
}

/// Shows one linear transform acting on a set of vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformScene {
    matrix: TransformMatrix,
    vectors: Vec<DrawableVector>,
    options: SceneOptions,
}

impl TransformScene {
    pub const NAME: &'static str = "TransformScene";

    pub fn new(matrix: TransformMatrix, vectors: &VectorList, options: SceneOptions) -> Self {
        let vectors = vectors
            .iter()
            .map(|coords| DrawableVector::new(coords, options.vector_color))
            .collect();
        Self {
            matrix,
            vectors,
            options,
        }
    }

    pub fn matrix(&self) -> &TransformMatrix {
        &self.matrix
    }

    pub fn vectors(&self) -> &[DrawableVector] {
        &self.vectors
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn construct(&self, backend: &mut impl SceneBackend) {
        backend.configure(&self.options);
        for vector in &self.vectors {
            backend.register_vector(*vector);
        }
        backend.apply_transform(&self.matrix);
        backend.hold(HOLD);
    }

    /// Blocks until the backend has produced its output.
    pub fn render(&self, backend: &mut impl SceneBackend) -> Result<(), RenderError> {
        log::info!(
            "rendering {} with {} vector(s), det = {}",
            Self::NAME,
            self.vectors.len(),
            self.matrix.determinant()
        );
        self.construct(backend);
        backend.finish()
    }
}
