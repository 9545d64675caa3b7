use cgmath::{InnerSpace, Matrix2, SquareMatrix, Vector2};

use super::{Color, Mesh};

pub const VECTOR_STROKE: f32 = 0.06;
pub const TIP_LENGTH: f32 = 0.35;
const MAX_TIP_TO_LENGTH_RATIO: f32 = 0.25;

impl Mesh {
    /// Arrow from `tail` to `tip`. The head is built at the final tip, so a
    /// transformed vector keeps its proportions instead of being sheared.
    pub fn arrow(&mut self, tail: Vector2<f32>, tip: Vector2<f32>, color: Color) -> &mut Self {
        let delta = tip - tail;
        let length = delta.magnitude();
        if length <= f32::EPSILON {
            return self;
        }
        let dir = delta / length;
        let normal = Vector2::new(-dir.y, dir.x);
        let tip_length = TIP_LENGTH.min(MAX_TIP_TO_LENGTH_RATIO * length);
        let base = tip - dir * tip_length;
        let half_width = tip_length * 0.5;

        self.line(tail, base, VECTOR_STROKE, color);
        self.polygon(
            &[base + normal * half_width, tip, base - normal * half_width],
            color,
        )
    }
}

/// Coordinate grid with integer spacing, centred on the origin.
#[derive(Debug, Clone, Copy)]
pub struct NumberPlane {
    pub x_extent: f32,
    pub y_extent: f32,
    pub line_color: Color,
    pub axis_color: Color,
    pub line_width: f32,
    pub axis_width: f32,
}

impl NumberPlane {
    /// The plane that moves with the transform. It reaches well past the frame
    /// so that shrinking transforms still cover the screen.
    pub fn foreground() -> Self {
        Self {
            x_extent: 16.0,
            y_extent: 16.0,
            line_color: Color::BLUE_D,
            axis_color: Color::WHITE,
            line_width: 0.02,
            axis_width: 0.03,
        }
    }

    pub fn background() -> Self {
        Self {
            x_extent: 8.0,
            y_extent: 5.0,
            line_color: Color::GREY.with_alpha(0.5),
            axis_color: Color::GREY,
            line_width: 0.015,
            axis_width: 0.02,
        }
    }

    pub fn mesh(&self) -> Mesh {
        self.transformed(Matrix2::identity())
    }

    /// Lines are mapped endpoint by endpoint, then stroked at constant width.
    pub fn transformed(&self, matrix: Matrix2<f32>) -> Mesh {
        let mut mesh = Mesh::new();
        let (xs, ys) = (self.x_extent.floor() as i32, self.y_extent.floor() as i32);

        let mut axes = Vec::with_capacity(2);
        for x in -xs..=xs {
            let a = matrix * Vector2::new(x as f32, -self.y_extent);
            let b = matrix * Vector2::new(x as f32, self.y_extent);
            if x == 0 {
                axes.push((a, b));
            } else {
                mesh.line(a, b, self.line_width, self.line_color);
            }
        }
        for y in -ys..=ys {
            let a = matrix * Vector2::new(-self.x_extent, y as f32);
            let b = matrix * Vector2::new(self.x_extent, y as f32);
            if y == 0 {
                axes.push((a, b));
            } else {
                mesh.line(a, b, self.line_width, self.line_color);
            }
        }
        for (a, b) in axes {
            mesh.line(a, b, self.axis_width, self.axis_color);
        }
        mesh
    }
}

/// Integer tick marks along both axes, standing in for coordinate labels.
pub fn axis_ticks(x_extent: f32, y_extent: f32, color: Color) -> Mesh {
    const HALF: f32 = 0.1;
    const WIDTH: f32 = 0.02;

    let mut mesh = Mesh::new();
    for x in (-(x_extent.floor() as i32)..=x_extent.floor() as i32).filter(|&x| x != 0) {
        let x = x as f32;
        mesh.line(Vector2::new(x, -HALF), Vector2::new(x, HALF), WIDTH, color);
    }
    for y in (-(y_extent.floor() as i32)..=y_extent.floor() as i32).filter(|&y| y != 0) {
        let y = y as f32;
        mesh.line(Vector2::new(-HALF, y), Vector2::new(HALF, y), WIDTH, color);
    }
    mesh
}
