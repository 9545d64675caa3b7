use cgmath::{InnerSpace, Vector2};
use delaunator::{triangulate, Point};
use serde::{Deserialize, Serialize};

pub mod shapes;

pub use shapes::{axis_ticks, NumberPlane};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    // manim palette
    pub const BLUE_D: Color = Color([0.160_784, 0.670_588, 0.792_157, 1.0]);
    pub const GREEN_C: Color = Color([0.513_725, 0.756_863, 0.403_922, 1.0]);
    pub const RED_C: Color = Color([0.988_235, 0.384_314, 0.333_333, 1.0]);
    pub const GREY: Color = Color([0.533_333, 0.533_333, 0.533_333, 1.0]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.0.map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}

impl TryFrom<String> for Color {
    type Error = crate::error::ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or(crate::error::ConfigError::Color(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangle list in world units. Later pushes draw on top.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Fills a convex polygon. Degenerate polygons add nothing.
    pub fn polygon(&mut self, points: &[Vector2<f32>], color: Color) -> &mut Self {
        if points.len() < 3 {
            return self;
        }
        let hull: Vec<Point> = points
            .iter()
            .map(|p| Point {
                x: p.x as f64,
                y: p.y as f64,
            })
            .collect();
        let triangulation = triangulate(&hull);
        if triangulation.triangles.is_empty() {
            return self;
        }

        let base = self.vertices.len() as u32;
        self.vertices.extend(points.iter().map(|p| Vertex {
            position: [p.x, p.y],
            color: color.0,
        }));
        self.indices
            .extend(triangulation.triangles.iter().map(|&i| base + i as u32));
        self
    }

    /// A segment of constant width. Zero-length lines add nothing.
    pub fn line(
        &mut self,
        a: Vector2<f32>,
        b: Vector2<f32>,
        width: f32,
        color: Color,
    ) -> &mut Self {
        let dir = b - a;
        if dir.magnitude2() <= f32::EPSILON {
            return self;
        }
        let normal = Vector2::new(-dir.y, dir.x).normalize() * (width * 0.5);
        self.polygon(&[a + normal, b + normal, b - normal, a - normal], color)
    }

    pub fn extend(&mut self, other: &Mesh) -> &mut Self {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| base + i));
        self
    }
}
