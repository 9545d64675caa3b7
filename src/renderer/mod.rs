/// Forwards the recording calls to `self.timeline`, then calls
/// `self.present()` once the timeline is finished.
macro_rules! impl_timeline_backend {
    ($type:ty) => {
        impl $crate::scene::SceneBackend for $type {
            fn configure(&mut self, options: &$crate::scene::SceneOptions) {
                $crate::scene::SceneBackend::configure(&mut self.timeline, options);
            }

            fn register_vector(&mut self, vector: $crate::scene::DrawableVector) {
                $crate::scene::SceneBackend::register_vector(&mut self.timeline, vector);
            }

            fn apply_transform(&mut self, matrix: &$crate::request::TransformMatrix) {
                $crate::scene::SceneBackend::apply_transform(&mut self.timeline, matrix);
            }

            fn hold(&mut self, duration: std::time::Duration) {
                $crate::scene::SceneBackend::hold(&mut self.timeline, duration);
            }

            fn finish(&mut self) -> Result<(), $crate::error::RenderError> {
                $crate::scene::SceneBackend::finish(&mut self.timeline)?;
                self.present()
            }
        }
    };
}

mod bindgroup;
mod camera;
mod context;
mod movie;
pub mod output;
mod pipeline;
mod window;

use cgmath::{Matrix2, SquareMatrix, Vector2};
use wgpu::util::DeviceExt;

pub use bindgroup::{Attach, BindGroupBuilder};
pub use camera::{Camera, FRAME_HEIGHT};
pub use context::{AnyContext, Context, SurfaceContext};
pub use movie::Movie;
pub use pipeline::PipelineBuilder;
pub use window::{App, Preview, Window};

use crate::animations::{FrameState, Timeline};
use crate::geometry::{axis_ticks, Color, Mesh, NumberPlane, Vertex};

/// Format of the offscreen target; colors are written as authored.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const GHOST_ALPHA: f32 = 0.35;

/// Builds the geometry for one frame, back to front.
pub fn frame_mesh(timeline: &Timeline, frame: &FrameState, frame_width: f32) -> Mesh {
    let options = timeline.options();
    let matrix = frame.matrix;
    let origin = Vector2::new(0.0, 0.0);
    let mut mesh = Mesh::new();

    if options.show_background_plane {
        let plane = NumberPlane {
            x_extent: (frame_width / 2.0).ceil(),
            y_extent: (FRAME_HEIGHT / 2.0).ceil(),
            ..NumberPlane::background()
        };
        mesh.extend(&plane.mesh());
    }
    if options.show_coordinates {
        mesh.extend(&axis_ticks(
            frame_width / 2.0,
            FRAME_HEIGHT / 2.0,
            Color::WHITE,
        ));
    }
    mesh.extend(&NumberPlane::foreground().transformed(matrix));

    if options.leave_ghost_vectors && matrix != Matrix2::identity() {
        for vector in timeline.vectors() {
            mesh.arrow(origin, vector.coords, vector.color.with_alpha(GHOST_ALPHA));
        }
    }
    if options.show_basis_vectors {
        mesh.arrow(origin, matrix * Vector2::new(1.0, 0.0), Color::GREEN_C);
        mesh.arrow(origin, matrix * Vector2::new(0.0, 1.0), Color::RED_C);
    }
    for vector in timeline.vectors() {
        mesh.arrow(origin, matrix * vector.coords, vector.color);
    }
    mesh
}

/// Where a frame is drawn: the attachment, and the resolve target when multisampling.
pub struct Target<'a> {
    pub view: &'a wgpu::TextureView,
    pub resolve: Option<&'a wgpu::TextureView>,
}

pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    pub camera: Camera,
    sample_count: u32,
}

impl Renderer {
    pub fn new(
        ctx: &impl AnyContext,
        format: wgpu::TextureFormat,
        sample_count: u32,
        aspect: f32,
    ) -> Self {
        let shader = ctx
            .device()
            .create_shader_module(wgpu::include_wgsl!("../shader.wgsl"));
        let camera = Camera::new(ctx, aspect);

        let pipeline = PipelineBuilder::for_render("Vector Pipeline", &shader)
            .vertex(Vertex::layout())
            .fragment(
                "fs_main",
                &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            )
            .multisample(sample_count)
            .add_bind_group_layout(&camera.bind_group_layout)
            .build(ctx);

        Self {
            pipeline,
            camera,
            sample_count,
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Multisampled attachment matching the pipeline, if one is needed.
    pub fn create_msaa_texture(
        &self,
        ctx: &impl AnyContext,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Option<wgpu::TextureView> {
        if self.sample_count <= 1 {
            return None;
        }
        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("MSAA Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: self.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    /// Records a full clear-and-draw pass into `encoder`.
    pub fn encode(
        &self,
        ctx: &impl AnyContext,
        encoder: &mut wgpu::CommandEncoder,
        target: Target<'_>,
        mesh: &Mesh,
        background: Color,
    ) {
        let buffers = (!mesh.is_empty()).then(|| {
            let vertex_buffer =
                ctx.device()
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Vertex Buffer"),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
            let index_buffer =
                ctx.device()
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Index Buffer"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    });
            (vertex_buffer, index_buffer)
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view,
                resolve_target: target.resolve,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some((vertex_buffer, index_buffer)) = &buffers {
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera.bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.indices.len() as u32, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::request::TransformMatrix;
    use crate::scene::{DrawableVector, SceneBackend, SceneOptions};

    fn timeline(options: SceneOptions, vectors: &[[f32; 2]]) -> Timeline {
        let mut timeline = Timeline::default();
        timeline.configure(&options);
        for &[x, y] in vectors {
            timeline.register_vector(DrawableVector::new(Vector2::new(x, y), Color::WHITE));
        }
        timeline.apply_transform(&TransformMatrix::new([[2.0, 0.0], [0.0, 1.0]]));
        timeline.hold(Duration::from_secs(2));
        timeline
    }

    fn bare() -> SceneOptions {
        SceneOptions {
            show_coordinates: false,
            show_background_plane: false,
            ..SceneOptions::default()
        }
    }

    #[test]
    fn each_vector_adds_an_arrow() {
        let empty = timeline(bare(), &[]);
        let two = timeline(bare(), &[[1.0, 0.0], [0.0, 1.0]]);
        let frame = two.last_frame(30);
        let base = frame_mesh(&empty, &frame, 14.0).triangle_count();
        assert_eq!(frame_mesh(&two, &frame, 14.0).triangle_count(), base + 6);
    }

    #[test]
    fn vectors_are_drawn_at_the_transformed_tip() {
        let t = timeline(bare(), &[[1.0, 1.0]]);
        let mesh = frame_mesh(&t, &t.last_frame(30), 14.0);
        // the arrow is drawn last; its tip vertex is the middle of the head
        let n = mesh.vertices.len();
        assert_eq!(mesh.vertices[n - 2].position, [2.0, 1.0]);
    }

    #[test]
    fn basis_and_ghost_vectors_are_optional() {
        let plain = timeline(bare(), &[[1.0, 0.5]]);
        let extras = timeline(
            SceneOptions {
                show_basis_vectors: true,
                leave_ghost_vectors: true,
                ..bare()
            },
            &[[1.0, 0.5]],
        );
        let last = plain.last_frame(30);
        let first = plain.frames(30).next().unwrap();
        let plain_count = frame_mesh(&plain, &last, 14.0).triangle_count();
        // two basis arrows and one ghost, three triangles each
        assert_eq!(
            frame_mesh(&extras, &last, 14.0).triangle_count(),
            plain_count + 9
        );
        // no ghost while the vector still sits on top of it
        assert_eq!(
            frame_mesh(&extras, &first, 14.0).triangle_count(),
            frame_mesh(&plain, &first, 14.0).triangle_count() + 6
        );
    }

    #[test]
    fn coordinates_add_ticks() {
        let t = timeline(bare(), &[]);
        let with_ticks = timeline(
            SceneOptions {
                show_coordinates: true,
                ..bare()
            },
            &[],
        );
        let frame = t.last_frame(30);
        assert!(
            frame_mesh(&with_ticks, &frame, 14.0).triangle_count()
                > frame_mesh(&t, &frame, 14.0).triangle_count()
        );
    }
}
