use cgmath::{Matrix4, SquareMatrix};
use encase::ShaderType;
use wgpu::util::DeviceExt;

use super::{AnyContext, Attach, BindGroupBuilder};

/// Height of the visible frame in world units, as in manim.
pub const FRAME_HEIGHT: f32 = 8.0;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone, ShaderType)]
pub struct CameraUniforms {
    pub view_proj: Matrix4<f32>,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view_proj: Matrix4::identity(),
        }
    }
}

/// Orthographic camera centred on the origin.
pub struct Camera {
    pub aspect: f32,
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl Camera {
    pub fn new(ctx: &impl AnyContext, aspect: f32) -> Self {
        let uniforms = CameraUniforms {
            view_proj: view_projection(aspect),
        };
        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: &encode(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group_layout = BindGroupBuilder::new("Camera Bind Group layout")
            .add_uniform_buffer(wgpu::ShaderStages::VERTEX, Some(CameraUniforms::min_size()))
            .build(ctx);

        let bind_group =
            bind_group_layout.attach(ctx, "Camera Bind Group", vec![buffer.as_entire_binding()]);

        Self {
            aspect,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn frame_width(&self) -> f32 {
        FRAME_HEIGHT * self.aspect
    }

    pub fn set_aspect(&mut self, ctx: &impl AnyContext, aspect: f32) {
        self.aspect = aspect;
        let uniforms = CameraUniforms {
            view_proj: view_projection(aspect),
        };
        ctx.queue().write_buffer(&self.buffer, 0, &encode(&uniforms));
    }
}

pub fn view_projection(aspect: f32) -> Matrix4<f32> {
    let half_h = FRAME_HEIGHT / 2.0;
    let half_w = half_h * aspect;
    OPENGL_TO_WGPU_MATRIX * cgmath::ortho(-half_w, half_w, -half_h, half_h, -1.0, 1.0)
}

fn encode(uniforms: &CameraUniforms) -> Vec<u8> {
    let mut buff = encase::UniformBuffer::new(Vec::<u8>::new());
    // writing into a Vec grows it as needed
    buff.write(uniforms)
        .expect("uniform buffer backed by a Vec cannot overflow");
    buff.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn frame_corners_map_to_clip_corners() {
        let m = view_projection(16.0 / 9.0);
        let corner = m * Vector4::new(8.0 * 16.0 / 9.0 / 2.0, 4.0, 0.0, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);

        let origin = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(origin.x.abs() < 1e-6 && origin.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&origin.z));
    }

    #[test]
    fn uniforms_encode_to_a_mat4() {
        assert_eq!(encode(&CameraUniforms::default()).len(), 64);
    }
}
