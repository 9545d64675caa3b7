use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::output::{sink_for, FrameSink};
use super::{frame_mesh, AnyContext, Context, Renderer, Target, OFFSCREEN_FORMAT};
use crate::animations::{FrameState, Timeline};
use crate::config::{OutputFormat, RenderConfig};
use crate::error::RenderError;
use crate::geometry::{Color, Mesh};
use crate::scene::TransformScene;

/// Renders a recorded timeline offscreen and writes it to disk.
pub struct Movie {
    config: RenderConfig,
    timeline: Timeline,
    artifact: Option<PathBuf>,
}

impl Movie {
    pub fn new(config: RenderConfig) -> Self {
        let timeline = Timeline::new(config.transform_run_time, config.rate_func);
        Self {
            config,
            timeline,
            artifact: None,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Path of the written frames, GIF or image, once finished.
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    async fn render(&self) -> Result<PathBuf, RenderError> {
        let config = &self.config;
        let ctx = Context::init().await?;
        let renderer = Renderer::new(&ctx, OFFSCREEN_FORMAT, config.samples, config.aspect());
        let target = Offscreen::new(&ctx, &renderer, config.width, config.height)?;
        let frame_width = renderer.camera.frame_width();

        let frames: Vec<FrameState> = match config.format {
            OutputFormat::LastFrame => vec![self.timeline.last_frame(config.fps)],
            _ => self.timeline.frames(config.fps).collect(),
        };
        log::info!(
            "rendering {} frame(s) at {}x{} @ {} fps",
            frames.len(),
            config.width,
            config.height,
            config.fps
        );

        let mut sink: Box<dyn FrameSink> = sink_for(
            config.format,
            &config.output_dir,
            TransformScene::NAME,
            config.fps,
        )?;
        for frame in &frames {
            let mesh = frame_mesh(&self.timeline, frame, frame_width);
            let image = target
                .capture(&ctx, &renderer, &mesh, config.background, frame)
                .await?;
            log::debug!("frame {} ({:.3}s) captured", frame.index, frame.time);
            sink.write(frame.index, image)?;
        }
        sink.finish()
    }
}

impl_timeline_backend!(Movie);

impl Movie {
    fn present(&mut self) -> Result<(), RenderError> {
        let path = pollster::block_on(self.render())?;
        log::info!("animation written to {}", path.display());
        self.artifact = Some(path);
        Ok(())
    }
}

/// Render target plus the buffer frames are copied into for readback.
struct Offscreen {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    msaa: Option<wgpu::TextureView>,
    readback: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl Offscreen {
    const BYTES_PER_PIXEL: u32 = 4;

    fn new(
        ctx: &impl AnyContext,
        renderer: &Renderer,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let max = ctx.device().limits().max_texture_dimension_2d;
        let (padded_bytes_per_row, readback_size) = readback_layout(width, height, max)?;

        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let msaa = renderer.create_msaa_texture(ctx, OFFSCREEN_FORMAT, width, height);

        let readback = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: readback_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            texture,
            view,
            msaa,
            readback,
            width,
            height,
            padded_bytes_per_row,
        })
    }

    async fn capture(
        &self,
        ctx: &impl AnyContext,
        renderer: &Renderer,
        mesh: &Mesh,
        background: Color,
        frame: &FrameState,
    ) -> Result<RgbaImage, RenderError> {
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let target = match &self.msaa {
            Some(msaa) => Target {
                view: msaa,
                resolve: Some(&self.view),
            },
            None => Target {
                view: &self.view,
                resolve: None,
            },
        };
        renderer.encode(ctx, &mut encoder, target, mesh, background);

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.readback,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue().submit(std::iter::once(encoder.finish()));

        let slice = self.readback.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        ctx.device().poll(wgpu::Maintain::Wait);
        rx.await.map_err(|_| RenderError::BufferMapCanceled)??;

        let row_bytes = (self.width * Self::BYTES_PER_PIXEL) as usize;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(self.padded_bytes_per_row as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.readback.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels).ok_or(RenderError::Frame(frame.index))
    }
}

/// Rows copied out of a texture must be aligned to 256 bytes.
fn padded_bytes_per_row(width: u32) -> Option<u32> {
    let unpadded = width.checked_mul(Offscreen::BYTES_PER_PIXEL)?;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align).checked_mul(align)
}

/// Padded row size and total readback buffer size for a `width`×`height` frame.
fn readback_layout(
    width: u32,
    height: u32,
    max_dimension: u32,
) -> Result<(u32, wgpu::BufferAddress), RenderError> {
    let too_large = || RenderError::FrameTooLarge {
        width,
        height,
        max: max_dimension,
    };
    if width > max_dimension || height > max_dimension {
        return Err(too_large());
    }
    let row = padded_bytes_per_row(width).ok_or_else(too_large)?;
    let size = (row as wgpu::BufferAddress)
        .checked_mul(height as wgpu::BufferAddress)
        .ok_or_else(too_large)?;
    Ok((row, size))
}
