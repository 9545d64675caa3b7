use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
};

use super::context::SurfaceContext;
use super::{frame_mesh, Context, Renderer, Target};
use crate::animations::{FrameState, Timeline};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::geometry::Color;

pub trait App {
    fn resize(&mut self, ctx: &mut SurfaceContext, size: winit::dpi::PhysicalSize<u32>);
    fn render(&mut self, ctx: &SurfaceContext) -> Result<(), wgpu::SurfaceError>;
}

pub struct Window {
    window: Rc<winit::window::Window>,
    pub event_loop: EventLoop<()>,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, RenderError> {
        let event_loop = EventLoop::new().map_err(|e| RenderError::Window(e.to_string()))?;
        let window = winit::window::WindowBuilder::new()
            .with_title(title)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
            .build(&event_loop)
            .map_err(|e| RenderError::Window(e.to_string()))?;

        Ok(Self {
            event_loop,
            window: Rc::new(window),
        })
    }

    pub fn get_window(&self) -> Rc<winit::window::Window> {
        Rc::clone(&self.window)
    }

    pub fn run<T: App>(self, ctx: &mut SurfaceContext<'_>, mut app: T) -> Result<(), RenderError> {
        self.event_loop
            .run(move |event, target| {
                let event = match event {
                    Event::AboutToWait => {
                        self.window.request_redraw();
                        return;
                    }
                    Event::WindowEvent { event, .. } => event,
                    _ => return,
                };

                match event {
                    WindowEvent::Resized(new_size) => {
                        ctx.resize(new_size);
                        app.resize(ctx, new_size);
                        self.window.request_redraw();
                    }
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::RedrawRequested => match app.render(ctx) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            log::warn!("Surface lost or outdated, reconfiguring");
                            let size = self.window.inner_size();
                            ctx.resize(size);
                            app.resize(ctx, size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("OutOfMemory");
                            target.exit();
                        }
                        Err(e) => log::warn!("Surface error: {e}"),
                    },
                    _ => {}
                };
            })
            .map_err(|e| RenderError::Window(e.to_string()))
    }
}

/// Plays the timeline in a loop until the window is closed.
struct Player<'t> {
    timeline: &'t Timeline,
    renderer: Renderer,
    msaa: Option<wgpu::TextureView>,
    background: Color,
    started: Instant,
    /// Pause between loops so the end state stays readable.
    gap: Duration,
}

impl<'t> Player<'t> {
    fn new(ctx: &SurfaceContext, config: &RenderConfig, timeline: &'t Timeline) -> Self {
        let aspect = ctx.config.width as f32 / ctx.config.height as f32;
        let renderer = Renderer::new(ctx, ctx.view_format(), config.samples, aspect);
        let msaa = renderer.create_msaa_texture(
            ctx,
            ctx.view_format(),
            ctx.config.width,
            ctx.config.height,
        );
        Self {
            timeline,
            renderer,
            msaa,
            background: config.background,
            started: Instant::now(),
            gap: Duration::from_millis(500),
        }
    }

    fn time(&self) -> f32 {
        let period = self.timeline.duration() + self.gap.as_secs_f32();
        self.started.elapsed().as_secs_f32() % period
    }
}

impl App for Player<'_> {
    fn resize(&mut self, ctx: &mut SurfaceContext, size: winit::dpi::PhysicalSize<u32>) {
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        self.renderer.camera.set_aspect(ctx, aspect);
        self.msaa = self.renderer.create_msaa_texture(
            ctx,
            ctx.view_format(),
            ctx.config.width,
            ctx.config.height,
        );
    }

    fn render(&mut self, ctx: &SurfaceContext) -> Result<(), wgpu::SurfaceError> {
        let frame = ctx.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(ctx.view_format()),
            ..Default::default()
        });

        let time = self.time();
        let state = FrameState {
            index: 0,
            time,
            matrix: self.timeline.sample(time),
        };
        let mesh = frame_mesh(self.timeline, &state, self.renderer.camera.frame_width());

        let target = match &self.msaa {
            Some(msaa) => Target {
                view: msaa,
                resolve: Some(&view),
            },
            None => Target {
                view: &view,
                resolve: None,
            },
        };
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Preview Encoder"),
            });
        self.renderer
            .encode(ctx, &mut encoder, target, &mesh, self.background);
        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}

/// Shows the scene in a window instead of writing files.
pub struct Preview {
    config: RenderConfig,
    timeline: Timeline,
}

impl Preview {
    pub fn new(config: RenderConfig) -> Self {
        let timeline = Timeline::new(config.transform_run_time, config.rate_func);
        Self { config, timeline }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    async fn run(&self) -> Result<(), RenderError> {
        let window = Window::new("eigenvis", self.config.width, self.config.height)?;
        let handle = window.get_window();
        let mut ctx = Context::init().await?.attach_window(&handle)?;
        let player = Player::new(&ctx, &self.config, &self.timeline);
        window.run(&mut ctx, player)
    }
}

impl_timeline_backend!(Preview);

impl Preview {
    fn present(&mut self) -> Result<(), RenderError> {
        log::info!("opening preview window, close it to exit");
        pollster::block_on(self.run())
    }
}
