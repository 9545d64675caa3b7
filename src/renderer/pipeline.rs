use super::context::AnyContext;

pub struct PipelineBuilder<'a> {
    label: String,
    shader: &'a wgpu::ShaderModule,
    vertex_layouts: Vec<wgpu::VertexBufferLayout<'a>>,
    fragment: Option<(&'a str, Vec<Option<wgpu::ColorTargetState>>)>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    sample_count: u32,
}

impl<'a> PipelineBuilder<'a> {
    pub fn for_render<'b: 'a>(label: impl Into<String>, shader: &'b wgpu::ShaderModule) -> Self {
        Self {
            label: label.into(),
            shader,
            vertex_layouts: Vec::new(),
            fragment: None,
            bind_group_layouts: Vec::new(),
            sample_count: 1,
        }
    }

    pub fn vertex(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_layouts.push(layout);
        self
    }

    pub fn fragment(
        mut self,
        entry_point: &'a str,
        targets: &[Option<wgpu::ColorTargetState>],
    ) -> Self {
        self.fragment = Some((entry_point, targets.to_vec()));
        self
    }

    pub fn add_bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    pub fn multisample(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    pub fn build(self, ctx: &impl AnyContext) -> wgpu::RenderPipeline {
        let pipeline_layout =
            ctx.device()
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(&format!("{} Layout", self.label)),
                    bind_group_layouts: &self.bind_group_layouts,
                    push_constant_ranges: &[],
                });

        ctx.device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&self.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: self.shader,
                    entry_point: "vs_main",
                    buffers: &self.vertex_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: self
                    .fragment
                    .as_ref()
                    .map(|(entry_point, targets)| wgpu::FragmentState {
                        module: self.shader,
                        entry_point: *entry_point,
                        targets: targets.as_slice(),
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                // 2D only: no culling, winding comes from the triangulator
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: self.sample_count,
                    ..Default::default()
                },
                multiview: None,
                cache: None,
            })
    }
}
