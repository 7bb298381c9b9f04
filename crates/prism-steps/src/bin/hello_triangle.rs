//! A single triangle, positions generated in the vertex shader.

use anyhow::Result;

use prism_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use prism_engine::device::validated;
use prism_engine::input::Key;
use prism_engine::resources::load_shader_module;
use prism_steps::{resource, run_step};

const CLEAR: wgpu::Color = wgpu::Color { r: 0.9, g: 0.1, b: 0.2, a: 1.0 };

#[derive(Default)]
struct HelloTriangle {
    pipeline: Option<wgpu::RenderPipeline>,
}

impl App for HelloTriangle {
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let device = ctx.gpu.device();
        let shader = load_shader_module(&resource("shaders/hello_triangle.wgsl"), device)?;

        log::info!("creating render pipeline...");
        self.pipeline = Some(validated(device, "triangle pipeline", || device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("triangle pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.gpu.surface_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))?);
        log::info!("render pipeline ready");
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let pipeline = self.pipeline.as_ref();
        ctx.render(CLEAR, |_, target| {
            let Some(pipeline) = pipeline else { return };
            let mut pass = target.begin_load_pass("triangle pass");
            pass.set_pipeline(pipeline);
            pass.draw(0..3, 0..1);
        })
    }
}

fn main() -> Result<()> {
    run_step("Hello Triangle", false, HelloTriangle::default())
}
