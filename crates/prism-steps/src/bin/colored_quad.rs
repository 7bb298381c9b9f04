//! An indexed quad with per-vertex colors, kept square with an aspect-ratio
//! uniform.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use prism_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use prism_engine::device::{Gpu, validated};
use prism_engine::input::Key;
use prism_engine::layout::UniformBuffer;
use prism_engine::resources::{load_geometry, load_shader_module};
use prism_steps::{padded_index_bytes, resource, run_step};

const CLEAR: wgpu::Color = wgpu::Color { r: 0.05, g: 0.05, b: 0.05, a: 1.0 };

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadUniforms {
    aspect_ratio: f32,
    time: f32,
    _pad: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<QuadUniforms>() % 16 == 0);

struct QuadResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniforms: UniformBuffer<QuadUniforms>,
    bind_group: wgpu::BindGroup,
}

#[derive(Default)]
struct ColoredQuad {
    resources: Option<QuadResources>,
    aspect_ratio: f32,
}

impl App for ColoredQuad {
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let device = ctx.gpu.device();
        let shader = load_shader_module(&resource("shaders/colored_quad.wgsl"), device)?;
        let geometry = load_geometry(&resource("geometry/quad.txt"), 2)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertex buffer"),
            contents: bytemuck::cast_slice(&geometry.points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad index buffer"),
            contents: &padded_index_bytes(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.aspect_ratio = ctx.gpu.aspect_ratio();
        let uniforms = UniformBuffer::new(
            device,
            "quad uniforms",
            &QuadUniforms { aspect_ratio: self.aspect_ratio, time: 0.0, _pad: [0.0; 2] },
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: UniformBuffer::<QuadUniforms>::min_binding_size(),
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding(),
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: (geometry.stride() * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3],
        };

        let pipeline = validated(device, "quad pipeline", || device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
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
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))?;

        self.resources = Some(QuadResources {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            uniforms,
            bind_group,
        });
        Ok(())
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, _size: PhysicalSize<u32>) {
        self.aspect_ratio = gpu.aspect_ratio();
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        let Some(res) = self.resources.as_ref() else {
            return AppControl::Exit;
        };

        res.uniforms.write(
            ctx.gpu.queue(),
            &QuadUniforms {
                aspect_ratio: self.aspect_ratio,
                time: ctx.time.elapsed,
                _pad: [0.0; 2],
            },
        );

        ctx.render(CLEAR, |_, target| {
            let mut pass = target.begin_load_pass("quad pass");
            pass.set_pipeline(&res.pipeline);
            pass.set_bind_group(0, &res.bind_group, &[]);
            pass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
            pass.set_index_buffer(res.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..res.index_count, 0, 0..1);
        })
    }
}

fn main() -> Result<()> {
    run_step("Colored Quad", true, ColoredQuad::default())
}
