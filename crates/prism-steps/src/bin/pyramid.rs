//! An indexed 3D mesh read from a geometry file, spinning under a
//! perspective camera with a depth buffer.

use anyhow::Result;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use prism_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use prism_engine::device::{DepthBuffer, Gpu, validated};
use prism_engine::input::Key;
use prism_engine::layout::{SceneUniforms, UniformBuffer};
use prism_engine::resources::{load_geometry, load_shader_module};
use prism_steps::{padded_index_bytes, resource, run_step};

const CLEAR: wgpu::Color = wgpu::Color { r: 0.05, g: 0.05, b: 0.05, a: 1.0 };
const EYE: Vec3 = Vec3::new(0.0, -2.2, 1.4);

struct PyramidResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniforms: UniformBuffer<SceneUniforms>,
    bind_group: wgpu::BindGroup,
    depth: DepthBuffer,
}

#[derive(Default)]
struct Pyramid {
    resources: Option<PyramidResources>,
    scene: SceneUniforms,
}

impl App for Pyramid {
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let device = ctx.gpu.device();
        let shader = load_shader_module(&resource("shaders/pyramid.wgsl"), device)?;
        let geometry = load_geometry(&resource("geometry/pyramid.txt"), 3)?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pyramid vertex buffer"),
            contents: bytemuck::cast_slice(&geometry.points),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pyramid index buffer"),
            contents: &padded_index_bytes(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.scene.set_view(Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Z));
        self.scene.set_projection(perspective(ctx.gpu.aspect_ratio()));
        self.scene.set_camera_position(EYE);
        self.scene.color = [0.0, 1.0, 0.4, 1.0];
        let uniforms = UniformBuffer::new(device, "scene uniforms", &self.scene);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pyramid bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: UniformBuffer::<SceneUniforms>::min_binding_size(),
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pyramid bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pyramid pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: (geometry.stride() * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };

        let pipeline = validated(device, "pyramid pipeline", || device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pyramid pipeline"),
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
            depth_stencil: Some(DepthBuffer::stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))?;

        let size = ctx.gpu.size();
        self.resources = Some(PyramidResources {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            uniforms,
            bind_group,
            depth: DepthBuffer::new(device, size.width, size.height),
        });
        Ok(())
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        self.scene.set_projection(perspective(gpu.aspect_ratio()));
        if let Some(res) = self.resources.as_mut() {
            res.depth.resize(gpu.device(), size.width, size.height);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        let Some(res) = self.resources.as_ref() else {
            return AppControl::Exit;
        };

        self.scene.time = ctx.time.elapsed;
        self.scene.set_model(Mat4::from_rotation_z(self.scene.time));
        res.uniforms.write(ctx.gpu.queue(), &self.scene);

        ctx.render(CLEAR, |_, target| {
            let mut pass = target.begin_depth_pass("pyramid pass", res.depth.attachment());
            pass.set_pipeline(&res.pipeline);
            pass.set_bind_group(0, &res.bind_group, &[]);
            pass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
            pass.set_index_buffer(res.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..res.index_count, 0, 0..1);
        })
    }
}

fn perspective(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(45f32.to_radians(), aspect, 0.01, 100.0)
}

fn main() -> Result<()> {
    run_step("Pyramid", true, Pyramid::default())
}
