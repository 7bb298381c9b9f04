//! A textured OBJ model lit by two directional lights, with an orbit
//! camera and a GUI panel for the lighting parameters.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use prism_engine::camera::{OrbitCamera, OrbitSettings};
use prism_engine::coords::Vec2;
use prism_engine::core::{App, AppControl, FrameCtx, SetupCtx};
use prism_engine::device::{DepthBuffer, Gpu, validated};
use prism_engine::gui::{Gui, GuiConfig, GuiRenderer, Ui};
use prism_engine::input::Key;
use prism_engine::layout::{LightingUniforms, SceneUniforms, UniformBuffer};
use prism_engine::resources::{load_geometry_from_obj, load_shader_module, load_texture, Texture, VertexAttributes};
use prism_steps::{resource, run_step};

const CLEAR: wgpu::Color = wgpu::Color { r: 0.05, g: 0.05, b: 0.05, a: 1.0 };

#[derive(Parser, Debug)]
#[command(name = "lit_model")]
#[command(about = "Textured, normal-mapped model with two directional lights")]
struct Args {
    /// OBJ file to display
    #[arg(long)]
    model: Option<PathBuf>,

    /// Base color image; a checkerboard is used when omitted
    #[arg(long)]
    base_color: Option<PathBuf>,

    /// Tangent-space normal map; a flat map is used when omitted
    #[arg(long)]
    normal_map: Option<PathBuf>,

    /// TTF/OTF font for the GUI (falls back to PRISM_FONT, then system fonts)
    #[arg(long)]
    font: Option<PathBuf>,
}

struct ModelResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    scene_buffer: UniformBuffer<SceneUniforms>,
    lighting_buffer: UniformBuffer<LightingUniforms>,
    bind_group: wgpu::BindGroup,
    depth: DepthBuffer,
    // Views in the bind group keep their textures alive.
    _base_color: Texture,
    _normal_map: Texture,
}

struct LitModel {
    args: Args,
    resources: Option<ModelResources>,
    scene: SceneUniforms,
    lighting: LightingUniforms,
    lighting_dirty: bool,
    spin: bool,
    camera: OrbitCamera,
    gui: Gui,
    gui_renderer: GuiRenderer,
}

impl LitModel {
    fn new(args: Args) -> Self {
        let gui = Gui::new(GuiConfig {
            font_path: args.font.clone(),
            ..Default::default()
        });
        Self {
            args,
            resources: None,
            scene: SceneUniforms::default(),
            lighting: LightingUniforms::default(),
            lighting_dirty: true,
            spin: false,
            camera: OrbitCamera::new(OrbitSettings::default()),
            gui,
            gui_renderer: GuiRenderer::new(),
        }
    }
}

/// Lighting controls. Returns `true` if anything changed.
fn lighting_panel(ui: &mut Ui<'_>, lighting: &mut LightingUniforms, spin: &mut bool, dt: f32) -> bool {
    let mut changed = false;

    for i in 0..2 {
        if let Some(rgb) = lighting.colors[i].first_chunk_mut::<3>() {
            changed |= ui.color_edit(&format!("Color #{i}"), rgb);
        }
        if let Some(dir) = lighting.directions[i].first_chunk_mut::<3>() {
            changed |= ui.drag_vec3(&format!("Direction #{i}"), dir, 0.01);
        }
    }
    changed |= ui.slider("Hardness", &mut lighting.hardness, 1.0..=100.0);
    changed |= ui.slider("K Diffuse", &mut lighting.kd, 0.0..=1.0);
    changed |= ui.slider("K Specular", &mut lighting.ks, 0.0..=1.0);
    changed |= ui.slider("Normal Map", &mut lighting.normal_map_strength, 0.0..=1.0);
    ui.checkbox("Spin model", spin);

    ui.add_space(4.0);
    ui.label(&format!("{:.2} ms/frame", dt * 1000.0));
    changed
}

impl App for LitModel {
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let device = ctx.gpu.device();
        let queue = ctx.gpu.queue();

        let shader = load_shader_module(&resource("shaders/lit_model.wgsl"), device)?;

        let model_path = self.args.model.clone().unwrap_or_else(|| resource("models/cube.obj"));
        let vertices = load_geometry_from_obj(&model_path)?;
        anyhow::ensure!(!vertices.is_empty(), "{} has no triangles", model_path.display());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("model vertex buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let color_format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let base_color = match &self.args.base_color {
            Some(path) => load_texture(path, device, queue, color_format)?,
            None => Texture::checkerboard(device, queue, color_format)?,
        };
        let normal_map = match &self.args.normal_map {
            Some(path) => load_texture(path, device, queue, wgpu::TextureFormat::Rgba8Unorm)?,
            None => Texture::flat_normal_map(device, queue)?,
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("model sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: 8.0,
            ..Default::default()
        });

        self.scene.color = [1.0, 1.0, 1.0, 1.0];
        let scene_buffer = UniformBuffer::new(device, "scene uniforms", &self.scene);
        let lighting_buffer = UniformBuffer::new(device, "lighting uniforms", &self.lighting);

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: UniformBuffer::<SceneUniforms>::min_binding_size(),
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: UniformBuffer::<LightingUniforms>::min_binding_size(),
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: scene_buffer.binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&base_color.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&normal_map.view),
                },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&sampler) },
                wgpu::BindGroupEntry { binding: 4, resource: lighting_buffer.binding() },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = validated(device, "model pipeline", || device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[VertexAttributes::layout()],
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
            depth_stencil: Some(DepthBuffer::stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))?;

        let size = ctx.gpu.size();
        self.resources = Some(ModelResources {
            pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            scene_buffer,
            lighting_buffer,
            bind_group,
            depth: DepthBuffer::new(device, size.width, size.height),
            _base_color: base_color,
            _normal_map: normal_map,
        });
        Ok(())
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        if let Some(res) = self.resources.as_mut() {
            res.depth.resize(gpu.device(), size.width, size.height);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.gui.begin_frame(ctx.input, ctx.input_frame);
        let (lighting, spin, dt) = (&mut self.lighting, &mut self.spin, ctx.time.dt);
        if self.gui.panel("Lighting", Vec2::new(10.0, 10.0), 280.0, |ui| lighting_panel(ui, lighting, spin, dt)) {
            self.lighting_dirty = true;
        }

        self.camera.handle_input(ctx.input, ctx.input_frame, self.gui.wants_pointer());
        self.camera.update_inertia();

        let Some(res) = self.resources.as_ref() else {
            return AppControl::Exit;
        };

        self.scene.time = ctx.time.elapsed;
        self.scene.set_view(self.camera.view_matrix());
        self.scene.set_projection(self.camera.projection(ctx.gpu.aspect_ratio()));
        self.scene.set_camera_position(self.camera.position());
        let model = if self.spin {
            Mat4::from_rotation_z(0.5 * self.scene.time)
        } else {
            Mat4::IDENTITY
        };
        self.scene.set_model(model);

        let queue = ctx.gpu.queue();
        res.scene_buffer.write(queue, &self.scene);
        if self.lighting_dirty {
            res.lighting_buffer.write(queue, &self.lighting);
            self.lighting_dirty = false;
        }

        let (gui, gui_renderer) = (&mut self.gui, &mut self.gui_renderer);
        ctx.render(CLEAR, |rctx, target| {
            {
                let mut pass = target.begin_depth_pass("model pass", res.depth.attachment());
                pass.set_pipeline(&res.pipeline);
                pass.set_bind_group(0, &res.bind_group, &[]);
                pass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
                pass.draw(0..res.vertex_count, 0..1);
            }
            gui_renderer.render(rctx, target, gui);
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    run_step("Lit Model", true, LitModel::new(args))
}
