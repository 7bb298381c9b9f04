//! GPU types shared by the overlay renderers.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};

/// `src + dst * (1 - src.a)`; colors are premultiplied.
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

impl ViewportUniform {
    pub(super) const SIZE: wgpu::BufferSize =
        wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64).unwrap();

    pub(super) fn from_viewport(viewport: Viewport) -> Self {
        Self {
            viewport: viewport.as_uniform(),
            _pad: [0.0; 2],
        }
    }
}

pub(super) fn viewport_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(ViewportUniform::SIZE),
        },
        count: None,
    }
}

/// Unit-quad corner, 0..1 on both axes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Alpha-blended, uncull'd, no depth: the overlay pipeline state.
pub(super) fn overlay_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    instance_layout: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Converts a logical clip rect into a physical scissor `(x, y, w, h)`,
/// clamped to the viewport.
///
/// `None` clip means the full viewport. Returns `None` when the result has
/// zero area and the draw should be skipped.
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_w = (viewport.width * scale).max(1.0) as u32;
    let phys_h = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_w, phys_h),
        Some(r) => {
            let to_phys = |v: f32, limit: u32| ((v * scale).max(0.0) as u32).min(limit);
            let x0 = to_phys(r.origin.x, phys_w);
            let y0 = to_phys(r.origin.y, phys_h);
            let x1 = to_phys(r.origin.x + r.size.x, phys_w);
            let y1 = to_phys(r.origin.y + r.size.y, phys_h);
            (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

/// Splits `clips` into runs of equal consecutive clip rects, yielding
/// `(start..end, clip)`.
pub(super) fn clip_runs(clips: &[Option<Rect>]) -> Vec<(std::ops::Range<u32>, Option<Rect>)> {
    let mut runs = Vec::new();
    let mut start = 0usize;
    while start < clips.len() {
        let clip = clips[start];
        let mut end = start + 1;
        while end < clips.len() && clips[end] == clip {
            end += 1;
        }
        runs.push((start as u32..end as u32, clip));
        start = end;
    }
    runs
}

/// Grows `buffer` to hold at least `required` instances of `stride` bytes.
pub(super) fn ensure_instance_buffer(
    device: &wgpu::Device,
    label: &str,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    stride: usize,
) {
    if required <= *capacity && buffer.is_some() {
        return;
    }
    let new_cap = required.next_power_of_two().max(64);
    *buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * stride) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = new_cap;
}
