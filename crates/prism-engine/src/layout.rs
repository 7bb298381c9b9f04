//! Host-side mirrors of shader uniform blocks and buffer alignment helpers.
//!
//! Every struct here is `#[repr(C)]` with a size that is a multiple of 16,
//! matching WGSL uniform layout rules.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

/// Rounds `value` up to the next multiple of `step`.
///
/// `step` of zero returns `value` unchanged.
#[inline]
pub const fn align_to(value: u64, step: u64) -> u64 {
    if step == 0 {
        return value;
    }
    value.div_ceil(step) * step
}

/// Stride between consecutive `T` in a dynamically-offset uniform buffer.
pub fn dynamic_uniform_stride<T>(limits: &wgpu::Limits) -> u64 {
    align_to(
        std::mem::size_of::<T>() as u64,
        limits.min_uniform_buffer_offset_alignment as u64,
    )
}

/// Per-draw transform and material block.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub camera_world_position: [f32; 3],
    pub time: f32,
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
            camera_world_position: [0.0; 3],
            time: 0.0,
        }
    }
}

impl SceneUniforms {
    pub fn set_projection(&mut self, m: Mat4) {
        self.projection = m.to_cols_array_2d();
    }

    pub fn set_view(&mut self, m: Mat4) {
        self.view = m.to_cols_array_2d();
    }

    pub fn set_model(&mut self, m: Mat4) {
        self.model = m.to_cols_array_2d();
    }

    pub fn set_camera_position(&mut self, p: Vec3) {
        self.camera_world_position = p.to_array();
    }
}

/// Two directional lights plus Blinn-Phong material parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightingUniforms {
    /// World-space directions pointing towards each light; `w` unused.
    pub directions: [[f32; 4]; 2],
    /// Linear RGB; `a` unused.
    pub colors: [[f32; 4]; 2],
    pub hardness: f32,
    pub kd: f32,
    pub ks: f32,
    pub normal_map_strength: f32,
}

impl Default for LightingUniforms {
    fn default() -> Self {
        Self {
            directions: [
                Vec4::new(0.5, -0.9, 0.1, 0.0).to_array(),
                Vec4::new(0.2, 0.4, 0.3, 0.0).to_array(),
            ],
            colors: [[1.0, 0.9, 0.6, 1.0], [0.6, 0.9, 1.0, 1.0]],
            hardness: 32.0,
            kd: 1.0,
            ks: 0.5,
            normal_map_strength: 0.5,
        }
    }
}

const _: () = assert!(std::mem::size_of::<SceneUniforms>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<LightingUniforms>() % 16 == 0);

/// A `UNIFORM | COPY_DST` buffer holding one `T`.
pub struct UniformBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Exact size of `T`, for `min_binding_size`.
    pub fn min_binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<T>() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_rounds_up_to_step() {
        assert_eq!(align_to(0, 4), 0);
        assert_eq!(align_to(1, 4), 4);
        assert_eq!(align_to(12, 4), 12);
        assert_eq!(align_to(13, 256), 256);
        assert_eq!(align_to(7, 0), 7);
    }

    #[test]
    fn six_u16_indices_pad_to_twelve_bytes() {
        // Odd index counts need padding before upload.
        assert_eq!(align_to(3 * 2, 4), 8);
        assert_eq!(align_to(6 * 2, 4), 12);
    }

    #[test]
    fn uniform_block_sizes() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 224);
        assert_eq!(std::mem::size_of::<LightingUniforms>(), 80);
    }

    #[test]
    fn dynamic_stride_respects_device_alignment() {
        let limits = wgpu::Limits::default();
        let stride = dynamic_uniform_stride::<SceneUniforms>(&limits);
        assert_eq!(stride % limits.min_uniform_buffer_offset_alignment as u64, 0);
        assert!(stride >= 224);
    }

    #[test]
    fn scene_setters_store_column_major() {
        let mut u = SceneUniforms::default();
        u.set_model(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        u.set_camera_position(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(u.camera_world_position, [4.0, 5.0, 6.0]);
    }
}
