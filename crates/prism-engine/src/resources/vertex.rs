use bytemuck::{Pod, Zeroable};

/// Interleaved vertex as consumed by the lit-model shader.
///
/// `tangent`, `bitangent` and `normal` are the local frame in which normal
/// map samples are expressed (X, Y and Z respectively).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexAttributes {
    pub position: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexAttributes {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // tangent
        2 => Float32x3, // bitangent
        3 => Float32x3, // normal
        4 => Float32x3, // color
        5 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexAttributes>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_offsets_match_struct() {
        let offsets: Vec<u64> = VertexAttributes::ATTRS.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36, 48, 60]);
        assert_eq!(VertexAttributes::layout().array_stride, 68);
    }
}
