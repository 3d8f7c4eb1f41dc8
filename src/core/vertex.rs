use bytemuck::{Pod, Zeroable};

/// One corner of a block face, laid out for direct GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
    /// Texture atlas slot, passed as a float so the vertex layout stays
    /// homogeneous.
    pub tex_index: f32,
}
