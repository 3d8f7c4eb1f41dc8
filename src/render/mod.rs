//! Rendering-related modules
//! Contains face-culled mesh building and the backend upload boundary.

pub mod mesh;
pub mod sink;

// Re-export commonly used types
pub use mesh::{ChunkMeshData, add_quad, build_chunk_mesh};
pub use sink::{MeshHandle, NullRenderSink, RenderSink};
