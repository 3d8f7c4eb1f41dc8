//! Core data structures for the voxel engine
//! Contains fundamental types like blocks, biomes, chunks, and vertices.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod vertex;

// Re-export commonly used types
pub use biome::Biome;
pub use block::{BlockRegistry, BlockType, Face, FaceTextures};
pub use chunk::Chunk;
pub use vertex::Vertex;
