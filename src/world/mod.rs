//! World generation and management modules
//! Contains terrain generation, the chunk registry, and streaming.

pub mod generator;
pub mod manager;
pub mod world;

// Re-export commonly used types
pub use generator::{TerrainGenerator, WorldType};
pub use manager::{ChunkManager, ChunkState};
pub use world::{Weather, World};
