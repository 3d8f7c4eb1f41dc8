// Core module with fundamental types
pub mod core;

// Render module with meshing and the upload boundary
pub mod render;

// World module with generation, streaming, and simulation state
pub mod world;

// Other modules
pub mod config;
pub mod constants;
pub mod save;

// Re-exports
pub use crate::core::{Biome, BlockRegistry, BlockType, Chunk, Face, FaceTextures, Vertex};
pub use config::{EngineConfig, StreamingConfig, WorldConfig, load_config, save_config};
pub use constants::*;
pub use render::{
    ChunkMeshData, MeshHandle, NullRenderSink, RenderSink, add_quad, build_chunk_mesh,
};
pub use save::{DEFAULT_WORLD_FILE, SaveError, SavedWorld, load_world, save_world};
pub use world::{ChunkManager, ChunkState, TerrainGenerator, Weather, World, WorldType};
