use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::Chunk;
use crate::world::generator::WorldType;
use crate::world::world::World;

const MAGIC_HEADER: &[u8; 4] = b"VXW1";
const VERSION: u32 = 1;

pub const WORLD_FILE_EXTENSION: &str = "vxw";
pub const DEFAULT_WORLD_FILE: &str = "world.vxw";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] bincode::Error),
    #[error("Not a world file (bad magic header)")]
    BadMagic,
    #[error("Unsupported world file version: {0}")]
    UnsupportedVersion(u32),
}

/// Run-length entry: `count` consecutive voxels of block id `id` in linear
/// chunk order. Terrain compresses well this way since most of a chunk is
/// air above ground and stone below it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct BlockRun {
    pub id: u8,
    pub count: u32,
}

#[derive(Serialize, Deserialize)]
pub struct SavedChunk {
    pub cx: i32,
    pub cz: i32,
    pub runs: Vec<BlockRun>,
}

/// Everything needed to reconstruct a world: the generation inputs plus the
/// full voxel data of chunks the player changed. Untouched chunks are
/// regenerated from the seed instead of being stored.
#[derive(Serialize, Deserialize)]
pub struct SavedWorld {
    pub seed: u32,
    pub world_type: WorldType,
    pub time_of_day: f32,
    pub chunks: Vec<SavedChunk>,
}

impl SavedWorld {
    pub fn from_world(world: &World) -> Self {
        let mut chunks: Vec<SavedChunk> = world
            .chunks
            .values()
            .filter(|chunk| chunk.modified)
            .map(|chunk| SavedChunk {
                cx: chunk.cx,
                cz: chunk.cz,
                runs: encode_runs(chunk.blocks()),
            })
            .collect();
        // Registry iteration order is arbitrary; sort for stable files.
        chunks.sort_by_key(|chunk| (chunk.cx, chunk.cz));

        SavedWorld {
            seed: world.seed(),
            world_type: world.generator.world_type(),
            time_of_day: world.time_of_day(),
            chunks,
        }
    }

    /// Rebuilds the stored chunks. Callers insert these into the world
    /// before the initial load so streaming skips regeneration for them.
    pub fn restore_chunks(&self) -> Vec<Chunk> {
        self.chunks
            .iter()
            .map(|saved| Chunk::from_saved(saved.cx, saved.cz, decode_runs(&saved.runs)))
            .collect()
    }
}

fn encode_runs(blocks: &[BlockType]) -> Vec<BlockRun> {
    let mut runs: Vec<BlockRun> = Vec::new();
    for block in blocks {
        let id = block.id();
        match runs.last_mut() {
            Some(run) if run.id == id => run.count += 1,
            _ => runs.push(BlockRun { id, count: 1 }),
        }
    }
    runs
}

/// Expands runs back to a voxel array. Lenient on bad input: counts past the
/// chunk volume are clamped, unknown ids decode as air, and a short run list
/// leaves the remainder air.
fn decode_runs(runs: &[BlockRun]) -> Vec<BlockType> {
    let mut blocks = Vec::with_capacity(CHUNK_VOLUME);
    for run in runs {
        let block = match BlockType::from_id(run.id) {
            Some(block) => block,
            None => {
                tracing::warn!("Unknown block id {} in save data, decoding as air", run.id);
                BlockType::Air
            }
        };
        let remaining = CHUNK_VOLUME - blocks.len();
        let take = (run.count as usize).min(remaining);
        blocks.extend(std::iter::repeat_n(block, take));
        if take < run.count as usize {
            tracing::warn!("Block run overflows chunk volume, clamping");
            break;
        }
    }
    blocks.resize(CHUNK_VOLUME, BlockType::Air);
    blocks
}

pub fn save_world<P: AsRef<Path>>(path: P, world: &SavedWorld) -> Result<(), SaveError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(MAGIC_HEADER)?;
    writer.write_all(&VERSION.to_le_bytes())?;

    let data = bincode::serialize(world)?;
    writer.write_all(&(data.len() as u64).to_le_bytes())?;
    writer.write_all(&data)?;
    writer.flush()?;

    Ok(())
}

pub fn load_world<P: AsRef<Path>>(path: P) -> Result<SavedWorld, SaveError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC_HEADER {
        return Err(SaveError::BadMagic);
    }

    let mut version_bytes = [0u8; 4];
    reader.read_exact(&mut version_bytes)?;
    let version = u32::from_le_bytes(version_bytes);
    if version != VERSION {
        return Err(SaveError::UnsupportedVersion(version));
    }

    let mut size_bytes = [0u8; 8];
    reader.read_exact(&mut size_bytes)?;
    let size = u64::from_le_bytes(size_bytes) as usize;

    let mut data = vec![0u8; size];
    reader.read_exact(&mut data)?;

    Ok(bincode::deserialize(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generator::TerrainGenerator;

    fn modified_world() -> World {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);

        let mut edited = Chunk::new(0, 0);
        edited.generate(&generator);

        let mut pristine = Chunk::new(1, 0);
        pristine.generate(&generator);

        let mut world = World::new(generator);
        world.add_chunk(edited);
        world.add_chunk(pristine);
        world.set_block(4, 80, 4, BlockType::Cobblestone);
        world
    }

    #[test]
    fn test_encode_decode_runs_roundtrip() {
        let mut blocks = vec![BlockType::Air; CHUNK_VOLUME];
        blocks[0] = BlockType::Stone;
        blocks[1] = BlockType::Stone;
        blocks[2] = BlockType::Dirt;
        blocks[CHUNK_VOLUME - 1] = BlockType::Bedrock;

        let runs = encode_runs(&blocks);
        assert_eq!(runs[0], BlockRun { id: 1, count: 2 });
        assert_eq!(runs[1], BlockRun { id: 2, count: 1 });
        assert_eq!(decode_runs(&runs), blocks);
    }

    #[test]
    fn test_decode_clamps_overflowing_runs() {
        let runs = vec![BlockRun {
            id: BlockType::Stone.id(),
            count: CHUNK_VOLUME as u32 + 500,
        }];
        let blocks = decode_runs(&runs);
        assert_eq!(blocks.len(), CHUNK_VOLUME);
        assert!(blocks.iter().all(|b| *b == BlockType::Stone));
    }

    #[test]
    fn test_decode_pads_short_input_with_air() {
        let runs = vec![BlockRun {
            id: BlockType::Stone.id(),
            count: 10,
        }];
        let blocks = decode_runs(&runs);
        assert_eq!(blocks.len(), CHUNK_VOLUME);
        assert_eq!(blocks[9], BlockType::Stone);
        assert_eq!(blocks[10], BlockType::Air);
    }

    #[test]
    fn test_decode_unknown_id_becomes_air() {
        let runs = vec![BlockRun { id: 200, count: 4 }];
        let blocks = decode_runs(&runs);
        assert!(blocks.iter().all(|b| *b == BlockType::Air));
    }

    #[test]
    fn test_only_modified_chunks_are_saved() {
        let world = modified_world();
        let saved = SavedWorld::from_world(&world);
        assert_eq!(saved.chunks.len(), 1);
        assert_eq!((saved.chunks[0].cx, saved.chunks[0].cz), (0, 0));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let world = modified_world();
        let saved = SavedWorld::from_world(&world);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.vxw");
        save_world(&path, &saved).unwrap();

        let loaded = load_world(&path).unwrap();
        assert_eq!(loaded.seed, world.seed());
        assert_eq!(loaded.world_type, WorldType::Default);
        assert_eq!(loaded.chunks.len(), 1);

        let restored = loaded.restore_chunks();
        assert_eq!(restored.len(), 1);
        let chunk = &restored[0];
        assert_eq!(chunk.get_block(4, 80, 4), BlockType::Cobblestone);
        assert_eq!(
            chunk.blocks(),
            world.get_chunk(0, 0).unwrap().blocks()
        );
        assert!(chunk.modified);
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.vxw");
        std::fs::write(&path, b"NOPE0000000000000000").unwrap();

        match load_world(&path) {
            Err(SaveError::BadMagic) => {}
            other => panic!("expected BadMagic, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_rejects_future_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.vxw");

        let mut data = Vec::new();
        data.extend_from_slice(MAGIC_HEADER);
        data.extend_from_slice(&99u32.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes());
        std::fs::write(&path, &data).unwrap();

        match load_world(&path) {
            Err(SaveError::UnsupportedVersion(99)) => {}
            other => panic!("expected UnsupportedVersion, got {:?}", other.map(|_| ())),
        }
    }
}
