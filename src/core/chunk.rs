use crate::constants::*;
use crate::core::biome::Biome;
use crate::core::block::BlockType;
use crate::render::sink::MeshHandle;
use crate::world::generator::{ORE_TABLE, TerrainGenerator};

/// A 16x256x16 column of voxel storage, the unit of loading, meshing and
/// eviction. Voxels are indexed `y * W * D + z * W + x`.
pub struct Chunk {
    pub cx: i32,
    pub cz: i32,
    blocks: Vec<BlockType>,
    /// Highest non-air Y per column, indexed `z * W + x`. Upper bound only:
    /// raised by placements, never lowered by removals.
    heightmap: [u8; CHUNK_AREA],
    pub needs_remesh: bool,
    pub modified: bool,
    /// Renderer-owned geometry token, kept for disposal on evict/remesh.
    pub mesh: Option<MeshHandle>,
}

impl Chunk {
    pub fn new(cx: i32, cz: i32) -> Self {
        Chunk {
            cx,
            cz,
            blocks: vec![BlockType::Air; CHUNK_VOLUME],
            heightmap: [0; CHUNK_AREA],
            needs_remesh: true,
            modified: false,
            mesh: None,
        }
    }

    /// Rebuilds a chunk from persisted voxel data. The heightmap is
    /// recomputed as the topmost non-air cell per column, which can sit
    /// above the terrain height for water columns; that stays within the
    /// upper-bound contract.
    pub fn from_saved(cx: i32, cz: i32, blocks: Vec<BlockType>) -> Self {
        let mut chunk = Chunk {
            cx,
            cz,
            blocks,
            heightmap: [0; CHUNK_AREA],
            needs_remesh: true,
            modified: true,
            mesh: None,
        };
        chunk.blocks.resize(CHUNK_VOLUME, BlockType::Air);
        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                for y in (0..WORLD_HEIGHT).rev() {
                    if chunk.blocks[Self::index(lx, y, lz)] != BlockType::Air {
                        chunk.heightmap[(lz * CHUNK_SIZE + lx) as usize] = y as u8;
                        break;
                    }
                }
            }
        }
        chunk
    }

    fn index(x: i32, y: i32, z: i32) -> usize {
        (y * CHUNK_SIZE * CHUNK_SIZE + z * CHUNK_SIZE + x) as usize
    }

    fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < CHUNK_SIZE && y >= 0 && y < WORLD_HEIGHT && z >= 0 && z < CHUNK_SIZE
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)]
        } else {
            BlockType::Air
        }
    }

    /// Gameplay edit path: writes the voxel, marks the chunk stale for both
    /// meshing and persistence, and raises the column height when the block
    /// lands above it. Out-of-range writes are dropped.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        self.blocks[Self::index(x, y, z)] = block;
        self.needs_remesh = true;
        self.modified = true;
        self.raise_height(x, y, z, block);
    }

    /// Generation-time placement: same write and height bookkeeping as
    /// `set_block` but without dirtying the modified flag, so freshly
    /// generated chunks are not queued for persistence.
    pub(crate) fn place_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        self.blocks[Self::index(x, y, z)] = block;
        self.raise_height(x, y, z, block);
    }

    fn raise_height(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        let column = (z * CHUNK_SIZE + x) as usize;
        if block != BlockType::Air && y > self.heightmap[column] as i32 {
            self.heightmap[column] = y as u8;
        }
    }

    /// Highest non-air Y cached for a column; out-of-range columns report 0.
    pub fn height_at_column(&self, x: i32, z: i32) -> i32 {
        if x < 0 || x >= CHUNK_SIZE || z < 0 || z >= CHUNK_SIZE {
            return 0;
        }
        self.heightmap[(z * CHUNK_SIZE + x) as usize] as i32
    }

    pub fn mark_dirty(&mut self) {
        self.needs_remesh = true;
    }

    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Fills the chunk from the terrain generator. Called exactly once,
    /// before any other access: strata and water column by column, then
    /// surface features, then cave carving and ore veins over the full
    /// volume. Leaves the chunk dirty for meshing and *not* modified.
    pub fn generate(&mut self, generator: &TerrainGenerator) {
        let base_x = self.cx * CHUNK_SIZE;
        let base_z = self.cz * CHUNK_SIZE;

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let world_x = base_x + lx;
                let world_z = base_z + lz;
                let height = generator.height_at(world_x, world_z);
                let biome = generator.biome_at(world_x, world_z);

                self.heightmap[(lz * CHUNK_SIZE + lx) as usize] =
                    height.clamp(0, WORLD_HEIGHT - 1) as u8;

                for y in 0..WORLD_HEIGHT {
                    let block = terrain_block(generator, biome, y, height, world_x, world_z);
                    if block != BlockType::Air {
                        self.blocks[Self::index(lx, y, lz)] = block;
                    }
                }

                self.place_features(generator, lx, lz, height, biome, world_x, world_z);
            }
        }

        self.carve_caves(generator, base_x, base_z);
        self.place_ores(generator, base_x, base_z);

        self.needs_remesh = true;
        self.modified = false;
    }

    /// Column features: one deterministic roll per column partitioned into
    /// tree/flower/grass/cactus bands. Columns below sea level get nothing.
    fn place_features(
        &mut self,
        generator: &TerrainGenerator,
        lx: i32,
        lz: i32,
        height: i32,
        biome: Biome,
        world_x: i32,
        world_z: i32,
    ) {
        if height < SEA_LEVEL {
            return;
        }

        let rand = generator.feature_rand(world_x, world_z);

        let tree_threshold = biome.tree_threshold();
        if tree_threshold > 0.0
            && rand < tree_threshold
            && lx > 2
            && lx < 13
            && lz > 2
            && lz < 13
        {
            self.place_tree(generator, lx, height + 1, lz, biome, world_x, world_z);
        }

        if rand > 0.9 && rand < 0.95 {
            if biome.has_flowers() {
                let flower = if rand > 0.92 {
                    BlockType::RedFlower
                } else {
                    BlockType::YellowFlower
                };
                self.place_block(lx, height + 1, lz, flower);
            }
        } else if rand > 0.7 && rand < 0.9 && biome.has_tall_grass() {
            self.place_block(lx, height + 1, lz, BlockType::TallGrass);
        }

        if biome.has_cacti() && rand < 0.01 {
            let mut sequence = generator.placement_sequence(world_x, height, world_z);
            let cactus_height = 1 + sequence.next_below(3) as i32;
            for dy in 0..cactus_height {
                self.place_block(lx, height + 1 + dy, lz, BlockType::Cactus);
            }
        }
    }

    /// Trunk plus four leaf layers (radii 1,2,2,1). Leaf writes that would
    /// land at a local (x,z) outside this chunk are clipped, never redirected
    /// into a neighbor.
    fn place_tree(
        &mut self,
        generator: &TerrainGenerator,
        lx: i32,
        y: i32,
        lz: i32,
        biome: Biome,
        world_x: i32,
        world_z: i32,
    ) {
        let log = biome.log_block();
        let leaves = biome.leaves_block();
        let mut sequence = generator.placement_sequence(world_x, y, world_z);
        let trunk_height = 4 + sequence.next_below(3) as i32;

        for dy in 0..trunk_height {
            self.place_block(lx, y + dy, lz, log);
        }

        let leaf_start = y + trunk_height - 3;
        for dy in 0..4 {
            let radius: i32 = if dy == 0 || dy == 3 { 1 } else { 2 };
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    if dx == 0 && dz == 0 && dy < 3 {
                        continue;
                    }
                    if dx.abs() == radius && dz.abs() == radius && sequence.next_below(2) == 0 {
                        continue;
                    }
                    let nx = lx + dx;
                    let ny = leaf_start + dy;
                    let nz = lz + dz;
                    if nx >= 0
                        && nx < CHUNK_SIZE
                        && nz >= 0
                        && nz < CHUNK_SIZE
                        && self.get_block(nx, ny, nz) == BlockType::Air
                    {
                        self.place_block(nx, ny, nz, leaves);
                    }
                }
            }
        }
    }

    /// Clears cave cells inside the carve band. Only stone and dirt are
    /// carved, and never directly under a water block, so liquids stay
    /// supported. Writes bypass the heightmap on purpose: the cached height
    /// is an upper bound.
    fn carve_caves(&mut self, generator: &TerrainGenerator, base_x: i32, base_z: i32) {
        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                for y in CAVE_MIN_Y..CAVE_MAX_Y {
                    if !generator.is_cave(base_x + lx, y, base_z + lz) {
                        continue;
                    }
                    let current = self.get_block(lx, y, lz);
                    if current != BlockType::Stone && current != BlockType::Dirt {
                        continue;
                    }
                    if y < SEA_LEVEL && self.get_block(lx, y + 1, lz) == BlockType::Water {
                        continue;
                    }
                    self.blocks[Self::index(lx, y, lz)] = BlockType::Air;
                }
            }
        }
    }

    /// Ore veins: per ore type a fixed number of attempts seed a vein origin
    /// inside the ore's Y-band, then a bounded random walk replaces stone
    /// cells along its path.
    fn place_ores(&mut self, generator: &TerrainGenerator, base_x: i32, base_z: i32) {
        for (ore_index, ore) in ORE_TABLE.iter().enumerate() {
            for attempt in 0..ore.attempts {
                let mut sequence = generator.placement_sequence(
                    base_x.wrapping_add(ore_index as i32),
                    attempt as i32,
                    base_z,
                );
                let mut x = sequence.next_below(CHUNK_SIZE as u32) as i32;
                let mut y = sequence.next_below(ore.max_y as u32) as i32;
                let mut z = sequence.next_below(CHUNK_SIZE as u32) as i32;
                let size = 1 + sequence.next_below(ore.max_size);

                for _ in 0..size {
                    if self.get_block(x, y, z) == BlockType::Stone {
                        self.place_block(x, y, z, ore.block);
                    }
                    x += sequence.next_step();
                    y += sequence.next_step();
                    z += sequence.next_step();
                }
            }
        }
    }
}

/// Strata rule for one cell, in priority order: bedrock band, water fill
/// between terrain and sea level, stone body, 4-deep biome cap, surface.
fn terrain_block(
    generator: &TerrainGenerator,
    biome: Biome,
    y: i32,
    height: i32,
    world_x: i32,
    world_z: i32,
) -> BlockType {
    if generator.is_bedrock(world_x, y, world_z) {
        return BlockType::Bedrock;
    }
    if y < SEA_LEVEL && y > height {
        return BlockType::Water;
    }
    if y < height - 4 {
        return BlockType::Stone;
    }
    if y < height {
        return biome.subsurface_block();
    }
    if y == height {
        if height < SEA_LEVEL {
            return BlockType::Sand;
        }
        return biome.surface_block();
    }
    BlockType::Air
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generator::WorldType;

    #[test]
    fn test_out_of_range_reads_are_air() {
        let chunk = Chunk::new(0, 0);
        assert_eq!(chunk.get_block(-1, 10, 0), BlockType::Air);
        assert_eq!(chunk.get_block(0, -1, 0), BlockType::Air);
        assert_eq!(chunk.get_block(0, WORLD_HEIGHT, 0), BlockType::Air);
        assert_eq!(chunk.get_block(CHUNK_SIZE, 0, 0), BlockType::Air);
    }

    #[test]
    fn test_out_of_range_writes_are_dropped() {
        let mut chunk = Chunk::new(0, 0);
        chunk.set_block(-1, 10, 0, BlockType::Stone);
        chunk.set_block(0, WORLD_HEIGHT, 0, BlockType::Stone);
        chunk.set_block(CHUNK_SIZE, 10, CHUNK_SIZE, BlockType::Stone);
        assert!(chunk.blocks().iter().all(|b| *b == BlockType::Air));
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut chunk = Chunk::new(0, 0);
        chunk.set_block(5, 70, 9, BlockType::Cobblestone);
        assert_eq!(chunk.get_block(5, 70, 9), BlockType::Cobblestone);
        assert_eq!(chunk.get_block(5, 71, 9), BlockType::Air);
    }

    #[test]
    fn test_set_block_marks_flags() {
        let mut chunk = Chunk::new(0, 0);
        chunk.needs_remesh = false;
        chunk.set_block(1, 1, 1, BlockType::Stone);
        assert!(chunk.needs_remesh);
        assert!(chunk.modified);
    }

    #[test]
    fn test_mark_dirty_is_idempotent() {
        let mut chunk = Chunk::new(0, 0);
        chunk.needs_remesh = false;
        chunk.mark_dirty();
        chunk.mark_dirty();
        chunk.mark_dirty();
        assert!(chunk.needs_remesh);
    }

    #[test]
    fn test_heightmap_raises_and_never_shrinks() {
        let mut chunk = Chunk::new(0, 0);
        chunk.set_block(5, 65, 5, BlockType::Stone);
        assert_eq!(chunk.height_at_column(5, 5), 65);

        chunk.set_block(5, 70, 5, BlockType::Stone);
        assert_eq!(chunk.height_at_column(5, 5), 70);

        // Digging the block back out leaves the cached height in place.
        chunk.set_block(5, 70, 5, BlockType::Air);
        assert_eq!(chunk.height_at_column(5, 5), 70);

        // Placing below the cached height does not lower it either.
        chunk.set_block(5, 40, 5, BlockType::Stone);
        assert_eq!(chunk.height_at_column(5, 5), 70);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut a = Chunk::new(3, -2);
        let mut b = Chunk::new(3, -2);
        a.generate(&generator);
        b.generate(&generator);
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn test_generate_leaves_modified_clear() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut chunk = Chunk::new(0, 0);
        chunk.generate(&generator);
        assert!(chunk.needs_remesh);
        assert!(!chunk.modified);
    }

    #[test]
    fn test_generate_bedrock_floor() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut chunk = Chunk::new(0, 0);
        chunk.generate(&generator);
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                assert_eq!(chunk.get_block(x, 0, z), BlockType::Bedrock);
            }
        }
    }

    #[test]
    fn test_generate_flat_world_strata() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Flat);
        let mut chunk = Chunk::new(1, 1);
        chunk.generate(&generator);
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let biome = generator.biome_at(CHUNK_SIZE + x, CHUNK_SIZE + z);
                assert_eq!(chunk.get_block(x, 64, z), biome.surface_block());
                assert_eq!(chunk.get_block(x, 62, z), biome.subsurface_block());
            }
        }
    }

    #[test]
    fn test_no_air_directly_under_water_in_cave_band() {
        let generator = TerrainGenerator::from_seed_str("oceans", WorldType::Default);
        for cx in -2..2 {
            let mut chunk = Chunk::new(cx, 0);
            chunk.generate(&generator);
            for x in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    for y in CAVE_MIN_Y..CAVE_MAX_Y {
                        let here = chunk.get_block(x, y, z);
                        let above = chunk.get_block(x, y + 1, z);
                        assert!(
                            !(here == BlockType::Air && above == BlockType::Water),
                            "floating water at ({}, {}, {}) in chunk {}",
                            x,
                            y,
                            z,
                            cx
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_generate_heightmap_matches_terrain() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut chunk = Chunk::new(0, 0);
        chunk.generate(&generator);
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let height = chunk.height_at_column(x, z);
                // The cached height is an upper bound on occupied cells.
                for y in (height + 1)..WORLD_HEIGHT {
                    let block = chunk.get_block(x, y, z);
                    assert!(
                        block == BlockType::Air || block == BlockType::Water,
                        "solid block above cached height at ({}, {}, {})",
                        x,
                        y,
                        z
                    );
                }
            }
        }
    }

    #[test]
    fn test_from_saved_roundtrip() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut original = Chunk::new(2, 2);
        original.generate(&generator);
        original.set_block(4, 80, 4, BlockType::Glass);

        let restored = Chunk::from_saved(2, 2, original.blocks().to_vec());
        assert_eq!(restored.blocks(), original.blocks());
        assert!(restored.modified);
        assert!(restored.needs_remesh);
        assert!(restored.height_at_column(4, 4) >= 80);
    }
}
