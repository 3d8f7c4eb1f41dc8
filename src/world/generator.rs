//! Seeded terrain queries using FastNoiseLite
//!
//! Every function here is a pure function of (seed, coordinates), so chunks
//! regenerate bit-identically after an evict/reload cycle regardless of the
//! order queries are made in.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::biome::Biome;
use crate::core::block::BlockType;

/// Terrain shape preset, branch point for `height_at`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldType {
    #[default]
    Default,
    Flat,
    Amplified,
}

impl WorldType {
    /// Parses a config/CLI name. Unknown names fall back to the default
    /// preset so generation stays total.
    pub fn from_name(name: &str) -> WorldType {
        match name {
            "default" => WorldType::Default,
            "flat" => WorldType::Flat,
            "amplified" => WorldType::Amplified,
            other => {
                tracing::warn!("unknown world type '{}', using default", other);
                WorldType::Default
            }
        }
    }
}

/// One row of the ore placement table: per-chunk attempt count, vein walk
/// length bound, and the Y-band ceiling the vein may start under.
pub struct OreVein {
    pub block: BlockType,
    pub max_y: i32,
    pub max_size: u32,
    pub attempts: u32,
}

pub const ORE_TABLE: &[OreVein] = &[
    OreVein {
        block: BlockType::CoalOre,
        max_y: 128,
        max_size: 17,
        attempts: 20,
    },
    OreVein {
        block: BlockType::IronOre,
        max_y: 64,
        max_size: 9,
        attempts: 20,
    },
    OreVein {
        block: BlockType::GoldOre,
        max_y: 32,
        max_size: 9,
        attempts: 2,
    },
    OreVein {
        block: BlockType::DiamondOre,
        max_y: 16,
        max_size: 8,
        attempts: 1,
    },
    OreVein {
        block: BlockType::RedstoneOre,
        max_y: 16,
        max_size: 8,
        attempts: 8,
    },
    OreVein {
        block: BlockType::LapisOre,
        max_y: 32,
        max_size: 7,
        attempts: 2,
    },
];

/// Deterministic value sequence for placement decisions that need several
/// draws per site (vein walks, trunk heights, cactus columns). Seeded from
/// the world seed and site coordinates, never from call order.
pub struct HashSequence {
    state: u32,
}

impl HashSequence {
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn next_below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound.max(1)
    }

    /// Signed offset in -1..=1, the step unit of vein walks.
    pub fn next_step(&mut self) -> i32 {
        self.next_below(3) as i32 - 1
    }
}

/// Pre-configured FastNoiseLite instances derived from the world seed.
pub struct TerrainGenerator {
    noise_elevation: FastNoiseLite,
    noise_mountains: FastNoiseLite,
    noise_rivers: FastNoiseLite,
    noise_temperature: FastNoiseLite,
    noise_humidity: FastNoiseLite,
    noise_cave1: FastNoiseLite,
    noise_cave2: FastNoiseLite,
    world_type: WorldType,
    pub seed: u32,
}

impl TerrainGenerator {
    pub fn new(seed: u32, world_type: WorldType) -> Self {
        TerrainGenerator {
            noise_elevation: Self::create_fbm_noise(seed, 0.01, 4, 0.5),
            noise_mountains: Self::create_fbm_noise(seed.wrapping_add(1), 0.005, 3, 0.6),
            noise_rivers: Self::create_fbm_noise(seed.wrapping_add(2), 0.02, 2, 0.5),
            noise_temperature: Self::create_fbm_noise(seed.wrapping_add(3), 0.005, 2, 0.5),
            noise_humidity: Self::create_fbm_noise(seed.wrapping_add(4), 0.007, 2, 0.5),
            noise_cave1: Self::create_3d_noise(seed.wrapping_add(5), 0.05),
            noise_cave2: Self::create_3d_noise(seed.wrapping_add(6), 0.05),
            world_type,
            seed,
        }
    }

    /// Builds from a textual seed: numeric strings are taken verbatim,
    /// anything else is folded through a 31-multiply rolling hash.
    pub fn from_seed_str(seed: &str, world_type: WorldType) -> Self {
        Self::new(Self::seed_from(seed), world_type)
    }

    pub fn seed_from(seed: &str) -> u32 {
        if let Ok(numeric) = seed.parse::<u32>() {
            return numeric;
        }
        let mut hash: i32 = 0;
        for ch in seed.chars() {
            hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(ch as i32);
        }
        hash.unsigned_abs()
    }

    pub fn world_type(&self) -> WorldType {
        self.world_type
    }

    fn create_fbm_noise(seed: u32, frequency: f32, octaves: i32, gain: f32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(octaves));
        noise.set_fractal_lacunarity(Some(2.0));
        noise.set_fractal_gain(Some(gain));
        noise.set_frequency(Some(frequency));
        noise
    }

    fn create_3d_noise(seed: u32, frequency: f32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(frequency));
        noise
    }

    /// Maps a noise sample from [-1,1] into [0,1] so thresholds read as
    /// probabilities.
    fn normalized_2d(noise: &FastNoiseLite, x: i32, z: i32) -> f32 {
        (noise.get_noise_2d(x as f32, z as f32) + 1.0) * 0.5
    }

    /// Terrain height for a world column. Base elevation plus mountain
    /// uplift, with river valleys clamping the result downward; the
    /// `Amplified` preset doubles the deviation from sea-band height 64.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        if self.world_type == WorldType::Flat {
            return 64;
        }

        let mut height = Self::normalized_2d(&self.noise_elevation, x, z) * 30.0 + 60.0;

        let mountain = Self::normalized_2d(&self.noise_mountains, x, z);
        if mountain > 0.6 {
            height += (mountain - 0.6) * 100.0;
        }

        let river = (Self::normalized_2d(&self.noise_rivers, x, z) - 0.5).abs();
        if river < 0.05 {
            height = height.min(60.0 - (0.05 - river) * 200.0);
        }

        if self.world_type == WorldType::Amplified {
            height = 64.0 + (height - 64.0) * 2.0;
        }

        height.floor() as i32
    }

    pub fn biome_at(&self, x: i32, z: i32) -> Biome {
        let temperature = Self::normalized_2d(&self.noise_temperature, x, z);
        let humidity = Self::normalized_2d(&self.noise_humidity, x, z);
        Biome::classify(temperature, humidity)
    }

    /// Cave field test. True when the averaged pair of 3D fields exceeds the
    /// carve threshold inside the cave Y-band; the caller still applies the
    /// block-level carve rules (stone/dirt only, no carving under water).
    pub fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        if y < CAVE_MIN_Y || y >= CAVE_MAX_Y {
            return false;
        }
        let fx = x as f32;
        let fy = y as f32;
        let fz = z as f32;
        let cave1 = (self.noise_cave1.get_noise_3d(fx, fy, fz) + 1.0) * 0.5;
        let cave2 = (self.noise_cave2.get_noise_3d(fx, fy, fz) + 1.0) * 0.5;
        (cave1 + cave2) * 0.5 > CAVE_THRESHOLD
    }

    /// Noisy bedrock band: y=0 is always bedrock, y 1..=4 with probability
    /// (5-y)/5 by position hash.
    pub fn is_bedrock(&self, x: i32, y: i32, z: i32) -> bool {
        if y == 0 {
            return true;
        }
        if y <= BEDROCK_NOISE_BAND {
            let chance = (BEDROCK_NOISE_BAND + 1 - y) as u32 * 20;
            return self.position_hash_3d(x, y, z) % 100 < chance;
        }
        false
    }

    /// Per-column feature roll in [0,1). One value drives all the feature
    /// thresholds for the column, mirroring how tree/flower/grass bands
    /// partition a single roll.
    pub fn feature_rand(&self, x: i32, z: i32) -> f32 {
        (self.position_hash(x.wrapping_mul(31), z.wrapping_mul(17)) >> 8) as f32
            / (1u32 << 24) as f32
    }

    pub fn placement_sequence(&self, x: i32, y: i32, z: i32) -> HashSequence {
        HashSequence {
            state: self.position_hash_3d(x, y, z) | 1,
        }
    }

    pub(crate) fn position_hash(&self, x: i32, z: i32) -> u32 {
        let mut hash = self.seed;
        hash = hash.wrapping_add(x as u32).wrapping_mul(73856093);
        hash = hash.wrapping_add(z as u32).wrapping_mul(19349663);
        hash ^ (hash >> 16)
    }

    pub(crate) fn position_hash_3d(&self, x: i32, y: i32, z: i32) -> u32 {
        let mut hash = self.seed;
        hash = hash.wrapping_add(x as u32).wrapping_mul(73856093);
        hash = hash.wrapping_add(y as u32).wrapping_mul(19349663);
        hash = hash.wrapping_add(z as u32).wrapping_mul(83492791);
        hash ^ (hash >> 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_is_deterministic() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let other = TerrainGenerator::from_seed_str("test", WorldType::Default);
        for x in -40..40 {
            for z in -40..40 {
                assert_eq!(generator.height_at(x, z), generator.height_at(x, z));
                assert_eq!(generator.height_at(x, z), other.height_at(x, z));
            }
        }
    }

    #[test]
    fn test_biome_is_deterministic() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let other = TerrainGenerator::from_seed_str("test", WorldType::Default);
        for x in (-200..200).step_by(13) {
            for z in (-200..200).step_by(13) {
                assert_eq!(generator.biome_at(x, z), other.biome_at(x, z));
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = TerrainGenerator::new(1, WorldType::Default);
        let b = TerrainGenerator::new(2, WorldType::Default);
        let mut any_difference = false;
        for x in 0..64 {
            for z in 0..64 {
                if a.height_at(x, z) != b.height_at(x, z) {
                    any_difference = true;
                }
            }
        }
        assert!(any_difference);
    }

    #[test]
    fn test_flat_world_is_flat() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Flat);
        for x in -32..32 {
            assert_eq!(generator.height_at(x, x * 3), 64);
        }
    }

    #[test]
    fn test_amplified_doubles_deviation() {
        let normal = TerrainGenerator::new(77, WorldType::Default);
        let amplified = TerrainGenerator::new(77, WorldType::Amplified);
        for x in -16..16 {
            for z in -16..16 {
                let h = normal.height_at(x, z);
                assert_eq!(amplified.height_at(x, z), 64 + (h - 64) * 2);
            }
        }
    }

    #[test]
    fn test_seed_from_parses_numeric() {
        assert_eq!(TerrainGenerator::seed_from("42"), 42);
        assert_eq!(TerrainGenerator::seed_from("0"), 0);
    }

    #[test]
    fn test_seed_from_hashes_text() {
        // 31-multiply rolling hash of "test".
        assert_eq!(TerrainGenerator::seed_from("test"), 3_556_498);
        assert_eq!(
            TerrainGenerator::seed_from("test"),
            TerrainGenerator::seed_from("test")
        );
        assert_ne!(
            TerrainGenerator::seed_from("test"),
            TerrainGenerator::seed_from("test2")
        );
    }

    #[test]
    fn test_cave_band_limits() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        for x in 0..32 {
            for z in 0..32 {
                assert!(!generator.is_cave(x, CAVE_MIN_Y - 1, z));
                assert!(!generator.is_cave(x, CAVE_MAX_Y, z));
            }
        }
    }

    #[test]
    fn test_bedrock_floor_is_solid() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        for x in -16..16 {
            assert!(generator.is_bedrock(x, 0, -x));
            assert!(!generator.is_bedrock(x, BEDROCK_NOISE_BAND + 1, -x));
        }
    }

    #[test]
    fn test_placement_sequence_is_reproducible() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut a = generator.placement_sequence(10, 20, 30);
        let mut b = generator.placement_sequence(10, 20, 30);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let mut probe = generator.placement_sequence(1, 2, 3);
        for _ in 0..64 {
            let step = probe.next_step();
            assert!((-1..=1).contains(&step));
        }
    }

    #[test]
    fn test_world_type_from_name_falls_back() {
        assert_eq!(WorldType::from_name("flat"), WorldType::Flat);
        assert_eq!(WorldType::from_name("amplified"), WorldType::Amplified);
        assert_eq!(WorldType::from_name("builder"), WorldType::Default);
    }
}
