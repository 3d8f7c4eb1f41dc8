use glam::Vec3;
use rand::RngExt;
use rustc_hash::FxHashMap;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::Chunk;
use crate::world::generator::TerrainGenerator;

/// Global weather state, rolled from a weighted pool on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Thunder,
}

const WEATHER_POOL: [Weather; 6] = [
    Weather::Clear,
    Weather::Clear,
    Weather::Clear,
    Weather::Rain,
    Weather::Rain,
    Weather::Thunder,
];

/// Owns every loaded chunk plus the world clock and weather. Block access in
/// world coordinates resolves through the chunk registry; reads outside the
/// loaded set fall back to air and writes there are dropped.
pub struct World {
    pub chunks: FxHashMap<(i32, i32), Chunk>,
    pub generator: TerrainGenerator,
    time: f32,
    day_length_secs: f32,
    weather: Weather,
    weather_timer: f32,
}

impl World {
    pub fn new(generator: TerrainGenerator) -> Self {
        World {
            chunks: FxHashMap::default(),
            generator,
            time: INITIAL_TIME,
            day_length_secs: DEFAULT_DAY_LENGTH_SECS,
            weather: Weather::Clear,
            weather_timer: WEATHER_MIN_SECS,
        }
    }

    pub fn with_day_length(generator: TerrainGenerator, day_length_secs: f32) -> Self {
        let mut world = Self::new(generator);
        world.day_length_secs = day_length_secs.max(1.0);
        world
    }

    pub fn seed(&self) -> u32 {
        self.generator.seed
    }

    /// Splits a world coordinate into (chunk, local) on one axis.
    pub fn split_coord(v: i32) -> (i32, i32) {
        (v.div_euclid(CHUNK_SIZE), v.rem_euclid(CHUNK_SIZE))
    }

    pub fn add_chunk(&mut self, chunk: Chunk) {
        self.chunks.insert((chunk.cx, chunk.cz), chunk);
    }

    pub fn remove_chunk(&mut self, cx: i32, cz: i32) -> Option<Chunk> {
        self.chunks.remove(&(cx, cz))
    }

    pub fn get_chunk(&self, cx: i32, cz: i32) -> Option<&Chunk> {
        self.chunks.get(&(cx, cz))
    }

    pub fn get_chunk_mut(&mut self, cx: i32, cz: i32) -> Option<&mut Chunk> {
        self.chunks.get_mut(&(cx, cz))
    }

    pub fn has_chunk(&self, cx: i32, cz: i32) -> bool {
        self.chunks.contains_key(&(cx, cz))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if y < 0 || y >= WORLD_HEIGHT {
            return BlockType::Air;
        }
        let (cx, lx) = Self::split_coord(x);
        let (cz, lz) = Self::split_coord(z);

        if let Some(chunk) = self.chunks.get(&(cx, cz)) {
            chunk.get_block(lx, y, lz)
        } else {
            BlockType::Air
        }
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if y < 0 || y >= WORLD_HEIGHT {
            return;
        }
        let (cx, lx) = Self::split_coord(x);
        let (cz, lz) = Self::split_coord(z);

        if let Some(chunk) = self.chunks.get_mut(&(cx, cz)) {
            chunk.set_block(lx, y, lz, block);
        }
    }

    /// Cached column height when the chunk is loaded, generator terrain
    /// height otherwise.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let (cx, lx) = Self::split_coord(x);
        let (cz, lz) = Self::split_coord(z);

        if let Some(chunk) = self.chunks.get(&(cx, cz)) {
            chunk.height_at_column(lx, lz)
        } else {
            self.generator.height_at(x, z)
        }
    }

    pub fn is_liquid_at(&self, x: i32, y: i32, z: i32) -> bool {
        matches!(
            self.get_block(x, y, z),
            BlockType::Water | BlockType::Lava
        )
    }

    pub fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_solid()
    }

    /// World clock in ticks, 0..24000.
    pub fn time_of_day(&self) -> f32 {
        self.time
    }

    pub fn set_time_of_day(&mut self, ticks: f32) {
        self.time = ticks.rem_euclid(DAY_TICKS);
    }

    pub fn is_daytime(&self) -> bool {
        self.time < NIGHT_START_TICK
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    /// Advances the clock and the weather timer by `dt` seconds of real time.
    pub fn update(&mut self, dt: f32) {
        self.time = (self.time + dt * (DAY_TICKS / self.day_length_secs)).rem_euclid(DAY_TICKS);

        self.weather_timer -= dt;
        if self.weather_timer <= 0.0 {
            self.roll_weather();
        }
    }

    fn roll_weather(&mut self) {
        let mut rng = rand::rng();
        let next = WEATHER_POOL[rng.random_range(0..WEATHER_POOL.len())];
        if next != self.weather {
            tracing::debug!("Weather changed: {:?} -> {:?}", self.weather, next);
        }
        self.weather = next;
        self.weather_timer = rng.random_range(WEATHER_MIN_SECS..WEATHER_MAX_SECS);
    }

    /// Searches outward from the origin for a dry column and returns a
    /// standing position just above its surface.
    pub fn spawn_position(&self) -> Vec3 {
        for radius in 0..50i32 {
            for dx in -radius..=radius {
                for dz in -radius..=radius {
                    if dx.abs() != radius && dz.abs() != radius {
                        continue;
                    }
                    let height = self.generator.height_at(dx, dz);
                    if height >= SEA_LEVEL {
                        return Vec3::new(dx as f32 + 0.5, (height + 2) as f32, dz as f32 + 0.5);
                    }
                }
            }
        }
        Vec3::new(0.5, 80.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generator::WorldType;

    fn test_world() -> World {
        World::new(TerrainGenerator::from_seed_str("test", WorldType::Default))
    }

    #[test]
    fn test_split_coord_negative_axis() {
        assert_eq!(World::split_coord(0), (0, 0));
        assert_eq!(World::split_coord(15), (0, 15));
        assert_eq!(World::split_coord(16), (1, 0));
        assert_eq!(World::split_coord(-1), (-1, 15));
        assert_eq!(World::split_coord(-16), (-1, 0));
        assert_eq!(World::split_coord(-17), (-2, 15));
    }

    #[test]
    fn test_unloaded_reads_are_air() {
        let world = test_world();
        assert_eq!(world.get_block(100, 64, 100), BlockType::Air);
    }

    #[test]
    fn test_out_of_range_y_is_air() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let mut chunk = Chunk::new(0, 0);
        chunk.generate(&generator);

        let mut world = World::new(generator);
        world.add_chunk(chunk);
        assert_eq!(world.get_block(4, -1, 4), BlockType::Air);
        assert_eq!(world.get_block(4, WORLD_HEIGHT, 4), BlockType::Air);
    }

    #[test]
    fn test_unloaded_writes_are_dropped() {
        let mut world = test_world();
        world.set_block(100, 64, 100, BlockType::Stone);
        assert_eq!(world.chunk_count(), 0);
        assert_eq!(world.get_block(100, 64, 100), BlockType::Air);
    }

    #[test]
    fn test_block_edit_crosses_chunk_addressing() {
        let mut world = test_world();
        world.add_chunk(Chunk::new(-1, -1));
        world.set_block(-1, 70, -1, BlockType::Glass);
        assert_eq!(world.get_block(-1, 70, -1), BlockType::Glass);

        let chunk = world.get_chunk(-1, -1).unwrap();
        assert_eq!(chunk.get_block(15, 70, 15), BlockType::Glass);
        assert!(chunk.modified);
    }

    #[test]
    fn test_clock_wraps_at_day_length() {
        let mut world = test_world();
        world.set_time_of_day(23_900.0);
        // One second at the default day length is 20 ticks.
        world.update(10.0);
        assert!(world.time_of_day() < 200.0);
    }

    #[test]
    fn test_daytime_window() {
        let mut world = test_world();
        world.set_time_of_day(6_000.0);
        assert!(world.is_daytime());
        world.set_time_of_day(12_999.0);
        assert!(world.is_daytime());
        world.set_time_of_day(13_000.0);
        assert!(!world.is_daytime());
        world.set_time_of_day(23_000.0);
        assert!(!world.is_daytime());
    }

    #[test]
    fn test_surface_height_prefers_loaded_chunk() {
        let generator = TerrainGenerator::from_seed_str("test", WorldType::Default);
        let generated = generator.height_at(4, 4);

        let mut chunk = Chunk::new(0, 0);
        chunk.generate(&generator);
        chunk.set_block(4, 200, 4, BlockType::Stone);

        let mut world = World::new(generator);
        world.add_chunk(chunk);

        assert_eq!(world.surface_height(4, 4), 200);
        // Unloaded columns fall back to the generator.
        assert_eq!(
            world.surface_height(1000, 1000),
            world.generator.height_at(1000, 1000)
        );
        assert!(generated < 200);
    }

    #[test]
    fn test_spawn_position_above_sea_level() {
        let world = test_world();
        let spawn = world.spawn_position();
        assert!(spawn.y >= (SEA_LEVEL + 1) as f32);
    }
}
