// World constants
pub const WORLD_HEIGHT: i32 = 256;
pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;
pub const CHUNK_VOLUME: usize = CHUNK_AREA * WORLD_HEIGHT as usize;
pub const SEA_LEVEL: i32 = 63;
pub const BEDROCK_NOISE_BAND: i32 = 4;

// Cave carving band and threshold
pub const CAVE_MIN_Y: i32 = 5;
pub const CAVE_MAX_Y: i32 = 60;
pub const CAVE_THRESHOLD: f32 = 0.7;

// Time of day, in ticks; a full day wraps at DAY_TICKS
pub const DAY_TICKS: f32 = 24000.0;
pub const INITIAL_TIME: f32 = 6000.0;
pub const NIGHT_START_TICK: f32 = 13000.0;
pub const DEFAULT_DAY_LENGTH_SECS: f32 = 1200.0;

// Weather countdown bounds, seconds
pub const WEATHER_MIN_SECS: f32 = 300.0;
pub const WEATHER_MAX_SECS: f32 = 900.0;

// Streaming defaults
pub const DEFAULT_VIEW_RADIUS: i32 = 8;
pub const DEFAULT_INITIAL_RADIUS: i32 = 4;
pub const UNLOAD_HYSTERESIS: i32 = 2;
pub const DEFAULT_TICK_BUDGET_MS: u64 = 8;
pub const DEFAULT_MAX_DIRTY_PER_TICK: usize = 4;

// Layer indexes of block textures in the atlas array
pub const TEX_GRASS_TOP: u16 = 0;
pub const TEX_GRASS_SIDE: u16 = 1;
pub const TEX_DIRT: u16 = 2;
pub const TEX_STONE: u16 = 3;
pub const TEX_SAND: u16 = 4;
pub const TEX_WATER: u16 = 5;
pub const TEX_OAK_LOG_SIDE: u16 = 6;
pub const TEX_OAK_LOG_TOP: u16 = 7;
pub const TEX_OAK_LEAVES: u16 = 8;
pub const TEX_BEDROCK: u16 = 9;
pub const TEX_SNOW: u16 = 10;
pub const TEX_GRAVEL: u16 = 11;
pub const TEX_COBBLESTONE: u16 = 12;
pub const TEX_PLANKS: u16 = 13;
pub const TEX_CACTUS_SIDE: u16 = 14;
pub const TEX_CACTUS_TOP: u16 = 15;
pub const TEX_TALL_GRASS: u16 = 16;
pub const TEX_RED_FLOWER: u16 = 17;
pub const TEX_YELLOW_FLOWER: u16 = 18;
pub const TEX_COAL_ORE: u16 = 19;
pub const TEX_IRON_ORE: u16 = 20;
pub const TEX_GOLD_ORE: u16 = 21;
pub const TEX_DIAMOND_ORE: u16 = 22;
pub const TEX_REDSTONE_ORE: u16 = 23;
pub const TEX_LAPIS_ORE: u16 = 24;
pub const TEX_GLASS: u16 = 25;
pub const TEX_SPRUCE_LOG_SIDE: u16 = 26;
pub const TEX_SPRUCE_LOG_TOP: u16 = 27;
pub const TEX_SPRUCE_LEAVES: u16 = 28;
pub const TEX_LAVA: u16 = 29;
