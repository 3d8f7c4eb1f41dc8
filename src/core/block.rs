use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Block type ids. Discriminants are the on-disk ids used by the RLE
/// interchange format and must never be reassigned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Stone = 1,
    Dirt = 2,
    Grass = 3,
    Sand = 4,
    Gravel = 5,
    Bedrock = 6,
    Water = 7,
    OakLog = 8,
    OakLeaves = 9,
    SpruceLog = 10,
    SpruceLeaves = 11,
    Cactus = 12,
    Snow = 13,
    TallGrass = 14,
    RedFlower = 15,
    YellowFlower = 16,
    CoalOre = 17,
    IronOre = 18,
    GoldOre = 19,
    DiamondOre = 20,
    RedstoneOre = 21,
    LapisOre = 22,
    Glass = 23,
    Cobblestone = 24,
    Planks = 25,
    Lava = 26,
}

pub const BLOCK_TYPE_COUNT: usize = 27;

impl BlockType {
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Inverse of `id`. Unknown ids (future formats, corrupt saves) yield None.
    pub fn from_id(id: u8) -> Option<BlockType> {
        match id {
            0 => Some(BlockType::Air),
            1 => Some(BlockType::Stone),
            2 => Some(BlockType::Dirt),
            3 => Some(BlockType::Grass),
            4 => Some(BlockType::Sand),
            5 => Some(BlockType::Gravel),
            6 => Some(BlockType::Bedrock),
            7 => Some(BlockType::Water),
            8 => Some(BlockType::OakLog),
            9 => Some(BlockType::OakLeaves),
            10 => Some(BlockType::SpruceLog),
            11 => Some(BlockType::SpruceLeaves),
            12 => Some(BlockType::Cactus),
            13 => Some(BlockType::Snow),
            14 => Some(BlockType::TallGrass),
            15 => Some(BlockType::RedFlower),
            16 => Some(BlockType::YellowFlower),
            17 => Some(BlockType::CoalOre),
            18 => Some(BlockType::IronOre),
            19 => Some(BlockType::GoldOre),
            20 => Some(BlockType::DiamondOre),
            21 => Some(BlockType::RedstoneOre),
            22 => Some(BlockType::LapisOre),
            23 => Some(BlockType::Glass),
            24 => Some(BlockType::Cobblestone),
            25 => Some(BlockType::Planks),
            26 => Some(BlockType::Lava),
            _ => None,
        }
    }

    pub fn is_solid(&self) -> bool {
        !matches!(
            self,
            BlockType::Air
                | BlockType::Water
                | BlockType::Lava
                | BlockType::TallGrass
                | BlockType::RedFlower
                | BlockType::YellowFlower
        )
    }

    pub fn is_transparent(&self) -> bool {
        matches!(
            self,
            BlockType::Air
                | BlockType::Water
                | BlockType::OakLeaves
                | BlockType::SpruceLeaves
                | BlockType::Glass
                | BlockType::TallGrass
                | BlockType::RedFlower
                | BlockType::YellowFlower
        )
    }

    pub fn is_liquid(&self) -> bool {
        matches!(self, BlockType::Water | BlockType::Lava)
    }

    pub fn is_solid_opaque(&self) -> bool {
        !self.is_transparent() && *self != BlockType::Air
    }

    /// Face-culling rule: should a face of `self` be emitted when `neighbor`
    /// occupies the adjacent cell? Opaque neighbors occlude; transparent
    /// neighbors of the same type suppress internal faces (water-in-water).
    pub fn should_render_face_against(&self, neighbor: BlockType) -> bool {
        if neighbor == BlockType::Air {
            return true;
        }
        if self.is_transparent() && neighbor == *self {
            return false;
        }
        !neighbor.is_solid_opaque()
    }

    pub fn color(&self) -> [f32; 3] {
        match self {
            BlockType::Air => [0.0, 0.0, 0.0],
            BlockType::Stone => [0.55, 0.55, 0.55],
            BlockType::Dirt => [0.52, 0.37, 0.26],
            BlockType::Grass => [0.45, 0.32, 0.22],
            BlockType::Sand => [0.89, 0.83, 0.61],
            BlockType::Gravel => [0.5, 0.5, 0.52],
            BlockType::Bedrock => [0.2, 0.2, 0.2],
            BlockType::Water => [0.25, 0.46, 0.82],
            BlockType::OakLog => [0.6, 0.4, 0.2],
            BlockType::OakLeaves => [0.3, 0.6, 0.2],
            BlockType::SpruceLog => [0.45, 0.3, 0.16],
            BlockType::SpruceLeaves => [0.2, 0.42, 0.22],
            BlockType::Cactus => [0.2, 0.55, 0.2],
            BlockType::Snow => [0.95, 0.95, 0.98],
            BlockType::TallGrass => [0.4, 0.65, 0.25],
            BlockType::RedFlower => [0.8, 0.2, 0.2],
            BlockType::YellowFlower => [0.85, 0.8, 0.25],
            BlockType::CoalOre => [0.45, 0.45, 0.45],
            BlockType::IronOre => [0.65, 0.55, 0.48],
            BlockType::GoldOre => [0.75, 0.65, 0.35],
            BlockType::DiamondOre => [0.55, 0.75, 0.75],
            BlockType::RedstoneOre => [0.65, 0.35, 0.35],
            BlockType::LapisOre => [0.35, 0.42, 0.68],
            BlockType::Glass => [0.85, 0.9, 0.95],
            BlockType::Cobblestone => [0.48, 0.48, 0.48],
            BlockType::Planks => [0.7, 0.55, 0.33],
            BlockType::Lava => [0.9, 0.45, 0.1],
        }
    }

    pub fn top_color(&self) -> [f32; 3] {
        match self {
            BlockType::Grass => [0.36, 0.7, 0.28],
            _ => self.color(),
        }
    }

    pub fn bottom_color(&self) -> [f32; 3] {
        match self {
            BlockType::Grass => [0.52, 0.37, 0.26],
            _ => self.color(),
        }
    }

    /// Seconds to break by hand; consumed by the physics/interaction layer.
    pub fn break_time(&self) -> f32 {
        match self {
            BlockType::Air | BlockType::Water | BlockType::Lava => 0.0,
            BlockType::Stone | BlockType::Cobblestone => 1.5,
            BlockType::Dirt | BlockType::Sand => 0.5,
            BlockType::Grass | BlockType::Gravel => 0.6,
            BlockType::Bedrock => f32::INFINITY,
            BlockType::OakLog | BlockType::SpruceLog | BlockType::Planks => 2.0,
            BlockType::OakLeaves | BlockType::SpruceLeaves | BlockType::Snow => 0.2,
            BlockType::Cactus => 0.4,
            BlockType::TallGrass | BlockType::RedFlower | BlockType::YellowFlower => 0.0,
            BlockType::CoalOre | BlockType::IronOre => 3.0,
            BlockType::GoldOre | BlockType::RedstoneOre | BlockType::LapisOre => 3.0,
            BlockType::DiamondOre => 3.75,
            BlockType::Glass => 0.3,
        }
    }
}

/// One of the six axis-aligned cube faces.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Face {
    Top,
    Bottom,
    North,
    South,
    East,
    West,
}

impl Face {
    pub fn index(&self) -> usize {
        match self {
            Face::Top => 0,
            Face::Bottom => 1,
            Face::North => 2,
            Face::South => 3,
            Face::East => 4,
            Face::West => 5,
        }
    }
}

/// How a block maps its faces onto atlas layers. Closed set: resolution
/// happens once at registry build, so mesh-time lookup is array indexing.
#[derive(Clone, Copy, Debug)]
pub enum FaceTextures {
    Uniform(u16),
    TopBottomSide { top: u16, bottom: u16, side: u16 },
    PerFace([u16; 6]),
}

impl FaceTextures {
    fn resolve(&self) -> [u16; 6] {
        match *self {
            FaceTextures::Uniform(tex) => [tex; 6],
            FaceTextures::TopBottomSide { top, bottom, side } => {
                [top, bottom, side, side, side, side]
            }
            FaceTextures::PerFace(faces) => faces,
        }
    }
}

/// Per-block-id face texture table, built once at startup and shared with the
/// mesher by reference. Blocks without an entry get their faces skipped (and
/// logged) rather than aborting a mesh build.
pub struct BlockRegistry {
    faces: [Option<[u16; 6]>; BLOCK_TYPE_COUNT],
}

impl BlockRegistry {
    pub fn empty() -> Self {
        Self {
            faces: [None; BLOCK_TYPE_COUNT],
        }
    }

    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(BlockType::Stone, FaceTextures::Uniform(TEX_STONE));
        registry.register(BlockType::Dirt, FaceTextures::Uniform(TEX_DIRT));
        registry.register(
            BlockType::Grass,
            FaceTextures::TopBottomSide {
                top: TEX_GRASS_TOP,
                bottom: TEX_DIRT,
                side: TEX_GRASS_SIDE,
            },
        );
        registry.register(BlockType::Sand, FaceTextures::Uniform(TEX_SAND));
        registry.register(BlockType::Gravel, FaceTextures::Uniform(TEX_GRAVEL));
        registry.register(BlockType::Bedrock, FaceTextures::Uniform(TEX_BEDROCK));
        registry.register(BlockType::Water, FaceTextures::Uniform(TEX_WATER));
        registry.register(
            BlockType::OakLog,
            FaceTextures::TopBottomSide {
                top: TEX_OAK_LOG_TOP,
                bottom: TEX_OAK_LOG_TOP,
                side: TEX_OAK_LOG_SIDE,
            },
        );
        registry.register(BlockType::OakLeaves, FaceTextures::Uniform(TEX_OAK_LEAVES));
        registry.register(
            BlockType::SpruceLog,
            FaceTextures::TopBottomSide {
                top: TEX_SPRUCE_LOG_TOP,
                bottom: TEX_SPRUCE_LOG_TOP,
                side: TEX_SPRUCE_LOG_SIDE,
            },
        );
        registry.register(
            BlockType::SpruceLeaves,
            FaceTextures::Uniform(TEX_SPRUCE_LEAVES),
        );
        registry.register(
            BlockType::Cactus,
            FaceTextures::TopBottomSide {
                top: TEX_CACTUS_TOP,
                bottom: TEX_CACTUS_TOP,
                side: TEX_CACTUS_SIDE,
            },
        );
        registry.register(BlockType::Snow, FaceTextures::Uniform(TEX_SNOW));
        registry.register(BlockType::TallGrass, FaceTextures::Uniform(TEX_TALL_GRASS));
        registry.register(BlockType::RedFlower, FaceTextures::Uniform(TEX_RED_FLOWER));
        registry.register(
            BlockType::YellowFlower,
            FaceTextures::Uniform(TEX_YELLOW_FLOWER),
        );
        registry.register(BlockType::CoalOre, FaceTextures::Uniform(TEX_COAL_ORE));
        registry.register(BlockType::IronOre, FaceTextures::Uniform(TEX_IRON_ORE));
        registry.register(BlockType::GoldOre, FaceTextures::Uniform(TEX_GOLD_ORE));
        registry.register(BlockType::DiamondOre, FaceTextures::Uniform(TEX_DIAMOND_ORE));
        registry.register(
            BlockType::RedstoneOre,
            FaceTextures::Uniform(TEX_REDSTONE_ORE),
        );
        registry.register(BlockType::LapisOre, FaceTextures::Uniform(TEX_LAPIS_ORE));
        registry.register(BlockType::Glass, FaceTextures::Uniform(TEX_GLASS));
        registry.register(
            BlockType::Cobblestone,
            FaceTextures::Uniform(TEX_COBBLESTONE),
        );
        registry.register(BlockType::Planks, FaceTextures::Uniform(TEX_PLANKS));
        registry.register(BlockType::Lava, FaceTextures::Uniform(TEX_LAVA));
        registry
    }

    pub fn register(&mut self, block: BlockType, textures: FaceTextures) {
        self.faces[block.id() as usize] = Some(textures.resolve());
    }

    pub fn face_texture(&self, block: BlockType, face: Face) -> Option<u16> {
        self.faces[block.id() as usize].map(|faces| faces[face.index()])
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
