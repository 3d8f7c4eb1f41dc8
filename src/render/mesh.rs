use crate::constants::*;
use crate::core::block::{BlockRegistry, BlockType, Face};
use crate::core::vertex::Vertex;
use crate::world::world::World;

/// CPU-side geometry for one chunk, split into an opaque and a transparent
/// pass so the backend can draw water and foliage after solid terrain.
#[derive(Default)]
pub struct ChunkMeshData {
    pub opaque_vertices: Vec<Vertex>,
    pub opaque_indices: Vec<u32>,
    pub transparent_vertices: Vec<Vertex>,
    pub transparent_indices: Vec<u32>,
}

impl ChunkMeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque_indices.is_empty() && self.transparent_indices.is_empty()
    }

    pub fn face_count(&self) -> usize {
        (self.opaque_indices.len() + self.transparent_indices.len()) / 6
    }
}

pub fn add_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    v0: [f32; 3],
    v1: [f32; 3],
    v2: [f32; 3],
    v3: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
    tex_index: f32,
) {
    let base_idx = vertices.len() as u32;
    vertices.push(Vertex {
        position: v0,
        normal,
        color,
        uv: [0.0, 1.0],
        tex_index,
    });
    vertices.push(Vertex {
        position: v1,
        normal,
        color,
        uv: [1.0, 1.0],
        tex_index,
    });
    vertices.push(Vertex {
        position: v2,
        normal,
        color,
        uv: [1.0, 0.0],
        tex_index,
    });
    vertices.push(Vertex {
        position: v3,
        normal,
        color,
        uv: [0.0, 0.0],
        tex_index,
    });
    indices.extend_from_slice(&[
        base_idx,
        base_idx + 1,
        base_idx + 2,
        base_idx,
        base_idx + 2,
        base_idx + 3,
    ]);
}

const FACE_NEIGHBORS: [(i32, i32, i32, Face); 6] = [
    (0, 1, 0, Face::Top),
    (0, -1, 0, Face::Bottom),
    (0, 0, -1, Face::North),
    (0, 0, 1, Face::South),
    (1, 0, 0, Face::East),
    (-1, 0, 0, Face::West),
];

/// Builds the visible-face geometry for one chunk. Neighbor cells are read
/// through the world so seams against loaded chunks cull correctly; cells in
/// chunks that are not loaded count as air, which makes border faces appear
/// until the neighbor arrives and the chunk is remeshed.
pub fn build_chunk_mesh(
    world: &World,
    registry: &BlockRegistry,
    cx: i32,
    cz: i32,
) -> ChunkMeshData {
    let mut mesh = ChunkMeshData::new();

    // Cache chunk references to keep HashMap lookups out of the hot loop.
    let center = world.get_chunk(cx, cz);
    let west = world.get_chunk(cx - 1, cz);
    let east = world.get_chunk(cx + 1, cz);
    let north = world.get_chunk(cx, cz - 1);
    let south = world.get_chunk(cx, cz + 1);

    let Some(chunk) = center else {
        return mesh;
    };

    let get_block_fast = |wx: i32, wy: i32, wz: i32| -> BlockType {
        if wy < 0 || wy >= WORLD_HEIGHT {
            return BlockType::Air;
        }
        let (bcx, lx) = World::split_coord(wx);
        let (bcz, lz) = World::split_coord(wz);

        let source = if bcx == cx && bcz == cz {
            center
        } else if bcx == cx - 1 && bcz == cz {
            west
        } else if bcx == cx + 1 && bcz == cz {
            east
        } else if bcx == cx && bcz == cz - 1 {
            north
        } else if bcx == cx && bcz == cz + 1 {
            south
        } else {
            return BlockType::Air;
        };

        source
            .map(|c| c.get_block(lx, wy, lz))
            .unwrap_or(BlockType::Air)
    };

    let base_x = cx * CHUNK_SIZE;
    let base_z = cz * CHUNK_SIZE;

    for lx in 0..CHUNK_SIZE {
        for y in 0..WORLD_HEIGHT {
            for lz in 0..CHUNK_SIZE {
                let block = chunk.get_block(lx, y, lz);
                if block == BlockType::Air {
                    continue;
                }

                let world_x = base_x + lx;
                let world_z = base_z + lz;

                let (target_verts, target_inds) = if block.is_transparent() {
                    (&mut mesh.transparent_vertices, &mut mesh.transparent_indices)
                } else {
                    (&mut mesh.opaque_vertices, &mut mesh.opaque_indices)
                };

                for (dx, dy, dz, face) in FACE_NEIGHBORS {
                    let neighbor = get_block_fast(world_x + dx, y + dy, world_z + dz);
                    if !block.should_render_face_against(neighbor) {
                        continue;
                    }

                    let Some(tex) = registry.face_texture(block, face) else {
                        tracing::warn!("No atlas entry for {:?} {:?} face, skipping", block, face);
                        continue;
                    };

                    let color = match face {
                        Face::Top => block.top_color(),
                        Face::Bottom => block.bottom_color(),
                        _ => block.color(),
                    };

                    emit_face(
                        target_verts,
                        target_inds,
                        face,
                        world_x as f32,
                        y as f32,
                        world_z as f32,
                        color,
                        tex as f32,
                    );
                }
            }
        }
    }

    mesh
}

#[allow(clippy::too_many_arguments)]
fn emit_face(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    face: Face,
    x: f32,
    y: f32,
    z: f32,
    color: [f32; 3],
    tex_index: f32,
) {
    match face {
        Face::Top => add_quad(
            vertices,
            indices,
            [x, y + 1.0, z],
            [x, y + 1.0, z + 1.0],
            [x + 1.0, y + 1.0, z + 1.0],
            [x + 1.0, y + 1.0, z],
            [0.0, 1.0, 0.0],
            color,
            tex_index,
        ),
        Face::Bottom => add_quad(
            vertices,
            indices,
            [x, y, z + 1.0],
            [x, y, z],
            [x + 1.0, y, z],
            [x + 1.0, y, z + 1.0],
            [0.0, -1.0, 0.0],
            color,
            tex_index,
        ),
        Face::North => add_quad(
            vertices,
            indices,
            [x + 1.0, y, z],
            [x, y, z],
            [x, y + 1.0, z],
            [x + 1.0, y + 1.0, z],
            [0.0, 0.0, -1.0],
            color,
            tex_index,
        ),
        Face::South => add_quad(
            vertices,
            indices,
            [x, y, z + 1.0],
            [x + 1.0, y, z + 1.0],
            [x + 1.0, y + 1.0, z + 1.0],
            [x, y + 1.0, z + 1.0],
            [0.0, 0.0, 1.0],
            color,
            tex_index,
        ),
        Face::East => add_quad(
            vertices,
            indices,
            [x + 1.0, y, z + 1.0],
            [x + 1.0, y, z],
            [x + 1.0, y + 1.0, z],
            [x + 1.0, y + 1.0, z + 1.0],
            [1.0, 0.0, 0.0],
            color,
            tex_index,
        ),
        Face::West => add_quad(
            vertices,
            indices,
            [x, y, z],
            [x, y, z + 1.0],
            [x, y + 1.0, z + 1.0],
            [x, y + 1.0, z],
            [-1.0, 0.0, 0.0],
            color,
            tex_index,
        ),
    }
}
