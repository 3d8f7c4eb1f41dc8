//! Chunk streaming around a moving viewer
//!
//! Schedules generation and meshing so the expensive work is spread over
//! ticks: a wall-clock budget bounds queue draining, and a separate count
//! bounds dirty-chunk remeshes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;

use crate::constants::*;
use crate::core::block::{BlockRegistry, BlockType};
use crate::core::chunk::Chunk;
use crate::render::mesh::build_chunk_mesh;
use crate::render::sink::RenderSink;
use crate::world::world::World;

/// Observable lifecycle of a chunk coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChunkState {
    Unloaded,
    /// Voxel data exists but no geometry has been built yet.
    DataReady,
    QueuedForMesh,
    Meshed,
    /// Meshed before, but edits or new neighbors invalidated the geometry.
    Dirty,
}

/// Drives chunk loading, meshing and eviction. Holds coordinates and
/// scheduling state only; voxel data lives in the `World` passed to each
/// call.
pub struct ChunkManager {
    registry: BlockRegistry,
    view_radius: i32,
    budget: Duration,
    max_dirty_per_tick: usize,
    mesh_queue: VecDeque<(i32, i32)>,
    /// Queue membership; entries removed here but still in the queue are
    /// treated as cancelled when popped.
    pending: FxHashSet<(i32, i32)>,
    loading: bool,
    loaded_count: usize,
    target_count: usize,
}

impl ChunkManager {
    pub fn new(
        registry: BlockRegistry,
        view_radius: i32,
        budget_ms: u64,
        max_dirty_per_tick: usize,
    ) -> Self {
        ChunkManager {
            registry,
            view_radius: view_radius.max(0),
            budget: Duration::from_millis(budget_ms),
            max_dirty_per_tick,
            mesh_queue: VecDeque::new(),
            pending: FxHashSet::default(),
            loading: false,
            loaded_count: 0,
            target_count: 0,
        }
    }

    pub fn with_defaults(registry: BlockRegistry) -> Self {
        Self::new(
            registry,
            DEFAULT_VIEW_RADIUS,
            DEFAULT_TICK_BUDGET_MS,
            DEFAULT_MAX_DIRTY_PER_TICK,
        )
    }

    pub fn view_radius(&self) -> i32 {
        self.view_radius
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn queued_count(&self) -> usize {
        self.pending.len()
    }

    pub fn progress_percent(&self) -> u8 {
        if self.target_count == 0 {
            return 100;
        }
        ((self.loaded_count * 100) / self.target_count).min(100) as u8
    }

    /// Generates voxel data for the whole (2R+1)^2 square around `origin`,
    /// meshes the origin chunk right away, and queues the remaining chunks
    /// ring by ring outward. Within a ring the order is shuffled so the
    /// frontier grows evenly instead of sweeping a corner first.
    pub fn begin_initial_load(
        &mut self,
        world: &mut World,
        sink: &mut dyn RenderSink,
        origin: (i32, i32),
        radius: i32,
    ) {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;

        self.mesh_queue.clear();
        self.pending.clear();
        self.loading = true;
        self.loaded_count = 0;
        self.target_count = side * side;

        tracing::info!(
            "Initial load: {} chunks around ({}, {})",
            self.target_count,
            origin.0,
            origin.1
        );

        // All voxel data first, so every seam meshes against real neighbors.
        for cx in (origin.0 - radius)..=(origin.0 + radius) {
            for cz in (origin.1 - radius)..=(origin.1 + radius) {
                if !world.has_chunk(cx, cz) {
                    let mut chunk = Chunk::new(cx, cz);
                    chunk.generate(&world.generator);
                    world.add_chunk(chunk);
                }
            }
        }

        self.mesh_chunk(world, sink, origin);
        self.loaded_count = 1;

        let mut rng = rand::rng();
        for ring in 1..=radius {
            let mut coords = ring_coords(origin, ring);
            coords.shuffle(&mut rng);
            for coord in coords {
                self.enqueue(coord);
            }
        }

        self.maybe_finish_loading();
    }

    /// One scheduler step. Streams chunks toward the viewer, drains the mesh
    /// queue until the time budget is spent (always making progress on at
    /// least one item), then remeshes up to `max_dirty_per_tick` dirty
    /// chunks nearest the viewer.
    pub fn tick(
        &mut self,
        world: &mut World,
        sink: &mut dyn RenderSink,
        viewer_x: f32,
        viewer_z: f32,
    ) {
        let start = Instant::now();
        let viewer_cx = (viewer_x / CHUNK_SIZE as f32).floor() as i32;
        let viewer_cz = (viewer_z / CHUNK_SIZE as f32).floor() as i32;

        if !self.loading {
            self.stream_around(world, sink, (viewer_cx, viewer_cz));
        }

        while let Some(coord) = self.mesh_queue.pop_front() {
            if !self.pending.remove(&coord) {
                // Cancelled while queued.
                continue;
            }
            self.process_queued(world, sink, coord);
            if self.loading {
                self.loaded_count += 1;
            }
            if start.elapsed() >= self.budget {
                break;
            }
        }

        self.maybe_finish_loading();
        self.process_dirty(world, sink, (viewer_cx, viewer_cz));
    }

    /// Applies a block edit and marks every chunk whose geometry the edit
    /// can affect. Writes into unloaded chunks are dropped and mark nothing.
    pub fn apply_edit(&mut self, world: &mut World, x: i32, y: i32, z: i32, block: BlockType) {
        world.set_block(x, y, z, block);
        self.note_edit(world, x, y, z);
    }

    /// Marks the owning chunk dirty, plus boundary neighbors when the edit
    /// sits on a chunk edge. Faces are culled against neighbor cells, so an
    /// edge edit invalidates the adjacent chunk's geometry too.
    pub fn note_edit(&self, world: &mut World, x: i32, y: i32, z: i32) {
        if y < 0 || y >= WORLD_HEIGHT {
            return;
        }
        let (cx, lx) = World::split_coord(x);
        let (cz, lz) = World::split_coord(z);
        if !world.has_chunk(cx, cz) {
            return;
        }

        if let Some(chunk) = world.get_chunk_mut(cx, cz) {
            chunk.mark_dirty();
        }
        if lx == 0 {
            self.mark_chunk_dirty(world, cx - 1, cz);
        }
        if lx == CHUNK_SIZE - 1 {
            self.mark_chunk_dirty(world, cx + 1, cz);
        }
        if lz == 0 {
            self.mark_chunk_dirty(world, cx, cz - 1);
        }
        if lz == CHUNK_SIZE - 1 {
            self.mark_chunk_dirty(world, cx, cz + 1);
        }
    }

    pub fn state_of(&self, world: &World, cx: i32, cz: i32) -> ChunkState {
        let queued = self.pending.contains(&(cx, cz));
        match world.get_chunk(cx, cz) {
            None if queued => ChunkState::QueuedForMesh,
            None => ChunkState::Unloaded,
            Some(_) if queued => ChunkState::QueuedForMesh,
            Some(chunk) if chunk.needs_remesh && chunk.mesh.is_some() => ChunkState::Dirty,
            Some(chunk) if chunk.needs_remesh => ChunkState::DataReady,
            Some(_) => ChunkState::Meshed,
        }
    }

    fn enqueue(&mut self, coord: (i32, i32)) {
        if self.pending.insert(coord) {
            self.mesh_queue.push_back(coord);
        }
    }

    fn mark_chunk_dirty(&self, world: &mut World, cx: i32, cz: i32) {
        if let Some(chunk) = world.get_chunk_mut(cx, cz) {
            chunk.mark_dirty();
        }
    }

    fn maybe_finish_loading(&mut self) {
        if self.loading && self.mesh_queue.is_empty() {
            self.loading = false;
            tracing::info!("Initial world load complete ({} chunks)", self.target_count);
        }
    }

    /// Queue item processing: generate data if the coordinate has none yet,
    /// then build and upload its mesh. Fresh data invalidates already-meshed
    /// neighbors, whose border faces were culled against air until now.
    fn process_queued(&mut self, world: &mut World, sink: &mut dyn RenderSink, coord: (i32, i32)) {
        if !world.has_chunk(coord.0, coord.1) {
            let mut chunk = Chunk::new(coord.0, coord.1);
            chunk.generate(&world.generator);
            world.add_chunk(chunk);
            self.mark_meshed_neighbors_dirty(world, coord);
        }
        self.mesh_chunk(world, sink, coord);
    }

    fn mark_meshed_neighbors_dirty(&self, world: &mut World, (cx, cz): (i32, i32)) {
        for (ncx, ncz) in [(cx - 1, cz), (cx + 1, cz), (cx, cz - 1), (cx, cz + 1)] {
            if let Some(neighbor) = world.get_chunk_mut(ncx, ncz) {
                if !neighbor.needs_remesh {
                    neighbor.mark_dirty();
                }
            }
        }
    }

    fn mesh_chunk(&self, world: &mut World, sink: &mut dyn RenderSink, (cx, cz): (i32, i32)) {
        let mesh = build_chunk_mesh(world, &self.registry, cx, cz);
        let Some(chunk) = world.get_chunk_mut(cx, cz) else {
            return;
        };
        if let Some(handle) = chunk.mesh.take() {
            sink.remove_chunk_mesh(handle);
        }
        if !mesh.is_empty() {
            chunk.mesh = Some(sink.upload_chunk_mesh(cx, cz, &mesh));
        }
        chunk.needs_remesh = false;
    }

    /// Steady-state streaming: evict chunks outside the view radius plus
    /// hysteresis, then queue every missing in-radius coordinate nearest
    /// first.
    fn stream_around(&mut self, world: &mut World, sink: &mut dyn RenderSink, viewer: (i32, i32)) {
        let unload_radius = self.view_radius + UNLOAD_HYSTERESIS;
        let to_remove: Vec<(i32, i32)> = world
            .chunks
            .keys()
            .filter(|(cx, cz)| {
                (cx - viewer.0).abs().max((cz - viewer.1).abs()) > unload_radius
            })
            .copied()
            .collect();

        for (cx, cz) in to_remove {
            self.pending.remove(&(cx, cz));
            if let Some(mut chunk) = world.remove_chunk(cx, cz) {
                if chunk.modified {
                    tracing::debug!("Evicting modified chunk ({}, {})", cx, cz);
                }
                if let Some(handle) = chunk.mesh.take() {
                    sink.remove_chunk_mesh(handle);
                }
            }
        }

        let mut missing: Vec<(i32, i32, i32)> = Vec::new();
        for cx in (viewer.0 - self.view_radius)..=(viewer.0 + self.view_radius) {
            for cz in (viewer.1 - self.view_radius)..=(viewer.1 + self.view_radius) {
                if !world.has_chunk(cx, cz) && !self.pending.contains(&(cx, cz)) {
                    let dx = cx - viewer.0;
                    let dz = cz - viewer.1;
                    missing.push((cx, cz, dx * dx + dz * dz));
                }
            }
        }
        missing.sort_by_key(|&(_, _, d2)| d2);
        for (cx, cz, _) in missing {
            self.enqueue((cx, cz));
        }
    }

    /// Remeshes up to `max_dirty_per_tick` dirty chunks, closest first.
    /// Chunks waiting in the mesh queue are left to their queue turn.
    fn process_dirty(&mut self, world: &mut World, sink: &mut dyn RenderSink, viewer: (i32, i32)) {
        let mut dirty: Vec<(i32, i32, i32)> = world
            .chunks
            .values()
            .filter(|chunk| chunk.needs_remesh && !self.pending.contains(&(chunk.cx, chunk.cz)))
            .map(|chunk| {
                let dx = chunk.cx - viewer.0;
                let dz = chunk.cz - viewer.1;
                (chunk.cx, chunk.cz, dx * dx + dz * dz)
            })
            .collect();
        dirty.sort_by_key(|&(_, _, d2)| d2);
        dirty.truncate(self.max_dirty_per_tick);

        for (cx, cz, _) in dirty {
            self.mesh_chunk(world, sink, (cx, cz));
        }
    }
}

/// Coordinates at exactly Chebyshev distance `ring` from `origin`.
fn ring_coords(origin: (i32, i32), ring: i32) -> Vec<(i32, i32)> {
    let mut coords = Vec::new();
    for dx in -ring..=ring {
        for dz in -ring..=ring {
            if dx.abs().max(dz.abs()) == ring {
                coords.push((origin.0 + dx, origin.1 + dz));
            }
        }
    }
    coords
}
