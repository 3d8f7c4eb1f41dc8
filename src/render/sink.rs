use rustc_hash::FxHashSet;

use crate::render::mesh::ChunkMeshData;

/// Opaque token for chunk geometry owned by a render backend. The world
/// keeps the handle so the backend can be told to drop the geometry on
/// remesh or eviction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MeshHandle(pub u64);

/// Boundary between the chunk pipeline and whatever consumes geometry. A
/// GPU backend would copy the buffers into vertex/index allocations; the
/// headless sink just accounts for them.
pub trait RenderSink {
    fn upload_chunk_mesh(&mut self, cx: i32, cz: i32, mesh: &ChunkMeshData) -> MeshHandle;
    fn remove_chunk_mesh(&mut self, handle: MeshHandle);
}

/// Sink for headless runs and tests. Hands out sequential handles and
/// tracks which are live.
pub struct NullRenderSink {
    next_handle: u64,
    active: FxHashSet<MeshHandle>,
    pub uploads: usize,
    pub removals: usize,
}

impl NullRenderSink {
    pub fn new() -> Self {
        NullRenderSink {
            next_handle: 0,
            active: FxHashSet::default(),
            uploads: 0,
            removals: 0,
        }
    }

    pub fn active_meshes(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, handle: MeshHandle) -> bool {
        self.active.contains(&handle)
    }
}

impl Default for NullRenderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for NullRenderSink {
    fn upload_chunk_mesh(&mut self, _cx: i32, _cz: i32, _mesh: &ChunkMeshData) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.active.insert(handle);
        self.uploads += 1;
        handle
    }

    fn remove_chunk_mesh(&mut self, handle: MeshHandle) {
        self.active.remove(&handle);
        self.removals += 1;
    }
}
