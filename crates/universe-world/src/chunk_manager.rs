//! Resident chunk window and chunk admission.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::{debug, trace, warn};
use universe_core::coords::ChunkPos;
use universe_core::types::TileKind;
use universe_core::Result;

use crate::chunk::Chunk;
use crate::generation::{apply_overrides, TerrainGenerator};
use crate::noise_source::WorldNoise;
use crate::storage::{EditStore, TileChanged};

/// Immutable map of resident chunks.
///
/// Cloning is cheap and shares every chunk. Operations that change nothing
/// hand back a clone of the same map, so [`LoadedChunks::ptr_eq`] tells a
/// caller whether anything happened.
#[derive(Clone, Default)]
pub struct LoadedChunks {
    map: Arc<HashMap<ChunkPos, Arc<Chunk>>>,
}

impl LoadedChunks {
    /// Empty chunk map.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_map(map: HashMap<ChunkPos, Arc<Chunk>>) -> Self {
        Self { map: Arc::new(map) }
    }

    /// Resident chunk at `pos`.
    pub fn get(&self, pos: ChunkPos) -> Option<&Arc<Chunk>> {
        self.map.get(&pos)
    }

    /// Check if the chunk at `pos` is resident.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.map.contains_key(&pos)
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no chunk is resident.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resident positions, sorted.
    pub fn positions(&self) -> Vec<ChunkPos> {
        let mut positions: Vec<_> = self.map.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// Returns true if both maps are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }

    /// New map with `chunk` added or replaced; `self` is untouched.
    pub fn with_inserted(&self, chunk: Arc<Chunk>) -> Self {
        let mut map = (*self.map).clone();
        map.insert(chunk.pos, chunk);
        Self::from_map(map)
    }

    /// Patch one tile of a resident chunk from a committed edit.
    ///
    /// Only the touched chunk is copied; snapshots holding the old map keep
    /// seeing the old tile. Returns `self` unchanged when the chunk is not
    /// resident, the coordinate is out of range, the tile already matches,
    /// or the tile is the player overlay.
    pub fn apply_tile_changed(&self, event: &TileChanged) -> Self {
        let pos = ChunkPos::new(event.chunk_x);
        let Some(chunk) = self.map.get(&pos) else {
            return self.clone();
        };
        let (x, y) = (i64::from(event.x), i64::from(event.y));
        if event.tile.kind == TileKind::Player {
            warn!(chunk = %pos, x, y, "ignoring player tile change");
            return self.clone();
        }
        if chunk.dims().index(x, y).is_none() {
            warn!(chunk = %pos, x, y, "ignoring out-of-range tile change");
            return self.clone();
        }
        if chunk.get(x, y) == Some(event.tile) {
            return self.clone();
        }

        let mut patched = Arc::clone(chunk);
        if let Err(err) = Arc::make_mut(&mut patched).set(x, y, event.tile) {
            warn!(chunk = %pos, %err, "ignoring tile change");
            return self.clone();
        }
        trace!(chunk = %pos, x, y, kind = event.tile.kind.name(), "applied tile change");

        let mut map = (*self.map).clone();
        map.insert(pos, patched);
        Self::from_map(map)
    }
}

impl fmt::Debug for LoadedChunks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedChunks")
            .field("positions", &self.positions())
            .finish()
    }
}

/// Generates chunks, overlays persisted edits and keeps the resident window.
///
/// The manager holds no chunks itself; every operation takes the current
/// [`LoadedChunks`] and returns a new one.
pub struct ChunkManager<S> {
    generator: TerrainGenerator,
    store: S,
}

impl<S: EditStore> ChunkManager<S> {
    /// Create a manager generating with `generator` and overlaying edits from `store`.
    pub const fn new(generator: TerrainGenerator, store: S) -> Self {
        Self { generator, store }
    }

    /// Get the terrain generator.
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Get the edit store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Generate a chunk and overlay its persisted edits.
    ///
    /// A store failure rejects the chunk entirely rather than admitting it
    /// without its edits.
    pub fn load_chunk(&self, chunk_x: i32, noise: &WorldNoise) -> Result<Chunk> {
        let stored = self.store.get_chunk(chunk_x)?;
        let mut chunk = self.generator.generate_chunk(chunk_x, noise);
        let overridden = stored.map_or(0, |stored| apply_overrides(&mut chunk, &stored.tiles));
        debug!(chunk_x, overridden, "loaded chunk");
        Ok(chunk)
    }

    /// Resident chunk at `chunk_x`, loading it into a new map if needed.
    pub fn get_chunk(
        &self,
        chunks: &LoadedChunks,
        noise: &WorldNoise,
        chunk_x: i32,
    ) -> Result<(Arc<Chunk>, LoadedChunks)> {
        if let Some(chunk) = chunks.get(ChunkPos::new(chunk_x)) {
            return Ok((Arc::clone(chunk), chunks.clone()));
        }
        let chunk = Arc::new(self.load_chunk(chunk_x, noise)?);
        Ok((Arc::clone(&chunk), chunks.with_inserted(chunk)))
    }

    /// Make the resident set exactly `{center - 1, center, center + 1}`.
    ///
    /// Kept chunks are carried over by reference. If the set is already
    /// correct the input map itself is returned.
    pub fn manage_chunk_memory(
        &self,
        chunks: &LoadedChunks,
        noise: &WorldNoise,
        center: ChunkPos,
    ) -> Result<LoadedChunks> {
        let keep = center.window()?;
        if chunks.len() == keep.len() && keep.iter().all(|pos| chunks.contains(*pos)) {
            return Ok(chunks.clone());
        }

        let mut map = HashMap::with_capacity(keep.len());
        let mut generated = Vec::new();
        for pos in keep {
            let chunk = match chunks.get(pos) {
                Some(chunk) => Arc::clone(chunk),
                None => {
                    generated.push(pos.x);
                    Arc::new(self.load_chunk(pos.x, noise)?)
                }
            };
            map.insert(pos, chunk);
        }

        let evicted: Vec<i32> = chunks
            .positions()
            .into_iter()
            .filter(|pos| !keep.contains(pos))
            .map(|pos| pos.x)
            .collect();
        debug!(center = %center, ?evicted, ?generated, "rebalanced chunk window");

        Ok(LoadedChunks::from_map(map))
    }
}

impl<S: fmt::Debug> fmt::Debug for ChunkManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkManager")
            .field("dims", &self.generator.dims())
            .field("store", &self.store)
            .finish()
    }
}
