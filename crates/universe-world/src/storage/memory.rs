//! In-memory edit store, used by tests and `--memory` sessions.

use crossbeam::channel::Receiver;
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::trace;
use universe_core::types::Tile;
use universe_core::Result;

use super::{ensure_storable, EditStore, StoredChunk, Subscribers, TileChanged, TileOverride};

/// Edit store that keeps everything in a map and forgets it on drop.
#[derive(Debug, Default)]
pub struct MemoryEditStore {
    chunks: RwLock<HashMap<i32, StoredChunk>>,
    subscribers: Subscribers,
}

impl MemoryEditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks with at least one override.
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }
}

impl EditStore for MemoryEditStore {
    fn get_chunk(&self, chunk_x: i32) -> Result<Option<StoredChunk>> {
        Ok(self.chunks.read().get(&chunk_x).cloned())
    }

    fn save_tile(&self, chunk_x: i32, x: u32, y: u32, tile: Tile) -> Result<()> {
        ensure_storable(tile)?;
        self.chunks
            .write()
            .entry(chunk_x)
            .or_insert_with(|| StoredChunk::new(chunk_x))
            .upsert(TileOverride::new(x, y, tile));
        trace!(chunk_x, x, y, kind = tile.kind.name(), "saved tile override");

        self.subscribers.publish(TileChanged {
            chunk_x,
            x,
            y,
            tile,
        });
        Ok(())
    }

    fn subscribe(&self) -> Receiver<TileChanged> {
        self.subscribers.subscribe()
    }
}
