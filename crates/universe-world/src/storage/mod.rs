//! Persisted tile edits.
//!
//! An [`EditStore`] maps a chunk X to the list of tile overrides recorded for
//! that chunk. Overrides are keyed by local coordinate: saving the same
//! coordinate twice replaces the earlier entry. Every successful save is
//! announced to subscribers over a channel once the write has committed.

mod file;
mod memory;

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use universe_core::types::{Tile, TileKind};
use universe_core::{Error, Result};

pub use file::FileEditStore;
pub use memory::MemoryEditStore;

/// One persisted deviation from generated terrain, in chunk-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileOverride {
    pub x: u32,
    pub y: u32,
    pub tile: Tile,
}

impl TileOverride {
    /// Override of the tile at local `(x, y)`.
    pub const fn new(x: u32, y: u32, tile: Tile) -> Self {
        Self { x, y, tile }
    }
}

/// All overrides recorded for one chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub x: i32,
    pub tiles: Vec<TileOverride>,
}

impl StoredChunk {
    /// Empty override list for chunk `x`.
    pub const fn new(x: i32) -> Self {
        Self {
            x,
            tiles: Vec::new(),
        }
    }

    /// Insert or replace the override at `(x, y)`.
    pub fn upsert(&mut self, entry: TileOverride) {
        match self
            .tiles
            .iter_mut()
            .find(|existing| existing.x == entry.x && existing.y == entry.y)
        {
            Some(existing) => existing.tile = entry.tile,
            None => self.tiles.push(entry),
        }
    }

    /// Override recorded at `(x, y)`, if any.
    pub fn get(&self, x: u32, y: u32) -> Option<Tile> {
        self.tiles
            .iter()
            .find(|entry| entry.x == x && entry.y == y)
            .map(|entry| entry.tile)
    }
}

/// Notification sent after a tile edit commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileChanged {
    pub chunk_x: i32,
    pub x: u32,
    pub y: u32,
    pub tile: Tile,
}

/// Backend for persisted tile edits.
///
/// Implementations use interior mutability so a store can be shared behind
/// `&self` by the chunk manager and the interaction layer.
pub trait EditStore: Send + Sync {
    /// Overrides recorded for a chunk, `None` if nothing was ever saved there.
    fn get_chunk(&self, chunk_x: i32) -> Result<Option<StoredChunk>>;

    /// Upsert one override and notify subscribers once it has committed.
    fn save_tile(&self, chunk_x: i32, x: u32, y: u32, tile: Tile) -> Result<()>;

    /// Register a new subscriber for tile-changed notifications.
    ///
    /// Messages for the same chunk arrive in write order.
    fn subscribe(&self) -> Receiver<TileChanged>;
}

impl<S: EditStore + ?Sized> EditStore for Box<S> {
    fn get_chunk(&self, chunk_x: i32) -> Result<Option<StoredChunk>> {
        (**self).get_chunk(chunk_x)
    }

    fn save_tile(&self, chunk_x: i32, x: u32, y: u32, tile: Tile) -> Result<()> {
        (**self).save_tile(chunk_x, x, y, tile)
    }

    fn subscribe(&self) -> Receiver<TileChanged> {
        (**self).subscribe()
    }
}

/// Reject tiles that only exist as a render overlay.
pub(crate) fn ensure_storable(tile: Tile) -> Result<()> {
    if tile.kind == TileKind::Player {
        return Err(Error::InvalidData(
            "the player tile cannot be stored as an override".to_string(),
        ));
    }
    Ok(())
}

/// In-process fan-out of tile-changed notifications.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<Sender<TileChanged>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self) -> Receiver<TileChanged> {
        let (tx, rx) = channel::unbounded();
        self.senders.lock().push(tx);
        rx
    }

    /// Deliver to every live subscriber, dropping those whose receiver is gone.
    pub(crate) fn publish(&self, event: TileChanged) {
        self.senders.lock().retain(|tx| tx.send(event).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.lock().len()
    }
}
