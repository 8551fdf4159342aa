//! State-level chunk operations.

use std::sync::Arc;

use crossbeam::channel::Receiver;
use universe_core::coords::{ChunkDims, WorldPos};
use universe_core::types::Tile;
use universe_core::Result;
use universe_world::{Chunk, ChunkManager, EditStore, TileChanged, WorldConfig};

use crate::state::GameState;

/// Chunk manager bound to an edit store, driven by [`GameState`] snapshots.
#[derive(Debug)]
pub struct GameWorld<S> {
    manager: ChunkManager<S>,
}

impl<S: EditStore> GameWorld<S> {
    /// Create a world generating from `config` with edits kept in `store`.
    pub fn new(config: &WorldConfig, store: S) -> Self {
        Self {
            manager: ChunkManager::new(config.generator(), store),
        }
    }

    /// Chunk dimensions in tiles.
    pub const fn dims(&self) -> ChunkDims {
        self.manager.generator().dims()
    }

    /// Get the edit store.
    pub const fn store(&self) -> &S {
        self.manager.store()
    }

    /// Subscribe to committed edits from the underlying store.
    pub fn subscribe(&self) -> Receiver<TileChanged> {
        self.manager.store().subscribe()
    }

    /// Chunk at `chunk_x`, loading it into the next state if it is not resident.
    pub fn get_chunk(&self, state: &GameState, chunk_x: i32) -> Result<(Arc<Chunk>, GameState)> {
        let (chunk, chunks) = self.manager.get_chunk(&state.chunks, &state.noise, chunk_x)?;
        Ok((chunk, state.with_chunks(chunks)))
    }

    /// Rebalance resident chunks around `state.current_chunk`.
    pub fn manage_chunk_memory(&self, state: &GameState) -> Result<GameState> {
        let chunks =
            self.manager
                .manage_chunk_memory(&state.chunks, &state.noise, state.current_chunk)?;
        Ok(state.with_chunks(chunks))
    }

    /// Tile at a world position.
    ///
    /// Positions above or below the world resolve to `None` without loading anything.
    pub fn get_tile(&self, state: &GameState, pos: WorldPos) -> Result<(Option<Tile>, GameState)> {
        let dims = self.dims();
        let Some(local) = pos.local_pos(dims) else {
            return Ok((None, state.clone()));
        };
        let (chunk, state) = self.get_chunk(state, pos.chunk_pos(dims).x)?;
        Ok((chunk.get_local(local), state))
    }
}

/// Patch a resident chunk from one committed edit.
pub fn apply_tile_changed(state: &GameState, event: &TileChanged) -> GameState {
    state.with_chunks(state.chunks.apply_tile_changed(event))
}

/// Apply every queued edit without blocking, in arrival order.
pub fn drain_tile_changes(state: &GameState, receiver: &Receiver<TileChanged>) -> GameState {
    receiver
        .try_iter()
        .fold(state.clone(), |state, event| apply_tile_changed(&state, &event))
}
