//! The game state snapshot and its construction.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;
use universe_core::coords::{ChunkDims, ChunkPos, WorldPos};
use universe_core::types::TileKind;
use universe_world::{clamp_seed, LoadedChunks, WorldConfig, WorldNoise, WorldSeed};

use crate::inventory::Inventory;

/// Immutable snapshot of everything the game tracks.
///
/// Cloning shares the chunk map and noise handles. Transitions build a new
/// value instead of mutating a previous one.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Clamped world seed.
    pub seed: WorldSeed,
    pub player_name: String,
    pub inventory: Inventory,
    pub selected_item: Option<TileKind>,
    /// Player position in world tiles.
    pub player: WorldPos,
    /// Chunk containing the player.
    pub current_chunk: ChunkPos,
    pub chunks: LoadedChunks,
    pub noise: WorldNoise,
    pub dims: ChunkDims,
    pub debug: bool,
}

impl GameState {
    /// Returns true if `other` is observably the same snapshot.
    ///
    /// Chunks and noise compare by identity, so this stays cheap.
    pub fn is_same(&self, other: &Self) -> bool {
        self.chunks.ptr_eq(&other.chunks)
            && self.noise.ptr_eq(&other.noise)
            && self.player == other.player
            && self.current_chunk == other.current_chunk
            && self.selected_item == other.selected_item
            && self.inventory == other.inventory
            && self.seed == other.seed
            && self.dims == other.dims
    }

    /// Copy of this state with a different chunk map.
    pub fn with_chunks(&self, chunks: LoadedChunks) -> Self {
        Self {
            chunks,
            ..self.clone()
        }
    }
}

/// Inputs parsed before the world starts.
#[derive(Clone, Debug, Default)]
pub struct InitialParams {
    /// Raw seed; the current time in milliseconds when absent.
    pub seed: Option<u64>,
    pub chunk_x: i32,
    pub player_name: String,
    pub debug: bool,
}

/// Build the starting state: no chunks loaded, empty inventory.
///
/// The player stands at the left edge of `params.chunk_x`, halfway down.
pub fn create_initial_state(params: &InitialParams, config: &WorldConfig) -> GameState {
    let raw_seed = params.seed.unwrap_or_else(unix_millis);
    let seed = clamp_seed(raw_seed);
    let dims = config.dims();
    let current_chunk = ChunkPos::new(params.chunk_x);
    let player = WorldPos::new(current_chunk.origin_x(dims), i64::from(dims.height / 2));

    info!(raw_seed, seed, chunk_x = params.chunk_x, "creating world");

    GameState {
        seed,
        player_name: params.player_name.clone(),
        inventory: Inventory::new(),
        selected_item: None,
        player,
        current_chunk,
        chunks: LoadedChunks::new(),
        noise: WorldNoise::from_seed(seed, config.terrain.cave_seed_offset),
        dims,
        debug: params.debug,
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}
