//! Procedural world generation and chunk streaming for the Universe tile world.
//!
//! - [`noise_source`]: seeded coherent-noise sources
//! - [`generation`]: deterministic terrain, caves and trees per chunk
//! - [`visibility`]: reveal computation over a chunk's tiles
//! - [`storage`]: persisted tile overrides and change notifications
//! - [`chunk_manager`]: the resident chunk window around the player

pub mod chunk;
pub mod chunk_manager;
pub mod config;
pub mod generation;
pub mod noise_source;
pub mod storage;
pub mod visibility;

pub use chunk::Chunk;
pub use chunk_manager::{ChunkManager, LoadedChunks};
pub use config::WorldConfig;
pub use generation::{TerrainConfig, TerrainGenerator};
#[cfg(any(test, feature = "test-util"))]
pub use noise_source::testing;
pub use noise_source::{clamp_seed, NoiseSource, SimplexNoise, WorldNoise};
pub use storage::{
    EditStore, FileEditStore, MemoryEditStore, StoredChunk, TileChanged, TileOverride,
};
pub use visibility::calculate_visibility;

/// World seed after clamping into the generator's safe range.
pub type WorldSeed = u32;
