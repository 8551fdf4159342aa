//! Core types and coordinates for the Universe tile world.
//!
//! This crate provides the foundational types used by every other crate:
//! - Tile kinds and their static display descriptors
//! - Coordinate systems (world, chunk, local) and chunk dimensions
//! - The shared error type

pub mod coords;
pub mod error;
pub mod types;

pub use coords::{ChunkDims, ChunkPos, LocalPos, WorldPos};
pub use error::{Error, Result};
pub use types::{Tile, TileInfo, TileKind};

/// World-wide constants
pub mod constants {
    /// Width of a chunk in tiles
    pub const CHUNK_WIDTH: u32 = 50;
    /// Height of a chunk in tiles (also the height of the whole world)
    pub const CHUNK_HEIGHT: u32 = 50;
    /// Chunk row used for every chunk key; the world only pages along X
    pub const CHUNK_ROW: i32 = 0;
}
