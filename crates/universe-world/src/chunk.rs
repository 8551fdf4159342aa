//! Chunk data structure for tile storage.

use universe_core::coords::{ChunkDims, ChunkPos, LocalPos};
use universe_core::types::{Tile, TileKind};
use universe_core::{Error, Result};

use crate::visibility::calculate_visibility;

/// A fixed-size grid of tiles, stored row-major (`index = y * width + x`).
///
/// Every cell is always populated; a fresh chunk is all air.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Position in chunk coordinates.
    pub pos: ChunkPos,
    dims: ChunkDims,
    tiles: Vec<Tile>,
}

impl Chunk {
    /// Create a new all-air chunk at the given position.
    pub fn new(pos: ChunkPos, dims: ChunkDims) -> Self {
        Self::filled(pos, dims, Tile::AIR)
    }

    /// Create a chunk with every cell set to `tile`.
    pub fn filled(pos: ChunkPos, dims: ChunkDims, tile: Tile) -> Self {
        Self {
            pos,
            dims,
            tiles: vec![tile; dims.area()],
        }
    }

    /// Create a chunk from an existing tile array.
    pub fn from_tiles(pos: ChunkPos, dims: ChunkDims, tiles: Vec<Tile>) -> Result<Self> {
        if tiles.len() != dims.area() {
            return Err(Error::InvalidData(format!(
                "chunk {pos} expects {} tiles, got {}",
                dims.area(),
                tiles.len()
            )));
        }
        Ok(Self { pos, dims, tiles })
    }

    /// Chunk dimensions.
    #[inline]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// All tiles, row-major.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at a local coordinate, `None` when out of range.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        self.dims.index(x, y).map(|index| self.tiles[index])
    }

    /// Tile at a local position, `None` when out of range.
    #[inline]
    pub fn get_local(&self, pos: LocalPos) -> Option<Tile> {
        self.get(i64::from(pos.x), i64::from(pos.y))
    }

    /// Overwrite the tile at a local coordinate.
    ///
    /// Returns the previous tile. Out-of-range coordinates are rejected, never wrapped.
    pub fn set(&mut self, x: i64, y: i64, tile: Tile) -> Result<Tile> {
        let index = self.dims.index(x, y).ok_or_else(|| {
            Error::OutOfBounds(format!(
                "({x}, {y}) outside {}x{} chunk {}",
                self.dims.width, self.dims.height, self.pos
            ))
        })?;
        Ok(std::mem::replace(&mut self.tiles[index], tile))
    }

    /// Mutable row-major tiles, for bulk fills during generation.
    #[inline]
    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Tile at a linear index, `None` when out of range.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    /// Count cells of a given kind.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind == kind).count()
    }

    /// Compute which cells are revealed.
    pub fn visibility(&self) -> Vec<bool> {
        calculate_visibility(&self.tiles, self.dims)
    }
}
