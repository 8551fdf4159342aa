//! Coordinate systems for the tile world.
//!
//! The world is unbounded along X and fixed-height along Y. Chunks page only
//! horizontally, so every chunk lives on row [`CHUNK_ROW`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CHUNK_HEIGHT, CHUNK_ROW, CHUNK_WIDTH};
use crate::error::{Error, Result};

/// Tile dimensions of one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDims {
    pub width: u32,
    pub height: u32,
}

impl ChunkDims {
    /// Dimensions from the compile-time constants.
    pub const DEFAULT: Self = Self::new(CHUNK_WIDTH, CHUNK_HEIGHT);

    /// Create new chunk dimensions
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tiles in a chunk
    #[inline]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if the local coordinate lies inside the chunk
    #[inline]
    pub const fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Row-major linear index of a local coordinate, `None` if out of range
    #[inline]
    pub const fn index(self, x: i64, y: i64) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Position within a chunk (0 to width-1, 0 to height-1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: u32,
    pub y: u32,
}

impl LocalPos {
    /// Create a new local position
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Convert to linear index for flat array storage
    #[inline]
    pub const fn to_index(self, dims: ChunkDims) -> usize {
        self.x as usize + self.y as usize * dims.width as usize
    }

    /// Create from linear index
    #[inline]
    pub const fn from_index(index: usize, dims: ChunkDims) -> Self {
        let width = dims.width as usize;
        Self {
            x: (index % width) as u32,
            y: (index / width) as u32,
        }
    }
}

/// Chunk position in chunk coordinates.
///
/// Displays as the chunk key `"x,y"`, e.g. `"-1,0"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
}

impl ChunkPos {
    /// Create a chunk position on the fixed chunk row
    #[inline]
    pub const fn new(x: i32) -> Self {
        Self { x, y: CHUNK_ROW }
    }

    /// Chunk containing a world X coordinate.
    ///
    /// Saturates at the `i32` chunk range instead of wrapping.
    #[inline]
    pub const fn containing(world_x: i64, dims: ChunkDims) -> Self {
        let x = world_x.div_euclid(dims.width as i64);
        if x > i32::MAX as i64 {
            Self::new(i32::MAX)
        } else if x < i32::MIN as i64 {
            Self::new(i32::MIN)
        } else {
            Self::new(x as i32)
        }
    }

    /// World X of the chunk's left edge
    #[inline]
    pub const fn origin_x(self, dims: ChunkDims) -> i64 {
        self.x as i64 * dims.width as i64
    }

    /// The chunk itself plus its immediate left and right neighbors.
    ///
    /// Fails for the outermost chunks, which have no neighbor on one side.
    pub fn window(self) -> Result<[Self; 3]> {
        match (self.x.checked_sub(1), self.x.checked_add(1)) {
            (Some(left), Some(right)) => Ok([Self::new(left), self, Self::new(right)]),
            _ => Err(Error::OutOfBounds(format!(
                "chunk {} has no window inside the chunk range",
                self.x
            ))),
        }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// World position in tile coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i64,
    pub y: i64,
}

impl WorldPos {
    /// Create a new world position
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Get the chunk containing this position
    #[inline]
    pub const fn chunk_pos(self, dims: ChunkDims) -> ChunkPos {
        ChunkPos::containing(self.x, dims)
    }

    /// Get the local position within the chunk, `None` when Y is outside the world
    #[inline]
    pub const fn local_pos(self, dims: ChunkDims) -> Option<LocalPos> {
        if self.y < 0 || self.y >= dims.height as i64 {
            return None;
        }
        Some(LocalPos::new(
            self.x.rem_euclid(dims.width as i64) as u32,
            self.y as u32,
        ))
    }

    /// Create from chunk and local position
    #[inline]
    pub const fn from_chunk_local(chunk: ChunkPos, local: LocalPos, dims: ChunkDims) -> Self {
        Self::new(chunk.origin_x(dims) + local.x as i64, local.y as i64)
    }

    /// Position offset by a step
    #[inline]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}
