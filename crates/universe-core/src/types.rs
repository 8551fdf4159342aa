//! Tile types and their display descriptors.

use serde::{Deserialize, Serialize};

/// Kind of a tile.
///
/// [`TileKind::Player`] is a render-only overlay and is never stored in a chunk.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileKind {
    #[default]
    Air,
    Ground,
    Stone,
    Dirt,
    Grass,
    Water,
    Sand,
    Wood,
    Leaf,
    Player,
}

impl TileKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Air,
        Self::Ground,
        Self::Stone,
        Self::Dirt,
        Self::Grass,
        Self::Water,
        Self::Sand,
        Self::Wood,
        Self::Leaf,
        Self::Player,
    ];

    /// Static display and collision descriptor for this kind.
    pub const fn info(self) -> TileInfo {
        match self {
            Self::Air => TileInfo::new(' ', [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], true, true),
            Self::Ground => TileInfo::new('=', [0x8B, 0x5A, 0x2B], [0x3D, 0x28, 0x17], false, false),
            Self::Stone => TileInfo::new('#', [0x80, 0x80, 0x80], [0x60, 0x60, 0x60], false, false),
            Self::Dirt => TileInfo::new('.', [0x8B, 0x45, 0x13], [0x5A, 0x2D, 0x0A], false, false),
            Self::Grass => TileInfo::new(',', [0x7C, 0xFC, 0x00], [0x4B, 0x8B, 0x0B], false, false),
            Self::Water => TileInfo::new('~', [0x00, 0xBF, 0xFF], [0x00, 0x00, 0xFF], true, true),
            Self::Sand => TileInfo::new('.', [0xF4, 0xA4, 0x60], [0xD2, 0xB4, 0x8C], false, false),
            Self::Wood => TileInfo::new('|', [0x8B, 0x45, 0x13], [0x5A, 0x2D, 0x0A], false, false),
            Self::Leaf => TileInfo::new('*', [0x22, 0x8B, 0x22], [0x00, 0x64, 0x00], false, true),
            Self::Player => TileInfo::new('@', [0xFF, 0xFF, 0xFF], [0x00, 0x00, 0x00], false, true),
        }
    }

    /// Returns true for tree parts (wood and leaves)
    #[inline]
    pub const fn is_tree(self) -> bool {
        matches!(self, Self::Wood | Self::Leaf)
    }

    /// Upper-case name, matching the serialized form
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "AIR",
            Self::Ground => "GROUND",
            Self::Stone => "STONE",
            Self::Dirt => "DIRT",
            Self::Grass => "GRASS",
            Self::Water => "WATER",
            Self::Sand => "SAND",
            Self::Wood => "WOOD",
            Self::Leaf => "LEAF",
            Self::Player => "PLAYER",
        }
    }
}

/// Display and collision properties of a tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileInfo {
    /// Glyph drawn on the character grid
    pub symbol: char,
    /// Foreground color (RGB, 0-255)
    pub fg: [u8; 3],
    /// Background color (RGB, 0-255)
    pub bg: [u8; 3],
    /// Whether the player may stand on this tile
    pub walkable: bool,
    /// Whether light passes through this tile
    pub transparent: bool,
}

impl TileInfo {
    /// Descriptor used for cells that are not revealed
    pub const HIDDEN: Self = Self::new(' ', [0, 0, 0], [0, 0, 0], false, false);

    const fn new(symbol: char, fg: [u8; 3], bg: [u8; 3], walkable: bool, transparent: bool) -> Self {
        Self {
            symbol,
            fg,
            bg,
            walkable,
            transparent,
        }
    }
}

/// A single tile stored in a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// The tile type
    #[serde(rename = "type")]
    pub kind: TileKind,
}

impl Tile {
    /// Air tile
    pub const AIR: Self = Self::new(TileKind::Air);
    /// Ground tile
    pub const GROUND: Self = Self::new(TileKind::Ground);
    /// Wood (tree trunk) tile
    pub const WOOD: Self = Self::new(TileKind::Wood);
    /// Leaf (tree canopy) tile
    pub const LEAF: Self = Self::new(TileKind::Leaf);

    /// Create a new tile of the given kind
    #[inline]
    pub const fn new(kind: TileKind) -> Self {
        Self { kind }
    }

    /// Returns true if this tile is air
    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self.kind, TileKind::Air)
    }

    /// Returns true if the player may stand on this tile
    #[inline]
    pub const fn is_walkable(self) -> bool {
        self.kind.info().walkable
    }

    /// Display descriptor of this tile
    #[inline]
    pub const fn info(self) -> TileInfo {
        self.kind.info()
    }
}

impl From<TileKind> for Tile {
    fn from(kind: TileKind) -> Self {
        Self::new(kind)
    }
}
