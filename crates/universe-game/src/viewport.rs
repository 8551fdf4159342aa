//! Visible window onto the world.

use universe_core::coords::WorldPos;

/// Zoom level a new session starts at.
pub const INITIAL_ZOOM: i32 = 0;

const BASE_FONT_SIZE: i32 = 12;
const MIN_FONT_SIZE: i32 = 8;
const MAX_FONT_SIZE: i32 = 20;
const BASE_VISIBLE_TILES: i32 = 20;
const MIN_VISIBLE_TILES: i32 = 10;

/// A rectangle of world tiles plus the glyph size to draw them at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// World X of the left column.
    pub x: i64,
    /// World Y of the top row.
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

impl Viewport {
    /// Square viewport for a zoom level, anchored at the origin.
    ///
    /// Zooming in grows the font and shows fewer tiles.
    #[must_use]
    pub fn for_zoom(level: i32) -> Self {
        let step = level.saturating_mul(2);
        let font_size = BASE_FONT_SIZE
            .saturating_add(step)
            .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let tiles = BASE_VISIBLE_TILES.saturating_sub(step).max(MIN_VISIBLE_TILES);

        Self {
            x: 0,
            y: 0,
            width: tiles as u32,
            height: tiles as u32,
            font_size: font_size as u32,
        }
    }

    /// Viewport of an explicit size, anchored at the origin.
    #[must_use]
    pub const fn with_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            font_size: BASE_FONT_SIZE as u32,
        }
    }

    /// Same size, moved so `pos` sits in the middle.
    #[must_use]
    pub const fn centered_on(self, pos: WorldPos) -> Self {
        Self {
            x: pos.x - (self.width / 2) as i64,
            y: pos.y - (self.height / 2) as i64,
            ..self
        }
    }

    /// Returns true if the world position falls inside the viewport.
    pub const fn contains(&self, pos: WorldPos) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x < self.x + self.width as i64
            && pos.y < self.y + self.height as i64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::for_zoom(INITIAL_ZOOM)
    }
}
