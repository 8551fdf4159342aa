//! Render handoff: what to draw in each on-screen cell.

use hashbrown::HashMap;
use universe_core::coords::{ChunkPos, WorldPos};
use universe_core::types::{TileInfo, TileKind};

use crate::state::GameState;
use crate::viewport::Viewport;

/// One character-grid cell ready for a display adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderCell {
    pub screen_x: u32,
    pub screen_y: u32,
    pub symbol: char,
    pub fg: [u8; 3],
    pub bg: [u8; 3],
}

impl RenderCell {
    const fn new(screen_x: u32, screen_y: u32, info: TileInfo) -> Self {
        Self {
            screen_x,
            screen_y,
            symbol: info.symbol,
            fg: info.fg,
            bg: info.bg,
        }
    }
}

/// Cells of `viewport`, row by row.
///
/// Only resident chunks are drawn; anything else, and any hidden tile, is
/// blank on black. The player overlay is drawn on top. Nothing is loaded.
pub fn render_cells(state: &GameState, viewport: &Viewport) -> Vec<RenderCell> {
    let mut visibility: HashMap<ChunkPos, Vec<bool>> = HashMap::new();
    let mut cells = Vec::with_capacity(viewport.width as usize * viewport.height as usize);

    for screen_y in 0..viewport.height {
        for screen_x in 0..viewport.width {
            let pos = WorldPos::new(
                viewport.x + i64::from(screen_x),
                viewport.y + i64::from(screen_y),
            );
            let info = if pos == state.player {
                TileKind::Player.info()
            } else {
                tile_info(state, &mut visibility, pos)
            };
            cells.push(RenderCell::new(screen_x, screen_y, info));
        }
    }

    cells
}

fn tile_info(
    state: &GameState,
    visibility: &mut HashMap<ChunkPos, Vec<bool>>,
    pos: WorldPos,
) -> TileInfo {
    let dims = state.dims;
    let Some(local) = pos.local_pos(dims) else {
        return TileInfo::HIDDEN;
    };
    let chunk_pos = pos.chunk_pos(dims);
    let Some(chunk) = state.chunks.get(chunk_pos) else {
        return TileInfo::HIDDEN;
    };

    let index = local.to_index(dims);
    let revealed = visibility
        .entry(chunk_pos)
        .or_insert_with(|| chunk.visibility())
        .get(index)
        .copied()
        .unwrap_or(false);

    match chunk.get_index(index) {
        Some(tile) if revealed => tile.info(),
        _ => TileInfo::HIDDEN,
    }
}
