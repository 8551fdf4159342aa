//! Digging, placing and item selection.

use tracing::debug;
use universe_core::coords::WorldPos;
use universe_core::types::{Tile, TileKind};
use universe_core::{Error, Result};
use universe_world::{EditStore, LoadedChunks, TileChanged};

use crate::state::GameState;
use crate::world::GameWorld;

impl<S: EditStore> GameWorld<S> {
    /// Dig out the tile at `target` into the inventory.
    ///
    /// Air and out-of-world targets leave the state as it was.
    pub fn dig(&self, state: &GameState, target: WorldPos) -> Result<GameState> {
        let (tile, state) = self.get_tile(state, target)?;
        let Some(tile) = tile else {
            return Ok(state);
        };
        if tile.is_air() || tile.kind == TileKind::Player {
            return Ok(state);
        }

        let chunks = self.commit_tile(&state, target, Tile::AIR)?;
        let mut inventory = state.inventory.clone();
        let count = inventory.add(tile.kind);
        debug!(x = target.x, y = target.y, kind = tile.kind.name(), count, "dug tile");

        Ok(GameState {
            chunks,
            inventory,
            ..state
        })
    }

    /// Place one of the selected item into the air at `target`.
    ///
    /// Needs a selected item in stock and an air cell that the player is not
    /// standing in. Using up the last one clears the selection.
    pub fn place(&self, state: &GameState, target: WorldPos) -> Result<GameState> {
        let Some(kind) = state.selected_item else {
            return Ok(state.clone());
        };
        if state.inventory.count(kind) == 0 || target == state.player {
            return Ok(state.clone());
        }
        let (tile, state) = self.get_tile(state, target)?;
        if tile != Some(Tile::AIR) {
            return Ok(state);
        }

        let chunks = self.commit_tile(&state, target, Tile::new(kind))?;
        let mut inventory = state.inventory.clone();
        let remaining = inventory.take(kind).unwrap_or(0);
        debug!(x = target.x, y = target.y, kind = kind.name(), remaining, "placed tile");

        Ok(GameState {
            chunks,
            inventory,
            selected_item: (remaining > 0).then_some(kind),
            ..state
        })
    }

    /// Persist an edit, then patch the resident chunk to match.
    fn commit_tile(&self, state: &GameState, pos: WorldPos, tile: Tile) -> Result<LoadedChunks> {
        let dims = self.dims();
        let local = pos
            .local_pos(dims)
            .ok_or_else(|| Error::OutOfBounds(format!("({}, {}) is outside the world", pos.x, pos.y)))?;
        let chunk_x = pos.chunk_pos(dims).x;

        self.store().save_tile(chunk_x, local.x, local.y, tile)?;
        Ok(state.chunks.apply_tile_changed(&TileChanged {
            chunk_x,
            x: local.x,
            y: local.y,
            tile,
        }))
    }
}

/// Select an inventory entry for placing; kinds not in stock are ignored.
pub fn select_item(state: &GameState, kind: TileKind) -> GameState {
    if state.inventory.count(kind) == 0 || state.selected_item == Some(kind) {
        return state.clone();
    }
    GameState {
        selected_item: Some(kind),
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use universe_world::testing::ConstantNoise;
    use universe_world::{FileEditStore, MemoryEditStore, WorldConfig, WorldNoise};

    use crate::state::{create_initial_state, InitialParams};
    use crate::world::drain_tile_changes;

    fn flat_state() -> GameState {
        let mut state = create_initial_state(
            &InitialParams {
                seed: Some(77),
                ..InitialParams::default()
            },
            &WorldConfig::default(),
        );
        // surface at row 25, no caves, no trees
        state.noise = WorldNoise::new(ConstantNoise(0.0), ConstantNoise(0.0));
        state.player = WorldPos::new(0, 24);
        state
    }

    fn memory_world() -> GameWorld<MemoryEditStore> {
        GameWorld::new(&WorldConfig::default(), MemoryEditStore::new())
    }

    #[test]
    fn dig_moves_tile_into_inventory() {
        let world = memory_world();
        let state = flat_state();
        let target = WorldPos::new(1, 25);

        let dug = world.dig(&state, target).unwrap();
        assert_eq!(dug.inventory.count(TileKind::Ground), 1);
        assert_eq!(world.get_tile(&dug, target).unwrap().0, Some(Tile::AIR));
        assert_eq!(
            world.store().get_chunk(0).unwrap().and_then(|c| c.get(1, 25)),
            Some(Tile::AIR)
        );
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn dig_without_effect_keeps_state() {
        let world = memory_world();
        let state = world.manage_chunk_memory(&flat_state()).unwrap();
        for target in [WorldPos::new(3, 10), WorldPos::new(3, -1), WorldPos::new(3, 50)] {
            let next = world.dig(&state, target).unwrap();
            assert!(next.is_same(&state), "{target:?}");
        }
        assert_eq!(world.store().chunk_count(), 0);
    }

    #[test]
    fn select_requires_stock() {
        let world = memory_world();
        let state = flat_state();
        assert!(select_item(&state, TileKind::Ground).is_same(&state));

        let dug = world.dig(&state, WorldPos::new(1, 25)).unwrap();
        let selected = select_item(&dug, TileKind::Ground);
        assert_eq!(selected.selected_item, Some(TileKind::Ground));
        assert!(select_item(&selected, TileKind::Wood).is_same(&selected));
    }

    #[test]
    fn place_uses_up_selected_item() {
        let world = memory_world();
        let mut state = flat_state();
        state = world.dig(&state, WorldPos::new(1, 25)).unwrap();
        state = world.dig(&state, WorldPos::new(2, 25)).unwrap();
        state = select_item(&state, TileKind::Ground);

        state = world.place(&state, WorldPos::new(1, 20)).unwrap();
        assert_eq!(world.get_tile(&state, WorldPos::new(1, 20)).unwrap().0, Some(Tile::GROUND));
        assert_eq!(state.inventory.count(TileKind::Ground), 1);
        assert_eq!(state.selected_item, Some(TileKind::Ground));

        state = world.place(&state, WorldPos::new(2, 20)).unwrap();
        assert!(state.inventory.is_empty());
        assert_eq!(state.selected_item, None);

        // nothing selected anymore
        let next = world.place(&state, WorldPos::new(3, 20)).unwrap();
        assert!(next.is_same(&state));
    }

    #[test]
    fn place_rejects_occupied_cells() {
        let world = memory_world();
        let mut state = flat_state();
        state = world.dig(&state, WorldPos::new(1, 25)).unwrap();
        state = select_item(&state, TileKind::Ground);

        for target in [state.player, WorldPos::new(5, 30), WorldPos::new(5, 60)] {
            let next = world.place(&state, target).unwrap();
            assert!(next.is_same(&state), "{target:?}");
        }
    }

    #[test]
    fn own_edits_arrive_as_no_op_notifications() {
        let world = memory_world();
        let rx = world.subscribe();
        let state = world.dig(&flat_state(), WorldPos::new(4, 26)).unwrap();
        let drained = drain_tile_changes(&state, &rx);
        assert!(drained.is_same(&state));
    }

    #[test]
    fn dug_tiles_persist_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let target = WorldPos::new(-7, 30);
        let seed = flat_state().seed;
        {
            let world = GameWorld::new(
                &WorldConfig::default(),
                FileEditStore::open(dir.path(), seed).unwrap(),
            );
            world.dig(&flat_state(), target).unwrap();
        }

        let world = GameWorld::new(
            &WorldConfig::default(),
            FileEditStore::open(dir.path(), seed).unwrap(),
        );
        let (tile, _) = world.get_tile(&flat_state(), target).unwrap();
        assert_eq!(tile, Some(Tile::AIR));
        let (neighbor, _) = world.get_tile(&flat_state(), target.offset(1, 0)).unwrap();
        assert_eq!(neighbor, Some(Tile::GROUND));
    }
}
