//! Player movement resolution.

use tracing::trace;
use universe_core::coords::WorldPos;
use universe_core::types::Tile;
use universe_core::Result;
use universe_world::EditStore;

use crate::state::GameState;
use crate::world::GameWorld;

/// A single grid step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a DOM-style arrow key name (`"ArrowUp"`, ...).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// `(dx, dy)` of one step; Y grows downward.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Terrain lookups the movement resolver needs.
///
/// Both methods may load chunks and return the resulting state.
pub trait TerrainAccess {
    /// Tile at a world position, `None` outside the world.
    fn tile_at(&self, state: &GameState, pos: WorldPos) -> Result<(Option<Tile>, GameState)>;

    /// Rebalance resident chunks around `state.current_chunk`.
    fn rebalance(&self, state: &GameState) -> Result<GameState>;
}

impl<S: EditStore> TerrainAccess for GameWorld<S> {
    fn tile_at(&self, state: &GameState, pos: WorldPos) -> Result<(Option<Tile>, GameState)> {
        self.get_tile(state, pos)
    }

    fn rebalance(&self, state: &GameState) -> Result<GameState> {
        self.manage_chunk_memory(state)
    }
}

/// Resolve one step of player movement.
///
/// Blocked moves leave the player where it was; the returned state still
/// carries any chunk the lookup had to load. Crossing into another chunk
/// rebalances the resident window.
pub fn move_player(
    state: &GameState,
    direction: Direction,
    terrain: &impl TerrainAccess,
) -> Result<GameState> {
    let (dx, dy) = direction.delta();
    let target = state.player.offset(dx, dy);
    let (tile, resolved) = terrain.tile_at(state, target)?;

    let mut player = if tile.is_some_and(Tile::is_walkable) {
        target
    } else {
        state.player
    };
    player.y = player.y.clamp(0, i64::from(state.dims.height) - 1);

    if player == state.player {
        return Ok(resolved);
    }

    let current_chunk = player.chunk_pos(state.dims);
    let moved = GameState {
        player,
        current_chunk,
        ..resolved
    };

    if current_chunk == state.current_chunk {
        Ok(moved)
    } else {
        trace!(from = %state.current_chunk, to = %current_chunk, "player crossed chunk boundary");
        terrain.rebalance(&moved)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use hashbrown::HashMap;
    use universe_core::coords::ChunkPos;
    use universe_world::testing::ConstantNoise;
    use universe_world::{MemoryEditStore, WorldConfig, WorldNoise};

    use super::*;
    use crate::state::{create_initial_state, InitialParams};

    /// Open air everywhere except the listed cells.
    #[derive(Default)]
    struct MockTerrain {
        tiles: HashMap<(i64, i64), Tile>,
        rebalances: Cell<usize>,
    }

    impl MockTerrain {
        fn with(cells: &[((i64, i64), Tile)]) -> Self {
            Self {
                tiles: cells.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl TerrainAccess for MockTerrain {
        fn tile_at(&self, state: &GameState, pos: WorldPos) -> Result<(Option<Tile>, GameState)> {
            if pos.y < 0 || pos.y >= i64::from(state.dims.height) {
                return Ok((None, state.clone()));
            }
            let tile = self.tiles.get(&(pos.x, pos.y)).copied().unwrap_or(Tile::AIR);
            Ok((Some(tile), state.clone()))
        }

        fn rebalance(&self, state: &GameState) -> Result<GameState> {
            self.rebalances.set(self.rebalances.get() + 1);
            Ok(state.clone())
        }
    }

    fn state_at(x: i64, y: i64) -> GameState {
        let mut state = create_initial_state(
            &InitialParams {
                seed: Some(1),
                ..InitialParams::default()
            },
            &WorldConfig::default(),
        );
        state.player = WorldPos::new(x, y);
        state.current_chunk = state.player.chunk_pos(state.dims);
        state
    }

    #[test]
    fn key_names() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_key("Space"), None);
    }

    #[test]
    fn ground_blocks_movement() {
        let terrain = MockTerrain::with(&[((6, 5), Tile::GROUND)]);
        let state = state_at(5, 5);
        let next = move_player(&state, Direction::Right, &terrain).unwrap();
        assert_eq!(next.player, WorldPos::new(5, 5));
        assert!(next.is_same(&state));
    }

    #[test]
    fn air_allows_movement() {
        let terrain = MockTerrain::with(&[((6, 5), Tile::AIR)]);
        let state = state_at(5, 5);
        let next = move_player(&state, Direction::Right, &terrain).unwrap();
        assert_eq!(next.player, WorldPos::new(6, 5));
        assert!(!next.is_same(&state));
    }

    #[test]
    fn every_direction_steps_once() {
        let terrain = MockTerrain::default();
        let state = state_at(10, 10);
        for (direction, expected) in [
            (Direction::Up, (10, 9)),
            (Direction::Down, (10, 11)),
            (Direction::Left, (9, 10)),
            (Direction::Right, (11, 10)),
        ] {
            let next = move_player(&state, direction, &terrain).unwrap();
            assert_eq!((next.player.x, next.player.y), expected, "{direction:?}");
        }
    }

    #[test]
    fn vertical_movement_is_clamped() {
        let terrain = MockTerrain::default();
        let top = state_at(3, 0);
        assert_eq!(move_player(&top, Direction::Up, &terrain).unwrap().player.y, 0);

        let bottom = state_at(3, 49);
        let next = move_player(&bottom, Direction::Down, &terrain).unwrap();
        assert_eq!(next.player.y, 49);
        assert!(next.is_same(&bottom));
    }

    #[test]
    fn crossing_right_boundary_rebalances() {
        let terrain = MockTerrain::default();
        let state = state_at(49, 10);
        let next = move_player(&state, Direction::Right, &terrain).unwrap();
        assert_eq!(next.player.x, 50);
        assert_eq!(next.current_chunk, ChunkPos::new(1));
        assert_eq!(terrain.rebalances.get(), 1);
    }

    #[test]
    fn crossing_into_negative_chunk() {
        let terrain = MockTerrain::default();
        let state = state_at(0, 10);
        let next = move_player(&state, Direction::Left, &terrain).unwrap();
        assert_eq!(next.player.x, -1);
        assert_eq!(next.current_chunk, ChunkPos::new(-1));
        assert_eq!(terrain.rebalances.get(), 1);
    }

    #[test]
    fn moving_within_chunk_does_not_rebalance() {
        let terrain = MockTerrain::default();
        let state = state_at(20, 10);
        move_player(&state, Direction::Right, &terrain).unwrap();
        move_player(&state, Direction::Up, &terrain).unwrap();
        assert_eq!(terrain.rebalances.get(), 0);
    }

    #[test]
    fn walking_through_generated_world() {
        let config = WorldConfig::default();
        let world = GameWorld::new(&config, MemoryEditStore::new());
        // surface at row 15, trunks on rows 13-14, canopy on row 12
        let mut state = state_at(47, 5);
        state.noise = WorldNoise::new(ConstantNoise(-1.0), ConstantNoise(0.0));
        state = world.manage_chunk_memory(&state).unwrap();

        for _ in 0..5 {
            state = move_player(&state, Direction::Right, &world).unwrap();
        }
        assert_eq!(state.player, WorldPos::new(52, 5));
        assert_eq!(state.current_chunk, ChunkPos::new(1));
        assert_eq!(
            state.chunks.positions(),
            vec![ChunkPos::new(0), ChunkPos::new(1), ChunkPos::new(2)]
        );

        // leaves are solid, so a downward walk stops just above the canopy
        for _ in 0..10 {
            state = move_player(&state, Direction::Down, &world).unwrap();
        }
        assert_eq!(state.player.y, 11);
    }

    #[test]
    fn blocked_lookup_keeps_loaded_chunk() {
        let config = WorldConfig::default();
        let world = GameWorld::new(&config, MemoryEditStore::new());
        let mut state = state_at(0, 30);
        state.noise = WorldNoise::new(ConstantNoise(0.0), ConstantNoise(0.0));

        let next = move_player(&state, Direction::Left, &world).unwrap();
        assert_eq!(next.player, state.player);
        assert!(next.chunks.contains(ChunkPos::new(-1)));
    }
}
