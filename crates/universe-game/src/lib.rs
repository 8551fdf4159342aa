//! Game layer for the Universe tile world.
//!
//! Everything here threads an immutable [`GameState`] snapshot: each
//! operation takes the current state and returns the next one, and an
//! operation that changes nothing returns a state for which
//! [`GameState::is_same`] holds, so callers can skip redraws.

pub mod interaction;
pub mod inventory;
pub mod movement;
pub mod render;
pub mod state;
pub mod viewport;
pub mod world;

pub use interaction::select_item;
pub use inventory::Inventory;
pub use movement::{move_player, Direction, TerrainAccess};
pub use render::{render_cells, RenderCell};
pub use state::{create_initial_state, GameState, InitialParams};
pub use viewport::Viewport;
pub use world::{apply_tile_changed, drain_tile_changes, GameWorld};
