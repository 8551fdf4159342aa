//! Terminal rendering.

mod map;
mod view;

pub use view::GameView;
