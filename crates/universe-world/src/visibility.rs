//! Reveal computation over a chunk's tiles.
//!
//! Open air reveals itself and its four orthogonal neighbors. Any tree part
//! (wood or leaf) revealed that way seeds a breadth-first walk over
//! 8-connected tree parts, so a tree touching air anywhere is revealed whole.
//! Nothing wraps around the chunk edges.

use std::collections::VecDeque;

use universe_core::coords::ChunkDims;
use universe_core::types::{Tile, TileKind};

const ORTHOGONAL: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const SURROUNDING: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Compute the per-cell visibility of a row-major tile grid.
///
/// `tiles` must hold exactly `dims.area()` cells; any shortfall is treated as
/// hidden, never read past.
pub fn calculate_visibility(tiles: &[Tile], dims: ChunkDims) -> Vec<bool> {
    let mut visible = vec![false; dims.area()];
    let mut queue = VecDeque::new();

    let kind_at = |index: usize| tiles.get(index).map(|tile| tile.kind);

    for y in 0..i64::from(dims.height) {
        for x in 0..i64::from(dims.width) {
            let Some(index) = dims.index(x, y) else {
                continue;
            };
            if kind_at(index) != Some(TileKind::Air) {
                continue;
            }
            visible[index] = true;

            for (dx, dy) in ORTHOGONAL {
                let Some(neighbor) = dims.index(x + dx, y + dy) else {
                    continue;
                };
                if visible[neighbor] {
                    continue;
                }
                visible[neighbor] = true;
                if kind_at(neighbor).is_some_and(|kind| kind.is_tree()) {
                    queue.push_back((x + dx, y + dy));
                }
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in SURROUNDING {
            let Some(neighbor) = dims.index(x + dx, y + dy) else {
                continue;
            };
            if !visible[neighbor] && kind_at(neighbor).is_some_and(|kind| kind.is_tree()) {
                visible[neighbor] = true;
                queue.push_back((x + dx, y + dy));
            }
        }
    }

    visible
}
