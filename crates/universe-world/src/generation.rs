//! Procedural terrain generation.
//!
//! Every sample is taken at world coordinates (`world_x = chunk_x * width + local_x`),
//! so adjacent chunks tile without seams and a chunk's tiles never depend on
//! which of its neighbors were generated first.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use universe_core::coords::{ChunkDims, ChunkPos};
use universe_core::types::{Tile, TileKind};

use crate::chunk::Chunk;
use crate::noise_source::{NoiseSource, WorldNoise};
use crate::storage::TileOverride;

/// Terrain generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Horizontal divisor applied to world X before sampling elevation.
    pub elevation_scale: f64,
    /// Elevation swing as a fraction of chunk height.
    pub elevation_amplitude: f64,
    /// Divisor applied to world X/Y for the first two cave noise axes.
    pub cave_scale: f64,
    /// Divisor applied to world Y for the third cave noise axis.
    pub cave_depth_scale: f64,
    /// Cave noise above this carves ground into air.
    pub cave_threshold: f64,
    /// Divisor applied to world X/Y when sampling tree placement.
    pub tree_scale: f64,
    /// Tree noise below this plants a tree.
    pub tree_threshold: f64,
    /// Added to the world seed for the cave noise instance.
    pub cave_seed_offset: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            elevation_scale: 10.0,
            elevation_amplitude: 0.2,
            cave_scale: 15.0,
            cave_depth_scale: 10.0,
            cave_threshold: 0.3,
            tree_scale: 5.0,
            tree_threshold: -0.4,
            cave_seed_offset: 2,
        }
    }
}

/// Procedural terrain generator.
///
/// Holds no noise of its own; noise instances are passed per call so the
/// generator stays a pure function of `(chunk, noise)`.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: TerrainConfig,
    dims: ChunkDims,
}

impl TerrainGenerator {
    /// Create a new terrain generator.
    pub const fn new(config: TerrainConfig, dims: ChunkDims) -> Self {
        Self { config, dims }
    }

    /// Get the terrain configuration.
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Chunk dimensions this generator fills.
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// First ground row of the column at `world_x`.
    ///
    /// Rows at or below this Y start as ground; rows above start as air.
    pub fn surface_height(&self, terrain: &dyn NoiseSource, world_x: i64) -> i64 {
        let height = f64::from(self.dims.height);
        let sample = terrain.sample_2d(world_x as f64 / self.config.elevation_scale, 0.0);
        // rows are integers, so `y >= floor(..) + height / 2` rounds the half up
        (sample * height * self.config.elevation_amplitude).floor() as i64
            + i64::from(self.dims.height.div_ceil(2))
    }

    /// Elevation and cave passes only, without structures.
    pub fn generate_terrain(&self, chunk_x: i32, noise: &WorldNoise) -> Chunk {
        let pos = ChunkPos::new(chunk_x);
        let origin_x = pos.origin_x(self.dims);
        let mut chunk = Chunk::new(pos, self.dims);
        let tiles = chunk.tiles_mut();

        for x in 0..self.dims.width {
            let world_x = origin_x + i64::from(x);
            let surface = self.surface_height(noise.terrain.as_ref(), world_x);

            for y in 0..self.dims.height {
                let world_y = f64::from(y);
                let index = (y * self.dims.width + x) as usize;

                if i64::from(y) < surface {
                    continue;
                }
                let cave = noise.cave.sample_3d(
                    world_x as f64 / self.config.cave_scale,
                    world_y / self.config.cave_scale,
                    world_y / self.config.cave_depth_scale,
                );
                if cave <= self.config.cave_threshold {
                    tiles[index] = Tile::GROUND;
                }
            }
        }

        chunk
    }

    /// Generate a chunk's tiles: elevation, caves, then trees.
    pub fn generate_chunk(&self, chunk_x: i32, noise: &WorldNoise) -> Chunk {
        let mut chunk = self.generate_terrain(chunk_x, noise);
        let trees = self.plant_trees(&mut chunk, noise.terrain.as_ref());
        debug!(chunk = %chunk.pos, trees, "generated chunk");
        chunk
    }

    /// Second sweep over finished terrain: ground with air directly above may grow a tree.
    ///
    /// A tree is a 2-tall wood trunk on the ground cell plus a 3x2 leaf canopy
    /// around the trunk top. Leaves only fill air, and everything is clipped
    /// at the chunk edges.
    fn plant_trees(&self, chunk: &mut Chunk, terrain: &dyn NoiseSource) -> usize {
        let origin_x = chunk.pos.origin_x(self.dims);
        let mut planted = 0;

        for x in 0..i64::from(self.dims.width) {
            let world_x = origin_x + x;
            for y in 1..i64::from(self.dims.height) {
                if chunk.get(x, y) != Some(Tile::GROUND) || chunk.get(x, y - 1) != Some(Tile::AIR)
                {
                    continue;
                }
                let sample = terrain.sample_2d(
                    world_x as f64 / self.config.tree_scale,
                    y as f64 / self.config.tree_scale,
                );
                if sample >= self.config.tree_threshold {
                    continue;
                }

                // in-range by the loop bounds; the top trunk cell is clipped by `set`
                let _ = chunk.set(x, y - 1, Tile::WOOD);
                let _ = chunk.set(x, y - 2, Tile::WOOD);
                for ly in y - 3..=y - 2 {
                    for lx in x - 1..=x + 1 {
                        if chunk.get(lx, ly) == Some(Tile::AIR) {
                            let _ = chunk.set(lx, ly, Tile::LEAF);
                        }
                    }
                }
                planted += 1;
            }
        }

        planted
    }
}

/// Overwrite generated cells with persisted overrides.
///
/// Out-of-range overrides are skipped with a warning. Returns how many were applied.
pub fn apply_overrides(chunk: &mut Chunk, overrides: &[TileOverride]) -> usize {
    let mut applied = 0;
    for entry in overrides {
        if entry.tile.kind == TileKind::Player {
            warn!(chunk = %chunk.pos, x = entry.x, y = entry.y, "ignoring player overlay stored as override");
            continue;
        }
        match chunk.set(i64::from(entry.x), i64::from(entry.y), entry.tile) {
            Ok(_) => applied += 1,
            Err(err) => warn!(chunk = %chunk.pos, %err, "skipping override"),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::testing::{ConstantNoise, FnNoise};

    const DIMS: ChunkDims = ChunkDims::new(16, 20);

    fn test_generator() -> TerrainGenerator {
        TerrainGenerator::new(TerrainConfig::default(), DIMS)
    }

    fn flat_noise(terrain: f64) -> WorldNoise {
        // caves never carve below the 0.3 threshold
        WorldNoise::new(ConstantNoise(terrain), ConstantNoise(0.0))
    }

    #[test]
    fn chunk_has_every_cell_filled() {
        let chunk = test_generator().generate_chunk(3, &WorldNoise::from_seed(42, 2));
        assert_eq!(chunk.tiles().len(), DIMS.area());
        assert_eq!(chunk.dims(), DIMS);
        assert_eq!(chunk.pos, ChunkPos::new(3));
    }

    #[test]
    fn flat_noise_gives_flat_surface() {
        // sample 0 => surface at height / 2, tree sample 0 never plants
        let chunk = test_generator().generate_chunk(0, &flat_noise(0.0));
        for x in 0..16 {
            for y in 0..20 {
                let expected = if y >= 10 { Tile::GROUND } else { Tile::AIR };
                assert_eq!(chunk.get(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn elevation_follows_noise_amplitude() {
        // sample 0.5 => floor(0.5 * 20 * 0.2) + 10 = 12
        let generator = test_generator();
        assert_eq!(generator.surface_height(&ConstantNoise(0.5), 7), 12);
        // sample -1 => floor(-4) + 10 = 6
        assert_eq!(generator.surface_height(&ConstantNoise(-1.0), 7), 6);
    }

    #[test]
    fn caves_carve_ground_above_threshold() {
        let noise = WorldNoise::new(ConstantNoise(0.0), ConstantNoise(0.31));
        let chunk = test_generator().generate_terrain(0, &noise);
        assert_eq!(chunk.count(TileKind::Ground), 0);
        assert_eq!(chunk.count(TileKind::Air), DIMS.area());
    }

    #[test]
    fn caves_depend_on_world_position() {
        // carve only the band of rows 14..16 (world_y / 10 in [1.4, 1.6))
        let cave = FnNoise(|_x: f64, _y: f64, z: f64| if (1.4..1.6).contains(&z) { 0.9 } else { 0.0 });
        let noise = WorldNoise::new(ConstantNoise(0.0), cave);
        let chunk = test_generator().generate_terrain(-2, &noise);
        for x in 0..16 {
            assert_eq!(chunk.get(x, 13), Some(Tile::GROUND));
            assert_eq!(chunk.get(x, 14), Some(Tile::AIR));
            assert_eq!(chunk.get(x, 15), Some(Tile::AIR));
            assert_eq!(chunk.get(x, 16), Some(Tile::GROUND));
        }
    }

    #[test]
    fn trees_grow_where_noise_is_low() {
        // elevation sample -0.5 => surface at floor(-2) + 10 = 8; same sample plants trees
        let chunk = test_generator().generate_chunk(0, &flat_noise(-0.5));

        for x in 0..16 {
            assert_eq!(chunk.get(x, 7), Some(Tile::WOOD), "trunk base at x={x}");
            assert_eq!(chunk.get(x, 6), Some(Tile::WOOD), "trunk top at x={x}");
            assert_eq!(chunk.get(x, 5), Some(Tile::LEAF), "canopy at x={x}");
            assert_eq!(chunk.get(x, 4), Some(Tile::AIR));
            assert_eq!(chunk.get(x, 8), Some(Tile::GROUND));
        }
    }

    #[test]
    fn single_tree_shape() {
        let generator = test_generator();
        // tree noise is sampled at world_x / 5; plant only at world x = 5
        let terrain = FnNoise(|x: f64, y: f64, _z: f64| {
            if y == 0.0 {
                0.0
            } else if (x - 1.0).abs() < 1e-9 {
                -0.9
            } else {
                0.9
            }
        });
        let noise = WorldNoise::new(terrain, ConstantNoise(0.0));
        let chunk = generator.generate_chunk(0, &noise);

        assert_eq!(chunk.count(TileKind::Wood), 2);
        assert_eq!(chunk.get(5, 9), Some(Tile::WOOD));
        assert_eq!(chunk.get(5, 8), Some(Tile::WOOD));
        for lx in 4..=6 {
            assert_eq!(chunk.get(lx, 7), Some(Tile::LEAF));
        }
        assert_eq!(chunk.get(4, 8), Some(Tile::LEAF));
        assert_eq!(chunk.get(6, 8), Some(Tile::LEAF));
        // leaves never replace the trunk
        assert_eq!(chunk.count(TileKind::Leaf), 5);
    }

    #[test]
    fn canopy_is_clipped_at_chunk_edge() {
        let terrain = FnNoise(|x: f64, y: f64, _z: f64| {
            if y == 0.0 {
                0.0
            } else if x.abs() < 1e-9 {
                -0.9
            } else {
                0.9
            }
        });
        let noise = WorldNoise::new(terrain, ConstantNoise(0.0));
        let chunk = test_generator().generate_chunk(0, &noise);

        assert_eq!(chunk.get(0, 9), Some(Tile::WOOD));
        assert_eq!(chunk.get(1, 8), Some(Tile::LEAF));
        assert_eq!(chunk.count(TileKind::Leaf), 3);
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = test_generator();
        let noise = WorldNoise::from_seed(12_345, 2);
        for chunk_x in -3..3 {
            let a = generator.generate_chunk(chunk_x, &noise);
            let b = generator.generate_chunk(chunk_x, &WorldNoise::from_seed(12_345, 2));
            assert_eq!(a, b, "chunk {chunk_x} differs between runs");
        }
    }

    #[test]
    fn generation_ignores_neighbor_order() {
        let generator = test_generator();
        let noise = WorldNoise::from_seed(99, 2);
        let forward: Vec<_> = (0..4).map(|x| generator.generate_chunk(x, &noise)).collect();
        let backward: Vec<_> = (0..4).rev().map(|x| generator.generate_chunk(x, &noise)).collect();
        for (a, b) in forward.iter().zip(backward.iter().rev()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn terrain_is_seamless_across_chunks() {
        let narrow = test_generator();
        let wide = TerrainGenerator::new(
            TerrainConfig::default(),
            ChunkDims::new(DIMS.width * 2, DIMS.height),
        );
        let noise = WorldNoise::from_seed(7, 2);

        let wide_chunk = wide.generate_terrain(1, &noise);
        let left = narrow.generate_terrain(2, &noise);
        let right = narrow.generate_terrain(3, &noise);

        for y in 0..i64::from(DIMS.height) {
            for x in 0..i64::from(DIMS.width) {
                assert_eq!(wide_chunk.get(x, y), left.get(x, y));
                assert_eq!(wide_chunk.get(x + 16, y), right.get(x, y));
            }
        }

        let boundary = ChunkPos::new(3).origin_x(DIMS);
        let terrain = noise.terrain.as_ref();
        assert_eq!(
            narrow.surface_height(terrain, boundary - 1),
            wide.surface_height(terrain, boundary - 1)
        );
    }

    #[test]
    fn real_noise_produces_air_and_ground() {
        let generator = TerrainGenerator::new(TerrainConfig::default(), ChunkDims::DEFAULT);
        let chunk = generator.generate_chunk(0, &WorldNoise::from_seed(42, 2));
        assert!(chunk.count(TileKind::Air) > 0);
        assert!(chunk.count(TileKind::Ground) > 0);
        assert_eq!(chunk.count(TileKind::Player), 0);
    }

    #[test]
    fn overrides_win_over_generation() {
        let mut chunk = test_generator().generate_chunk(0, &flat_noise(0.0));
        let overrides = [
            TileOverride::new(3, 15, Tile::AIR),
            TileOverride::new(4, 2, Tile::new(TileKind::Stone)),
        ];
        assert_eq!(apply_overrides(&mut chunk, &overrides), 2);
        assert_eq!(chunk.get(3, 15), Some(Tile::AIR));
        assert_eq!(chunk.get(4, 2), Some(Tile::new(TileKind::Stone)));
    }

    #[test]
    fn out_of_range_overrides_are_skipped() {
        let mut chunk = test_generator().generate_chunk(0, &flat_noise(0.0));
        let before = chunk.clone();
        let overrides = [
            TileOverride::new(16, 0, Tile::GROUND),
            TileOverride::new(0, 20, Tile::GROUND),
            TileOverride::new(0, 0, Tile::new(TileKind::Player)),
        ];
        assert_eq!(apply_overrides(&mut chunk, &overrides), 0);
        assert_eq!(chunk, before);
    }
}
