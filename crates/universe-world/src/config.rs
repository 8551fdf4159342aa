//! World configuration loaded from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use universe_core::constants::{CHUNK_HEIGHT, CHUNK_WIDTH};
use universe_core::coords::ChunkDims;
use universe_core::{Error, Result};

use crate::generation::{TerrainConfig, TerrainGenerator};

/// Smallest chunk height that fits a trunk and its canopy above ground.
pub const MIN_CHUNK_HEIGHT: u32 = 4;

/// World-wide configuration.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub chunk_width: u32,
    pub chunk_height: u32,
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_width: CHUNK_WIDTH,
            chunk_height: CHUNK_HEIGHT,
            terrain: TerrainConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("failed to parse world config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("failed to serialize world config: {e}")))
    }

    /// Reject dimensions and noise scales the generator cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_width == 0 {
            return Err(Error::Config("chunk_width must be positive".into()));
        }
        if self.chunk_height < MIN_CHUNK_HEIGHT {
            return Err(Error::Config(format!(
                "chunk_height must be at least {MIN_CHUNK_HEIGHT}, got {}",
                self.chunk_height
            )));
        }
        let terrain = &self.terrain;
        for (name, scale) in [
            ("elevation_scale", terrain.elevation_scale),
            ("cave_scale", terrain.cave_scale),
            ("cave_depth_scale", terrain.cave_depth_scale),
            ("tree_scale", terrain.tree_scale),
        ] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(Error::Config(format!("{name} must be a positive number")));
            }
        }
        Ok(())
    }

    /// Chunk dimensions.
    pub const fn dims(&self) -> ChunkDims {
        ChunkDims::new(self.chunk_width, self.chunk_height)
    }

    /// Build a terrain generator for these settings.
    pub fn generator(&self) -> TerrainGenerator {
        TerrainGenerator::new(self.terrain.clone(), self.dims())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.dims(), ChunkDims::new(50, 50));
        assert!((config.terrain.tree_threshold - -0.4).abs() < f64::EPSILON);
        assert_eq!(config.terrain.cave_seed_offset, 2);
    }

    #[test]
    fn partial_override() {
        let config = WorldConfig::from_toml_str(
            r"
            chunk_width = 32

            [terrain]
            cave_threshold = 0.5
            ",
        )
        .unwrap();
        assert_eq!(config.chunk_width, 32);
        assert_eq!(config.chunk_height, 50);
        assert!((config.terrain.cave_threshold - 0.5).abs() < f64::EPSILON);
        assert!((config.terrain.elevation_scale - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            WorldConfig::from_toml_str("chunk_width = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("chunk_height = 3"),
            Err(Error::Config(_))
        ));
        assert!(WorldConfig::from_toml_str("chunk_height = 4").is_ok());
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(matches!(
            WorldConfig::from_toml_str("[terrain]\ntree_scale = 0.0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            WorldConfig::from_toml_str("chunk_width = \"wide\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn toml_round_trip_and_file_load() {
        let mut config = WorldConfig::default();
        config.chunk_height = 24;
        config.terrain.tree_threshold = -0.6;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.toml");
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(WorldConfig::load(&path).unwrap(), config);
        assert!(matches!(
            WorldConfig::load(dir.path().join("missing.toml")),
            Err(Error::Io(_))
        ));
    }
}
