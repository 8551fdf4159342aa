//! Seeded coherent-noise sources.
//!
//! Generation only ever reads noise through [`NoiseSource`], so tests can
//! swap in the fixed sources from `testing` (feature `test-util`) and assert
//! exact tile layouts.

use std::fmt;
use std::sync::Arc;

use ::noise::{NoiseFn, Simplex};

use crate::WorldSeed;

/// Deterministic 2D/3D noise with samples in `[-1, 1]`.
///
/// Identical inputs must yield identical outputs for the lifetime of an instance.
pub trait NoiseSource: Send + Sync {
    /// Sample the 2D field.
    fn sample_2d(&self, x: f64, y: f64) -> f64;

    /// Sample the 3D field.
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Clamp an arbitrary seed into the generator's safe, non-zero range.
///
/// Simplex permutation tables are low quality at seed 0 and at very large
/// magnitudes, so seeds are folded into `1..=65536`.
#[inline]
pub const fn clamp_seed(seed: u64) -> WorldSeed {
    (seed % 65_536) as WorldSeed + 1
}

/// Simplex noise from the `noise` crate.
#[derive(Clone)]
pub struct SimplexNoise {
    seed: WorldSeed,
    inner: Simplex,
}

impl SimplexNoise {
    /// Create a simplex source for an already clamped seed.
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            inner: Simplex::new(seed),
        }
    }

    /// Seed this instance was built from.
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }
}

impl fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplexNoise")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl NoiseSource for SimplexNoise {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.inner.get([x, y]).clamp(-1.0, 1.0)
    }

    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.inner.get([x, y, z]).clamp(-1.0, 1.0)
    }
}

/// The pair of noise handles a world is generated from.
///
/// Elevation and tree placement read `terrain`; cave carving reads `cave`.
#[derive(Clone)]
pub struct WorldNoise {
    pub terrain: Arc<dyn NoiseSource>,
    pub cave: Arc<dyn NoiseSource>,
}

impl WorldNoise {
    /// Build simplex sources for a clamped seed; caves are decorrelated by `cave_seed_offset`.
    pub fn from_seed(seed: WorldSeed, cave_seed_offset: u32) -> Self {
        Self {
            terrain: Arc::new(SimplexNoise::new(seed)),
            cave: Arc::new(SimplexNoise::new(seed.wrapping_add(cave_seed_offset))),
        }
    }

    /// Wrap arbitrary sources.
    pub fn new(terrain: impl NoiseSource + 'static, cave: impl NoiseSource + 'static) -> Self {
        Self {
            terrain: Arc::new(terrain),
            cave: Arc::new(cave),
        }
    }

    /// Returns true if both handles point at the same instances.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.terrain, &other.terrain) && Arc::ptr_eq(&self.cave, &other.cave)
    }
}

impl fmt::Debug for WorldNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldNoise").finish_non_exhaustive()
    }
}

/// Deterministic noise sources for tests.
#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    use super::NoiseSource;

    /// Noise that returns the same value everywhere.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ConstantNoise(pub f64);

    impl NoiseSource for ConstantNoise {
        fn sample_2d(&self, _x: f64, _y: f64) -> f64 {
            self.0
        }

        fn sample_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
            self.0
        }
    }

    /// Noise defined by a closure over `(x, y, z)`; 2D samples pass `z = 0`.
    pub struct FnNoise<F>(pub F);

    impl<F> NoiseSource for FnNoise<F>
    where
        F: Fn(f64, f64, f64) -> f64 + Send + Sync,
    {
        fn sample_2d(&self, x: f64, y: f64) -> f64 {
            (self.0)(x, y, 0.0)
        }

        fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
            (self.0)(x, y, z)
        }
    }
}
