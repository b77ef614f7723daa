//! Procedural terrain seeding for the occupancy mask.
//!
//! Terrain is sampled per cell from fractal Brownian motion noise; anything
//! above a small threshold turns solid. The sampling sits behind a trait so
//! tests and tools can seed from plain closures instead of noise.

use noise::{Fbm, NoiseFn, Perlin};

/// Noise frequency used when none is given, in cycles per cell.
pub const DEFAULT_FREQUENCY: f64 = 0.005;

/// Samples above this value turn solid during seeding.
pub const SOLID_THRESHOLD: f32 = 0.1;

/// Base occupancy for seeded solid cells; the sample is added on top so the
/// mask carries the terrain's shape for frontends to shade.
pub const BASE_OCCUPANCY: f32 = 0.9;

/// Per-cell terrain source, sampled in cell coordinates.
///
/// Values are noise-like, roughly `[-1, 1]`. Any `Fn(usize, usize) -> f32`
/// qualifies, which keeps deterministic test fixtures one closure away.
pub trait OccupancySource {
    fn sample(&self, x: usize, y: usize) -> f32;
}

impl<F> OccupancySource for F
where
    F: Fn(usize, usize) -> f32,
{
    fn sample(&self, x: usize, y: usize) -> f32 {
        self(x, y)
    }
}

/// Fractal Brownian motion terrain, deterministic per seed.
pub struct FbmTerrain {
    noise: Fbm<Perlin>,
    frequency: f64,
}

impl FbmTerrain {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Fbm::new(seed),
            frequency: DEFAULT_FREQUENCY,
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }
}

impl OccupancySource for FbmTerrain {
    fn sample(&self, x: usize, y: usize) -> f32 {
        self.noise
            .get([x as f64 * self.frequency, y as f64 * self.frequency]) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_terrain() {
        let a = FbmTerrain::new(42);
        let b = FbmTerrain::new(42);
        for y in (0..100).step_by(17) {
            for x in (0..100).step_by(13) {
                assert_eq!(a.sample(x, y), b.sample(x, y));
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = FbmTerrain::new(1);
        let b = FbmTerrain::new(2);
        let diverged = (0..200).any(|i| {
            let (x, y) = (i * 7 % 97, i * 13 % 89);
            a.sample(x, y) != b.sample(x, y)
        });
        assert!(diverged, "seeds 1 and 2 produced identical terrain");
    }

    #[test]
    fn samples_are_finite() {
        let terrain = FbmTerrain::new(7).with_frequency(0.05);
        for y in 0..32 {
            for x in 0..32 {
                assert!(terrain.sample(x, y).is_finite());
            }
        }
    }
}
