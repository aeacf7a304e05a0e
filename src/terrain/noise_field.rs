//! Noise-field terrain generation.
//!
//! Samples multi-octave Perlin noise and maps the continuous field onto
//! discrete tiles: values below `threshold` become walls, and the
//! remaining band is split evenly across the configured walkable palette.

use super::{dimension_errors, parameter_table, unknown_parameter_errors, TerrainGenerator};
use crate::config::GenerationConfig;
use crate::grid::{TileGrid, TileType};
use crate::random::SeededRandom;
use crate::ForgeResult;
use noise::{NoiseFn, Perlin};
use std::collections::HashMap;

const MIN_DIMENSION: u32 = 4;

/// Coherent-noise terrain generator.
///
/// Parameters:
/// - `scale` (> 0): base sampling frequency; larger values produce busier
///   terrain
/// - `octaves` (>= 1, integer-valued): number of noise layers accumulated
/// - `persistence` ((0, 1]): amplitude falloff per octave
/// - `lacunarity` (>= 1): frequency growth per octave
/// - `threshold` ([0, 1]): normalized values below this become walls
#[derive(Debug, Clone, Default)]
pub struct NoiseFieldGenerator;

impl NoiseFieldGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TerrainGenerator for NoiseFieldGenerator {
    fn name(&self) -> &'static str {
        "noise_field"
    }

    fn default_parameters(&self) -> HashMap<String, f64> {
        parameter_table(&[
            ("scale", 0.1),
            ("octaves", 4.0),
            ("persistence", 0.5),
            ("lacunarity", 2.0),
            ("threshold", 0.4),
        ])
    }

    fn validate_parameters(&self, config: &GenerationConfig) -> Vec<String> {
        let defaults = self.default_parameters();
        let mut errors = dimension_errors(config, MIN_DIMENSION, MIN_DIMENSION, self.name());
        errors.extend(unknown_parameter_errors(config, &defaults, self.name()));

        let scale = config.parameter("scale", &defaults);
        if scale <= 0.0 {
            errors.push(format!("{}: scale must be > 0, got {}", self.name(), scale));
        }
        let octaves = config.parameter("octaves", &defaults);
        if octaves < 1.0 || octaves.fract() != 0.0 {
            errors.push(format!(
                "{}: octaves must be a positive integer, got {}",
                self.name(),
                octaves
            ));
        }
        let persistence = config.parameter("persistence", &defaults);
        if !(persistence > 0.0 && persistence <= 1.0) {
            errors.push(format!(
                "{}: persistence must be in (0, 1], got {}",
                self.name(),
                persistence
            ));
        }
        let lacunarity = config.parameter("lacunarity", &defaults);
        if lacunarity < 1.0 {
            errors.push(format!(
                "{}: lacunarity must be >= 1, got {}",
                self.name(),
                lacunarity
            ));
        }
        let threshold = config.parameter("threshold", &defaults);
        if !(0.0..=1.0).contains(&threshold) {
            errors.push(format!(
                "{}: threshold must be in [0, 1], got {}",
                self.name(),
                threshold
            ));
        }

        errors
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut SeededRandom,
    ) -> ForgeResult<TileGrid> {
        let defaults = self.default_parameters();
        let scale = config.parameter("scale", &defaults);
        let octaves = config.parameter("octaves", &defaults) as u32;
        let persistence = config.parameter("persistence", &defaults);
        let lacunarity = config.parameter("lacunarity", &defaults);
        let threshold = config.parameter("threshold", &defaults);
        let palette = config.terrain_palette();

        // The noise source is seeded from the shared sequence so the whole
        // run stays a function of the one configured seed.
        let perlin = Perlin::new(rng.next_int(u32::MAX));

        let mut grid = TileGrid::filled(config.width, config.height, TileType::Wall)?;
        for y in 0..config.height as i32 {
            for x in 0..config.width as i32 {
                let mut total = 0.0;
                let mut amplitude = 1.0;
                let mut frequency = 1.0;
                let mut max_amplitude = 0.0;
                for _ in 0..octaves {
                    let sx = x as f64 * scale * frequency;
                    let sy = y as f64 * scale * frequency;
                    total += perlin.get([sx, sy]) * amplitude;
                    max_amplitude += amplitude;
                    amplitude *= persistence;
                    frequency *= lacunarity;
                }
                // Perlin output is in [-1, 1]; normalize the octave sum to [0, 1].
                let value = ((total / max_amplitude) + 1.0) / 2.0;
                let value = value.clamp(0.0, 1.0);

                let tile = if value < threshold {
                    TileType::Wall
                } else {
                    band_tile(value, threshold, &palette)
                };
                grid.set(x, y, tile)?;
            }
        }

        Ok(grid)
    }
}

/// Maps a normalized value in [threshold, 1] onto the walkable palette by
/// splitting the band evenly.
fn band_tile(value: f64, threshold: f64, palette: &[TileType]) -> TileType {
    let span = 1.0 - threshold;
    if span <= f64::EPSILON || palette.len() <= 1 {
        return palette.first().copied().unwrap_or(TileType::Ground);
    }
    let t = (value - threshold) / span;
    let idx = ((t * palette.len() as f64) as usize).min(palette.len() - 1);
    palette[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_pass_validation() {
        let generator = NoiseFieldGenerator::new();
        let config = GenerationConfig::new(20, 20, "noise_field");
        assert!(generator.validate_parameters(&config).is_empty());
    }

    #[test]
    fn test_out_of_range_parameters_rejected() {
        let generator = NoiseFieldGenerator::new();
        let config = GenerationConfig::new(20, 20, "noise_field")
            .with_parameter("scale", -0.5)
            .with_parameter("threshold", 1.5)
            .with_parameter("octaves", 2.5);
        let errors = generator.validate_parameters(&config);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_too_small_grid_rejected() {
        let generator = NoiseFieldGenerator::new();
        let config = GenerationConfig::new(3, 20, "noise_field");
        assert!(!generator.validate_parameters(&config).is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let generator = NoiseFieldGenerator::new();
        let config = GenerationConfig::new(16, 16, "noise_field");

        let grid_a = generator
            .generate(&config, &mut SeededRandom::new(42))
            .unwrap();
        let grid_b = generator
            .generate(&config, &mut SeededRandom::new(42))
            .unwrap();
        assert_eq!(grid_a, grid_b);

        let grid_c = generator
            .generate(&config, &mut SeededRandom::new(43))
            .unwrap();
        assert_ne!(grid_a, grid_c);
    }

    #[test]
    fn test_threshold_extremes() {
        let generator = NoiseFieldGenerator::new();

        // threshold 1.0: everything below it, all walls
        let config = GenerationConfig::new(12, 12, "noise_field").with_parameter("threshold", 1.0);
        let grid = generator
            .generate(&config, &mut SeededRandom::new(1))
            .unwrap();
        assert_eq!(grid.count_tiles(TileType::Wall), grid.area());

        // threshold 0.0: nothing below it, no walls
        let config = GenerationConfig::new(12, 12, "noise_field").with_parameter("threshold", 0.0);
        let grid = generator
            .generate(&config, &mut SeededRandom::new(1))
            .unwrap();
        assert_eq!(grid.count_tiles(TileType::Wall), 0);
    }

    #[test]
    fn test_palette_band_mapping() {
        let palette = vec![TileType::Sand, TileType::Grass, TileType::Stone];
        assert_eq!(band_tile(0.4, 0.4, &palette), TileType::Sand);
        assert_eq!(band_tile(0.99, 0.4, &palette), TileType::Stone);
        assert_eq!(band_tile(0.7, 0.4, &palette), TileType::Grass);

        // Degenerate band falls back to the first palette entry.
        assert_eq!(band_tile(1.0, 1.0, &palette), TileType::Sand);
    }

    #[test]
    fn test_configured_palette_appears_in_output() {
        let generator = NoiseFieldGenerator::new();
        let config = GenerationConfig::new(32, 32, "noise_field")
            .with_terrain_types(vec![TileType::Grass, TileType::Sand]);
        let grid = generator
            .generate(&config, &mut SeededRandom::new(9))
            .unwrap();
        for pos in grid.positions() {
            let tile = grid.get_pos(pos).unwrap();
            assert!(
                matches!(tile, TileType::Wall | TileType::Grass | TileType::Sand),
                "unexpected tile {:?}",
                tile
            );
        }
    }
}
