//! Cellular-automata terrain generation.
//!
//! Seeds each cell independently as wall or ground, then runs a number of
//! birth/death smoothing passes to grow cave-like connected blobs.

use super::{dimension_errors, parameter_table, unknown_parameter_errors, TerrainGenerator};
use crate::config::GenerationConfig;
use crate::grid::{TileGrid, TileType};
use crate::random::SeededRandom;
use crate::ForgeResult;
use std::collections::HashMap;

const MIN_DIMENSION: u32 = 3;

/// Cave-generating cellular automaton.
///
/// Parameters:
/// - `initial_density` ([0, 1]): probability each cell starts as wall
/// - `iterations` (>= 0, integer-valued): smoothing passes
/// - `birth_limit` ([0, 8]): a ground cell with at least this many wall
///   neighbors becomes wall
/// - `death_limit` ([0, 8]): a wall cell with at most this many wall
///   neighbors becomes ground
///
/// Neighbor counts are over the 8-neighborhood and ignore out-of-bounds
/// cells, so a zero-density seed stays entirely ground no matter how many
/// iterations run.
#[derive(Debug, Clone, Default)]
pub struct CellularAutomataGenerator;

impl CellularAutomataGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TerrainGenerator for CellularAutomataGenerator {
    fn name(&self) -> &'static str {
        "cellular_automata"
    }

    fn default_parameters(&self) -> HashMap<String, f64> {
        parameter_table(&[
            ("initial_density", 0.45),
            ("iterations", 4.0),
            ("birth_limit", 5.0),
            ("death_limit", 3.0),
        ])
    }

    fn validate_parameters(&self, config: &GenerationConfig) -> Vec<String> {
        let defaults = self.default_parameters();
        let mut errors = dimension_errors(config, MIN_DIMENSION, MIN_DIMENSION, self.name());
        errors.extend(unknown_parameter_errors(config, &defaults, self.name()));

        let density = config.parameter("initial_density", &defaults);
        if !(0.0..=1.0).contains(&density) {
            errors.push(format!(
                "{}: initial_density must be in [0, 1], got {}",
                self.name(),
                density
            ));
        }
        let iterations = config.parameter("iterations", &defaults);
        if iterations < 0.0 || iterations.fract() != 0.0 {
            errors.push(format!(
                "{}: iterations must be a non-negative integer, got {}",
                self.name(),
                iterations
            ));
        }
        for limit_name in ["birth_limit", "death_limit"] {
            let limit = config.parameter(limit_name, &defaults);
            if !(0.0..=8.0).contains(&limit) || limit.fract() != 0.0 {
                errors.push(format!(
                    "{}: {} must be an integer in [0, 8], got {}",
                    self.name(),
                    limit_name,
                    limit
                ));
            }
        }

        errors
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut SeededRandom,
    ) -> ForgeResult<TileGrid> {
        let defaults = self.default_parameters();
        let density = config.parameter("initial_density", &defaults);
        let iterations = config.parameter("iterations", &defaults) as u32;
        let birth_limit = config.parameter("birth_limit", &defaults) as u32;
        let death_limit = config.parameter("death_limit", &defaults) as u32;

        // Independent Bernoulli draw per cell, row-major order.
        let mut grid = TileGrid::filled(config.width, config.height, TileType::Ground)?;
        for y in 0..config.height as i32 {
            for x in 0..config.width as i32 {
                if rng.next_bool(density) {
                    grid.set(x, y, TileType::Wall)?;
                }
            }
        }

        // Double-buffered passes: every cell's fate is decided from the
        // previous generation, not a half-updated one.
        for _ in 0..iterations {
            let previous = grid.clone();
            for y in 0..config.height as i32 {
                for x in 0..config.width as i32 {
                    let walls = wall_neighbors(&previous, x, y);
                    let next = match previous.get(x, y)? {
                        TileType::Wall if walls <= death_limit => TileType::Ground,
                        TileType::Wall => TileType::Wall,
                        _ if walls >= birth_limit => TileType::Wall,
                        _ => TileType::Ground,
                    };
                    grid.set(x, y, next)?;
                }
            }
        }

        Ok(grid)
    }
}

/// Counts wall cells in the in-bounds 8-neighborhood of (x, y).
fn wall_neighbors(grid: &TileGrid, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if matches!(grid.get(x + dx, y + dy), Ok(TileType::Wall)) {
                count += 1;
            }
        }
    }
    count
}
