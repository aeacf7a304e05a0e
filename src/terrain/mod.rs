//! # Terrain Module
//!
//! Terrain generation algorithms behind a common strategy interface.
//!
//! Each algorithm implements [`TerrainGenerator`] and is looked up by name
//! in the [`crate::GenerationManager`] registry. Parameters arrive as a
//! name→value map; every algorithm publishes its defaults and validates
//! its inputs before any grid work starts, so out-of-range parameters are
//! configuration errors rather than mid-generation failures.

pub mod cellular;
pub mod maze;
pub mod noise_field;
pub mod rooms;

pub use cellular::CellularAutomataGenerator;
pub use maze::MazeCarverGenerator;
pub use noise_field::NoiseFieldGenerator;
pub use rooms::RoomGraphGenerator;

use crate::config::GenerationConfig;
use crate::grid::TileGrid;
use crate::random::SeededRandom;
use crate::ForgeResult;
use std::collections::HashMap;

/// Strategy interface for terrain generation algorithms.
///
/// Implementations must be deterministic: the same configuration and RNG
/// state always produce the same grid. All randomness comes from the
/// `rng` argument; implementations never create their own.
pub trait TerrainGenerator: Send + Sync {
    /// Canonical name this generator registers under.
    fn name(&self) -> &'static str;

    /// The full parameter set this algorithm understands, with defaults.
    fn default_parameters(&self) -> HashMap<String, f64>;

    /// Validates dimensions and parameters before generation.
    ///
    /// Returns every problem found; an empty list means generation may
    /// proceed.
    fn validate_parameters(&self, config: &GenerationConfig) -> Vec<String>;

    /// Produces a tile grid from the configuration.
    fn generate(&self, config: &GenerationConfig, rng: &mut SeededRandom)
        -> ForgeResult<TileGrid>;
}

/// Builds a defaults table from (name, value) pairs.
pub(crate) fn parameter_table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Flags configured parameter names the algorithm does not understand.
///
/// Typos in parameter names would otherwise silently fall back to
/// defaults.
pub(crate) fn unknown_parameter_errors(
    config: &GenerationConfig,
    defaults: &HashMap<String, f64>,
    algorithm: &str,
) -> Vec<String> {
    let mut names: Vec<&String> = config
        .parameters
        .keys()
        .filter(|name| !defaults.contains_key(*name))
        .collect();
    names.sort();
    names
        .into_iter()
        .map(|name| format!("{}: unknown parameter '{}'", algorithm, name))
        .collect()
}

/// Flags grids smaller than an algorithm's structural minimum.
pub(crate) fn dimension_errors(
    config: &GenerationConfig,
    min_width: u32,
    min_height: u32,
    algorithm: &str,
) -> Vec<String> {
    if config.width < min_width || config.height < min_height {
        vec![format!(
            "{}: grid must be at least {}x{}, got {}x{}",
            algorithm, min_width, min_height, config.width, config.height
        )]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parameter_detection() {
        let defaults = parameter_table(&[("scale", 0.1), ("octaves", 4.0)]);
        let config = GenerationConfig::new(10, 10, "noise_field")
            .with_parameter("scale", 0.5)
            .with_parameter("octvaes", 3.0);

        let errors = unknown_parameter_errors(&config, &defaults, "noise_field");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("octvaes"));
    }

    #[test]
    fn test_dimension_errors() {
        let config = GenerationConfig::new(3, 10, "maze_carver");
        let errors = dimension_errors(&config, 5, 5, "maze_carver");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 5x5"));

        let config = GenerationConfig::new(5, 5, "maze_carver");
        assert!(dimension_errors(&config, 5, 5, "maze_carver").is_empty());
    }
}
