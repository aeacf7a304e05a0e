//! # Configuration Module
//!
//! Declarative input for a generation run.
//!
//! A [`GenerationConfig`] names a terrain algorithm and its parameters,
//! the grid dimensions and seed, and an ordered list of [`EntitySpec`]s to
//! place. Structural validation (positive dimensions, sane counts) happens
//! here; algorithm-specific parameter validation lives with each
//! [`crate::TerrainGenerator`].

use crate::defaults;
use crate::grid::TileType;
use crate::level::{EntityKind, PropertyBag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Specification for placing a batch of entities of one kind.
///
/// Specs are processed in list order; within one spec, `count` instances
/// are placed one at a time, each seeing all previously placed entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    /// Kind of entity to place
    pub kind: EntityKind,
    /// How many instances to attempt
    pub count: u32,
    /// Minimum Euclidean distance to every already-placed entity
    #[serde(default)]
    pub min_distance: f64,
    /// Maximum Euclidean distance to the player; `None` means unbounded.
    ///
    /// Omitting the field in serialized input also means unbounded; there
    /// is no numeric sentinel.
    #[serde(default)]
    pub max_distance_from_player: Option<f64>,
    /// Registered placement strategy name; `None` uses "random"
    #[serde(default)]
    pub strategy: Option<String>,
    /// Pass-through properties copied onto each placed entity
    #[serde(default)]
    pub properties: PropertyBag,
}

impl EntitySpec {
    /// Creates a spec with no distance constraints and the default
    /// placement strategy.
    pub fn new(kind: EntityKind, count: u32) -> Self {
        Self {
            kind,
            count,
            min_distance: 0.0,
            max_distance_from_player: None,
            strategy: None,
            properties: PropertyBag::new(),
        }
    }

    /// Sets the placement strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Sets the minimum distance to existing entities.
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Bounds the distance from the player.
    pub fn with_max_distance_from_player(mut self, max: f64) -> Self {
        self.max_distance_from_player = Some(max);
        self
    }

    /// The strategy name to resolve, defaulting when unset.
    pub fn strategy_name(&self) -> &str {
        self.strategy.as_deref().unwrap_or(defaults::DEFAULT_PLACEMENT)
    }
}

/// Configuration for one generation run.
///
/// # Examples
///
/// ```
/// use levelforge::{EntitySpec, EntityKind, GenerationConfig};
///
/// let config = GenerationConfig::new(40, 30, "cellular_automata")
///     .with_seed(42)
///     .with_entity(EntitySpec::new(EntityKind::Player, 1))
///     .with_entity(EntitySpec::new(EntityKind::Exit, 1).with_strategy("pathfinding"));
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Seed for the run; `None` draws a fresh seed and records it in the
    /// level metadata so the run stays reproducible after the fact
    #[serde(default)]
    pub seed: Option<u64>,
    /// Registered terrain algorithm name
    pub algorithm: String,
    /// Algorithm parameters by name; missing keys take the algorithm's
    /// defaults
    #[serde(default)]
    pub parameters: HashMap<String, f64>,
    /// Walkable terrain palette for generators that produce more than
    /// Ground/Wall; empty means just Ground
    #[serde(default)]
    pub terrain_types: Vec<TileType>,
    /// Target entity density (entities per tile) used by quality scoring;
    /// `None` derives the target from the requested entity counts
    #[serde(default)]
    pub target_entity_density: Option<f64>,
    /// Entity placement specs, processed in order
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

impl GenerationConfig {
    /// Creates a configuration with the given dimensions and algorithm.
    pub fn new(width: u32, height: u32, algorithm: impl Into<String>) -> Self {
        Self {
            width,
            height,
            seed: None,
            algorithm: algorithm.into(),
            parameters: HashMap::new(),
            terrain_types: Vec::new(),
            target_entity_density: None,
            entities: Vec::new(),
        }
    }

    /// Sets a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets one algorithm parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Appends an entity spec.
    pub fn with_entity(mut self, spec: EntitySpec) -> Self {
        self.entities.push(spec);
        self
    }

    /// Sets the walkable terrain palette.
    pub fn with_terrain_types(mut self, types: Vec<TileType>) -> Self {
        self.terrain_types = types;
        self
    }

    /// The walkable palette generators should map onto, defaulting to
    /// plain Ground when the configuration names none.
    pub fn terrain_palette(&self) -> Vec<TileType> {
        if self.terrain_types.is_empty() {
            vec![TileType::Ground]
        } else {
            self.terrain_types.clone()
        }
    }

    /// Reads a parameter, falling back to the supplied defaults table.
    pub fn parameter(&self, name: &str, defaults: &HashMap<String, f64>) -> f64 {
        self.parameters
            .get(name)
            .or_else(|| defaults.get(name))
            .copied()
            .unwrap_or(0.0)
    }

    /// Total number of entity instances requested across all specs.
    pub fn total_requested_entities(&self) -> u32 {
        self.entities.iter().map(|spec| spec.count).sum()
    }

    /// Structural validation independent of any algorithm.
    ///
    /// Returns every problem found; an empty list means the configuration
    /// is structurally sound.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.width == 0 || self.height == 0 {
            errors.push(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.algorithm.is_empty() {
            errors.push("terrain algorithm name must not be empty".to_string());
        }
        for (i, spec) in self.entities.iter().enumerate() {
            if spec.min_distance < 0.0 {
                errors.push(format!(
                    "entity spec {} ({:?}): min_distance must be >= 0, got {}",
                    i, spec.kind, spec.min_distance
                ));
            }
            if let Some(max) = spec.max_distance_from_player {
                if max < 0.0 {
                    errors.push(format!(
                        "entity spec {} ({:?}): max_distance_from_player must be >= 0, got {}",
                        i, spec.kind, max
                    ));
                }
            }
        }
        if let Some(density) = self.target_entity_density {
            if !(0.0..=1.0).contains(&density) {
                errors.push(format!(
                    "target_entity_density must be in [0, 1], got {}",
                    density
                ));
            }
        }

        errors
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(
            defaults::DEFAULT_WIDTH,
            defaults::DEFAULT_HEIGHT,
            defaults::DEFAULT_ALGORITHM,
        )
    }
}
