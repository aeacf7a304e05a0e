//! # Generation Manager
//!
//! The pipeline orchestrator and the strategy registries.
//!
//! The manager owns name→implementation maps for terrain generators and
//! entity placers; registering new strategies is the only extension
//! surface this engine exposes. One call to [`GenerationManager::generate`]
//! runs the whole pipeline: seed resolution, terrain generation, ordered
//! entity placement, metadata assembly, and validation.

use crate::config::GenerationConfig;
use crate::grid::TileGrid;
use crate::level::{Entity, Level, LevelMetadata};
use crate::placement::{
    CenterPlacer, ClusteredPlacer, CornerPlacer, EntityPlacer, PathfindingPlacer, RandomPlacer,
    SpreadPlacer, WallProximityPlacer,
};
use crate::random::SeededRandom;
use crate::terrain::{
    CellularAutomataGenerator, MazeCarverGenerator, NoiseFieldGenerator, RoomGraphGenerator,
    TerrainGenerator,
};
use crate::validation::LevelValidator;
use crate::{ForgeError, ForgeResult};
use log::{debug, info, warn};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cooperative cancellation flag for long generation runs.
///
/// Checked only between coarse pipeline steps (after terrain, after each
/// entity placement), never mid-flood-fill, so cancellation always leaves
/// a well-defined point of abandonment.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the current run stops at the next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> ForgeResult<()> {
        if self.is_cancelled() {
            Err(ForgeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Orchestrates generation and owns the strategy registries.
///
/// The manager itself is stateless between runs; each run owns its RNG and
/// grid, so one manager can serve parallel independent runs from multiple
/// threads.
///
/// # Examples
///
/// ```
/// use levelforge::{EntityKind, EntitySpec, GenerationConfig, GenerationManager};
///
/// let manager = GenerationManager::with_defaults();
/// let config = GenerationConfig::new(30, 20, "room_graph")
///     .with_seed(42)
///     .with_entity(EntitySpec::new(EntityKind::Player, 1).with_strategy("pathfinding"))
///     .with_entity(EntitySpec::new(EntityKind::Exit, 1).with_strategy("pathfinding"));
///
/// let level = manager.generate(&config).unwrap();
/// assert_eq!(level.metadata.seed_used, 42);
/// ```
pub struct GenerationManager {
    terrain_generators: HashMap<String, Box<dyn TerrainGenerator>>,
    entity_placers: HashMap<String, Box<dyn EntityPlacer>>,
    validator: LevelValidator,
}

impl GenerationManager {
    /// Creates a manager with empty registries.
    pub fn new() -> Self {
        Self {
            terrain_generators: HashMap::new(),
            entity_placers: HashMap::new(),
            validator: LevelValidator::new(),
        }
    }

    /// Creates a manager with every built-in algorithm registered under
    /// its canonical name.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register_terrain_generator("noise_field", Box::new(NoiseFieldGenerator::new()));
        manager.register_terrain_generator(
            "cellular_automata",
            Box::new(CellularAutomataGenerator::new()),
        );
        manager.register_terrain_generator("maze_carver", Box::new(MazeCarverGenerator::new()));
        manager.register_terrain_generator("room_graph", Box::new(RoomGraphGenerator::new()));

        manager.register_entity_placer("random", Box::new(RandomPlacer));
        manager.register_entity_placer("clustered", Box::new(ClusteredPlacer));
        manager.register_entity_placer("spread", Box::new(SpreadPlacer));
        manager.register_entity_placer("wall_proximity", Box::new(WallProximityPlacer));
        manager.register_entity_placer("center", Box::new(CenterPlacer));
        manager.register_entity_placer("corner", Box::new(CornerPlacer));
        manager.register_entity_placer("pathfinding", Box::new(PathfindingPlacer));
        manager
    }

    /// Registers (or replaces) a terrain generator under `name`.
    pub fn register_terrain_generator(
        &mut self,
        name: impl Into<String>,
        generator: Box<dyn TerrainGenerator>,
    ) {
        self.terrain_generators.insert(name.into(), generator);
    }

    /// Registers (or replaces) an entity placer under `name`.
    pub fn register_entity_placer(
        &mut self,
        name: impl Into<String>,
        placer: Box<dyn EntityPlacer>,
    ) {
        self.entity_placers.insert(name.into(), placer);
    }

    /// Registered terrain algorithm names, sorted.
    pub fn terrain_generator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.terrain_generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered placement strategy names, sorted.
    pub fn entity_placer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entity_placers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs the full pipeline for one configuration.
    pub fn generate(&self, config: &GenerationConfig) -> ForgeResult<Level> {
        self.generate_with_cancel(config, &CancelToken::new())
    }

    /// Runs the full pipeline, checking the token between coarse steps.
    pub fn generate_with_cancel(
        &self,
        config: &GenerationConfig,
        cancel: &CancelToken,
    ) -> ForgeResult<Level> {
        let started = Instant::now();

        // Fail fast: every configuration problem is collected and reported
        // before any grid work starts.
        let generator = self.check_configuration(config)?;

        let seed = config.seed.unwrap_or_else(|| {
            let fresh: u64 = rand::random();
            info!("no seed configured, drew {}", fresh);
            fresh
        });
        let mut rng = SeededRandom::new(seed);

        debug!(
            "generating {}x{} terrain with '{}' (seed {})",
            config.width, config.height, config.algorithm, seed
        );
        let grid = generator.generate(config, &mut rng)?;
        cancel.check()?;

        let (entities, failures) = self.place_entities(&grid, config, &mut rng, cancel)?;

        let requested = config.total_requested_entities();
        let placed = entities.len() as u32;
        if !failures.is_empty() {
            warn!(
                "placed {} of {} requested entities ({} failures)",
                placed,
                requested,
                failures.len()
            );
        }

        let metadata = LevelMetadata {
            seed_used: seed,
            algorithm: config.algorithm.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
            config_fingerprint: config_fingerprint(config)?,
            entities_requested: requested,
            entities_placed: placed,
            placement_failures: failures,
        };

        let mut level = Level {
            grid,
            entities,
            metadata,
            report: crate::level::ValidationReport {
                is_playable: false,
                issues: Vec::new(),
                quality_score: 0.0,
            },
        };
        level.report = self.validator.validate(&level, config);
        info!(
            "level ready: seed {}, {} entities, playable: {}, quality {:.2}",
            seed,
            level.entities.len(),
            level.report.is_playable,
            level.report.quality_score
        );

        Ok(level)
    }

    /// Validates the configuration and resolves the terrain generator.
    ///
    /// Unknown algorithm or placer names, structural config problems, and
    /// algorithm parameter violations are all reported together.
    fn check_configuration(
        &self,
        config: &GenerationConfig,
    ) -> ForgeResult<&dyn TerrainGenerator> {
        let mut errors = config.validate();

        for spec in &config.entities {
            let strategy = spec.strategy_name();
            if !self.entity_placers.contains_key(strategy) {
                errors.push(format!(
                    "unknown placement strategy '{}' (registered: {})",
                    strategy,
                    self.entity_placer_names().join(", ")
                ));
            }
        }

        match self.terrain_generators.get(&config.algorithm) {
            Some(generator) => {
                errors.extend(generator.validate_parameters(config));
                if errors.is_empty() {
                    Ok(generator.as_ref())
                } else {
                    Err(ForgeError::Configuration(errors))
                }
            }
            None => {
                errors.push(format!(
                    "unknown terrain algorithm '{}' (registered: {})",
                    config.algorithm,
                    self.terrain_generator_names().join(", ")
                ));
                Err(ForgeError::Configuration(errors))
            }
        }
    }

    /// Places entities spec by spec, instance by instance.
    ///
    /// Each placed entity is visible to every later placement's distance
    /// filtering, which is why this loop is strictly sequential. A `None`
    /// from a placer is recorded and the loop continues.
    fn place_entities(
        &self,
        grid: &TileGrid,
        config: &GenerationConfig,
        rng: &mut SeededRandom,
        cancel: &CancelToken,
    ) -> ForgeResult<(Vec<Entity>, Vec<String>)> {
        let mut entities: Vec<Entity> = Vec::new();
        let mut failures: Vec<String> = Vec::new();
        let mut next_id: u64 = 0;

        for spec in &config.entities {
            // Resolution already checked in check_configuration.
            let placer = &self.entity_placers[spec.strategy_name()];
            for instance in 0..spec.count {
                cancel.check()?;
                match placer.find_position(grid, spec, &entities, rng) {
                    Some(position) => {
                        entities.push(Entity {
                            id: next_id,
                            kind: spec.kind,
                            position,
                            properties: spec.properties.clone(),
                        });
                        next_id += 1;
                    }
                    None => {
                        debug!(
                            "could not place {:?} instance {} via '{}'",
                            spec.kind,
                            instance + 1,
                            placer.name()
                        );
                        failures.push(format!(
                            "could not place {:?} instance {} of {} via '{}'",
                            spec.kind,
                            instance + 1,
                            spec.count,
                            placer.name()
                        ));
                    }
                }
            }
        }

        Ok((entities, failures))
    }
}

impl Default for GenerationManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Stable fingerprint of a configuration.
///
/// The config is serialized through `serde_json::Value`, whose object
/// representation keeps keys sorted, so the fingerprint does not depend on
/// map iteration order.
fn config_fingerprint(config: &GenerationConfig) -> ForgeResult<String> {
    let canonical = serde_json::to_value(config)?.to_string();
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    Ok(format!("{:016x}", hasher.finish()))
}
