//! # Levelforge
//!
//! A deterministic procedural level-generation engine.
//!
//! ## Architecture Overview
//!
//! Levelforge is a pure library: given a [`GenerationConfig`] and a seed it
//! produces a tile grid, a set of placed gameplay entities, and a validation
//! report, with no I/O, persistence, or rendering. The core concepts are:
//!
//! - **Seeded Randomness**: a single [`SeededRandom`] per run, threaded
//!   through every algorithm, so identical inputs produce identical levels
//! - **Terrain Algorithms**: pluggable [`TerrainGenerator`] strategies
//!   (noise field, cellular automata, maze carver, room graph)
//! - **Entity Placement**: pluggable [`EntityPlacer`] strategies applying
//!   distance and reachability constraints one entity at a time
//! - **Validation**: [`LevelValidator`] checks structural playability and
//!   scores level quality
//! - **Orchestration**: [`GenerationManager`] binds the above into one
//!   pipeline and exposes the strategy registries as the only extension
//!   surface
//!
//! ## Determinism
//!
//! Two runs with the same configuration and seed produce bit-identical
//! grids and identical entity lists. Nothing in this crate consults global
//! randomness, wall-clock time (beyond duration metadata), or thread
//! scheduling during generation.

pub mod config;
pub mod grid;
pub mod level;
pub mod manager;
pub mod placement;
pub mod random;
pub mod terrain;
pub mod validation;

pub use config::{EntitySpec, GenerationConfig};
pub use grid::{Position, TileGrid, TileType};
pub use level::{Entity, EntityKind, Level, LevelMetadata, PropertyValue, ValidationReport};
pub use manager::{CancelToken, GenerationManager};
pub use placement::{
    CenterPlacer, ClusteredPlacer, CornerPlacer, EntityPlacer, PathfindingPlacer, RandomPlacer,
    SpreadPlacer, WallProximityPlacer,
};
pub use random::SeededRandom;
pub use terrain::{
    CellularAutomataGenerator, MazeCarverGenerator, NoiseFieldGenerator, RoomGraphGenerator,
    TerrainGenerator,
};
pub use validation::LevelValidator;

/// Core error type for the levelforge engine.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Configuration is invalid; generation never started.
    ///
    /// Carries every problem found so callers can surface them all at once.
    #[error("invalid configuration: {}", .0.join("; "))]
    Configuration(Vec<String>),

    /// A terrain generator could not satisfy its structural contract.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// A grid access used indices outside the grid.
    #[error("position ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// The run was cancelled between pipeline steps.
    #[error("generation cancelled")]
    Cancelled,

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type used throughout the levelforge codebase.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine-wide default constants.
pub mod defaults {
    /// Default grid width in tiles
    pub const DEFAULT_WIDTH: u32 = 50;

    /// Default grid height in tiles
    pub const DEFAULT_HEIGHT: u32 = 50;

    /// Terrain algorithm used when the configuration names none
    pub const DEFAULT_ALGORITHM: &str = "room_graph";

    /// Placement strategy used when an entity spec names none
    pub const DEFAULT_PLACEMENT: &str = "random";

    /// Cluster radius (tiles) used by the clustered placer when the
    /// entity spec's property bag does not override it
    pub const DEFAULT_CLUSTER_RADIUS: f64 = 5.0;
}
