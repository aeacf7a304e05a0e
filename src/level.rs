//! # Level Module
//!
//! Output data types: placed entities, the assembled level, its metadata,
//! and the validation report.
//!
//! Everything here is plain, serializable data. A [`Level`] holds no RNG
//! state, algorithm objects, or internal references; it can be serialized
//! losslessly by an external export layer.

use crate::grid::{Position, TileGrid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kinds of gameplay entities a level can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Item,
    PowerUp,
    Npc,
    Exit,
    Checkpoint,
    Obstacle,
    Trigger,
}

impl EntityKind {
    /// Whether this kind must stand on a walkable tile.
    ///
    /// Obstacles are the exception: they deliberately occupy blocking
    /// terrain (a boulder in a lava field is fine).
    pub const fn requires_walkable(self) -> bool {
        !matches!(self, EntityKind::Obstacle)
    }

    /// Whether at most one entity of this kind may exist per level.
    pub const fn is_unique(self) -> bool {
        matches!(self, EntityKind::Player)
    }
}

/// A dynamically-typed property value.
///
/// Entity property bags hold heterogeneous data (numbers, flags, names,
/// nested structures) supplied by the configuration and passed through
/// untouched to the placed entities.
///
/// # Examples
///
/// ```
/// use levelforge::PropertyValue;
///
/// let health = PropertyValue::Int(100);
/// assert_eq!(health.as_f64(), Some(100.0));
///
/// let name = PropertyValue::Text("goblin".into());
/// assert_eq!(name.as_f64(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
    Map(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Numeric view of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String view of this value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A property bag attached to entity specs and placed entities.
pub type PropertyBag = HashMap<String, PropertyValue>;

/// A placed gameplay entity.
///
/// Ids are sequential within one generation run, assigned in placement
/// order, so identical (config, seed) inputs yield identical entity lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Run-local identifier, assigned in placement order
    pub id: u64,
    /// What this entity is
    pub kind: EntityKind,
    /// Tile the entity occupies
    pub position: Position,
    /// Pass-through properties from the entity spec
    #[serde(default)]
    pub properties: PropertyBag,
}

/// Metadata describing how a level was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMetadata {
    /// The seed actually used (resolved from "random" if requested)
    pub seed_used: u64,
    /// Name of the terrain algorithm that built the grid
    pub algorithm: String,
    /// Wall-clock duration of the generation run in milliseconds
    pub duration_ms: u64,
    /// Stable fingerprint of the configuration that produced this level
    pub config_fingerprint: String,
    /// Total entity instances requested across all specs
    pub entities_requested: u32,
    /// Entity instances successfully placed
    pub entities_placed: u32,
    /// One message per entity instance that could not be placed
    pub placement_failures: Vec<String>,
}

/// Structural playability and quality assessment of a generated level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the level is structurally playable
    pub is_playable: bool,
    /// Human-readable problems found, in discovery order
    pub issues: Vec<String>,
    /// Heuristic quality score in [0, 1]
    pub quality_score: f64,
}

/// A complete generated level: terrain, entities, and provenance.
///
/// Created once per generation run and never mutated afterward by this
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// The generated terrain
    pub grid: TileGrid,
    /// Placed entities, in placement order
    pub entities: Vec<Entity>,
    /// Provenance and placement statistics
    pub metadata: LevelMetadata,
    /// Playability assessment, attached by the pipeline
    pub report: ValidationReport,
}

impl Level {
    /// The player entity, if one was placed.
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind == EntityKind::Player)
    }

    /// All entities of the given kind, in placement order.
    pub fn entities_of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }
}
