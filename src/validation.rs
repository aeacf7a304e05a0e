//! # Validation Module
//!
//! Playability and quality assessment of generated levels.
//!
//! Validation is always non-fatal: the report is attached to the level and
//! the caller decides whether to accept, retry with another seed, or
//! surface the issues.

use crate::config::GenerationConfig;
use crate::grid::{Position, TileType};
use crate::level::{EntityKind, Level, ValidationReport};
use crate::placement::reachable_from;
use std::collections::HashSet;

/// Assesses structural playability and heuristic quality.
///
/// Repeated validation of an identical level with an identical
/// configuration produces an identical report.
#[derive(Debug, Clone, Default)]
pub struct LevelValidator;

impl LevelValidator {
    /// Entity kinds that must be reachable from the player for a level to
    /// count as playable.
    pub const REQUIRED_REACHABLE: &'static [EntityKind] = &[EntityKind::Exit];

    pub fn new() -> Self {
        Self
    }

    /// Produces the full report for a level.
    ///
    /// Placement failures recorded in the level metadata are carried into
    /// the issue list; they do not affect playability by themselves.
    pub fn validate(&self, level: &Level, config: &GenerationConfig) -> ValidationReport {
        let mut issues: Vec<String> = level.metadata.placement_failures.clone();
        let is_playable = self.check_playability(level, &mut issues);
        ValidationReport {
            is_playable,
            issues,
            quality_score: self.quality_score(level, config),
        }
    }

    /// Flood-fills from the player and checks every required-reachable
    /// entity sits in the reachable set.
    fn check_playability(&self, level: &Level, issues: &mut Vec<String>) -> bool {
        let player = match level.player() {
            Some(player) => player,
            None => {
                issues.push("no player entity was placed".to_string());
                return false;
            }
        };

        let reachable: HashSet<Position> =
            reachable_from(&level.grid, player.position).into_iter().collect();
        let mut playable = true;
        for &kind in Self::REQUIRED_REACHABLE {
            for entity in level.entities_of_kind(kind) {
                if !reachable.contains(&entity.position) {
                    issues.push(format!(
                        "{:?} at ({}, {}) is not reachable from the player",
                        kind, entity.position.x, entity.position.y
                    ));
                    playable = false;
                }
            }
        }
        playable
    }

    /// Heuristic quality score in [0, 1].
    ///
    /// Fixed weighting, stable across releases of the scoring logic:
    /// `0.4 * density + 0.3 * terrain balance + 0.3 * placement success`.
    ///
    /// - *density*: one minus the absolute gap between the achieved entity
    ///   density and the configured target (derived from the requested
    ///   counts when the config sets none)
    /// - *terrain balance*: normalized Shannon entropy of tile proportions
    ///   over the configured palette plus Wall
    /// - *placement success*: fraction of requested entity instances that
    ///   were placed
    pub fn quality_score(&self, level: &Level, config: &GenerationConfig) -> f64 {
        let score = 0.4 * self.density_component(level, config)
            + 0.3 * self.balance_component(level, config)
            + 0.3 * self.placement_component(level);
        score.clamp(0.0, 1.0)
    }

    fn density_component(&self, level: &Level, config: &GenerationConfig) -> f64 {
        let area = level.grid.area() as f64;
        let target = config.target_entity_density.unwrap_or_else(|| {
            level.metadata.entities_requested as f64 / area
        });
        let actual = level.entities.len() as f64 / area;
        (1.0 - (actual - target).abs()).clamp(0.0, 1.0)
    }

    fn balance_component(&self, level: &Level, config: &GenerationConfig) -> f64 {
        // Distinct palette entries only: a duplicated entry must not
        // double-count its tiles in the entropy total.
        let mut types: Vec<TileType> = Vec::new();
        for tile in config.terrain_palette().into_iter().chain([TileType::Wall]) {
            if !types.contains(&tile) {
                types.push(tile);
            }
        }
        if types.len() < 2 {
            return 1.0;
        }

        let counts: Vec<usize> = types.iter().map(|&t| level.grid.count_tiles(t)).collect();
        let total: usize = counts.iter().sum();
        if total == 0 {
            return 0.0;
        }

        let entropy: f64 = counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total as f64;
                -p * p.ln()
            })
            .sum();
        entropy / (types.len() as f64).ln()
    }

    fn placement_component(&self, level: &Level) -> f64 {
        if level.metadata.entities_requested == 0 {
            return 1.0;
        }
        level.metadata.entities_placed as f64 / level.metadata.entities_requested as f64
    }
}
