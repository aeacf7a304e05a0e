//! Reachability-constrained placement.
//!
//! The pathfinding strategy only proposes positions the player can
//! actually walk to: it flood-fills from the player's tile over walkable
//! 4-neighbors and selects uniformly among the reachable positions that
//! survive the distance filters.

use super::{is_valid_position, reachable_from, valid_candidates, EntityPlacer};
use crate::config::EntitySpec;
use crate::grid::{Position, TileGrid};
use crate::level::{Entity, EntityKind};
use crate::random::SeededRandom;

/// Places entities only on tiles reachable from the player.
///
/// Before a player exists there is nothing to be reachable from, so the
/// strategy falls back to scanning the whole grid like the random
/// strategy. Selection among surviving candidates is uniform via the
/// shared RNG; first-found selection would bias placement toward the
/// flood-fill frontier order.
#[derive(Debug, Clone, Default)]
pub struct PathfindingPlacer;

impl EntityPlacer for PathfindingPlacer {
    fn name(&self) -> &'static str {
        "pathfinding"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let player = existing.iter().find(|e| e.kind == EntityKind::Player);

        let candidates: Vec<Position> = match player {
            None => valid_candidates(grid, spec, existing),
            Some(player) => reachable_from(grid, player.position)
                .into_iter()
                .filter(|&pos| is_valid_position(grid, pos, spec, existing))
                .collect(),
        };

        rng.choose(&candidates).copied()
    }
}
