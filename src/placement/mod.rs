//! # Placement Module
//!
//! Entity placement strategies behind a common interface.
//!
//! Each strategy implements [`EntityPlacer`] and is looked up by name in
//! the [`crate::GenerationManager`] registry. A placer proposes a position
//! for one entity instance at a time; returning `None` is a soft failure
//! (that instance goes unplaced) and never aborts the pipeline.
//!
//! All strategies share one validity rule, [`is_valid_position`], and the
//! reachability-constrained strategy shares one definition of "reachable":
//! breadth-first search over walkable tiles under 4-directional adjacency
//! ([`reachable_from`]).

pub mod pathfind;
pub mod strategies;

pub use pathfind::PathfindingPlacer;
pub use strategies::{
    CenterPlacer, ClusteredPlacer, CornerPlacer, RandomPlacer, SpreadPlacer, WallProximityPlacer,
};

use crate::config::EntitySpec;
use crate::grid::{Position, TileGrid};
use crate::level::{Entity, EntityKind};
use crate::random::SeededRandom;
use pathfinding::prelude::bfs_reach;

/// Strategy interface for placing one entity instance.
///
/// Implementations draw all randomness from the supplied [`SeededRandom`]
/// and must select uniformly among equally-preferred candidates rather
/// than taking the first found, to avoid bias toward scan order.
pub trait EntityPlacer: Send + Sync {
    /// Canonical name this placer registers under.
    fn name(&self) -> &'static str;

    /// Proposes a position for one instance of `spec`, or `None` when no
    /// position satisfies the constraints.
    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position>;
}

/// The shared validity rule every strategy filters with.
///
/// A position is valid when it is in bounds, walkable (unless the kind is
/// exempt), does not violate the one-Player-per-level rule, keeps
/// `min_distance` to every existing entity, and stays within
/// `max_distance_from_player` when a player exists and the bound is set.
pub fn is_valid_position(
    grid: &TileGrid,
    pos: Position,
    spec: &EntitySpec,
    existing: &[Entity],
) -> bool {
    if !grid.contains(pos) {
        return false;
    }
    if spec.kind.requires_walkable() && !grid.is_walkable_pos(pos) {
        return false;
    }
    if spec.kind.is_unique() && existing.iter().any(|e| e.kind == spec.kind) {
        return false;
    }
    if existing
        .iter()
        .any(|e| pos.euclidean_distance(e.position) < spec.min_distance)
    {
        return false;
    }
    if let Some(max) = spec.max_distance_from_player {
        if let Some(player) = existing.iter().find(|e| e.kind == EntityKind::Player) {
            if pos.euclidean_distance(player.position) > max {
                return false;
            }
        }
    }
    true
}

/// Every position reachable from `start` over walkable tiles under
/// 4-directional movement, in breadth-first discovery order.
///
/// An unwalkable start yields an empty set. The deterministic ordering
/// matters: placers index into this list with the shared RNG, so the
/// ordering is part of the reproducibility contract.
pub fn reachable_from(grid: &TileGrid, start: Position) -> Vec<Position> {
    if !grid.is_walkable_pos(start) {
        return Vec::new();
    }
    bfs_reach(start, |&pos| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&next| grid.is_walkable_pos(next))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// All valid positions for `spec`, in row-major scan order.
pub(crate) fn valid_candidates(
    grid: &TileGrid,
    spec: &EntitySpec,
    existing: &[Entity],
) -> Vec<Position> {
    grid.positions()
        .filter(|&pos| is_valid_position(grid, pos, spec, existing))
        .collect()
}
