//! Geometric placement strategies.
//!
//! Six strategies that pick among valid candidate positions under a
//! geometric preference rule. All of them filter through the shared
//! validity rule ([`super::is_valid_position`]) and break ties uniformly
//! at random via the shared [`SeededRandom`], never by scan order.

use super::{valid_candidates, EntityPlacer};
use crate::config::EntitySpec;
use crate::defaults;
use crate::grid::{Position, TileGrid};
use crate::level::Entity;
use crate::random::SeededRandom;

/// Uniformly random choice among all valid positions.
#[derive(Debug, Clone, Default)]
pub struct RandomPlacer;

impl EntityPlacer for RandomPlacer {
    fn name(&self) -> &'static str {
        "random"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let candidates = valid_candidates(grid, spec, existing);
        rng.choose(&candidates).copied()
    }
}

/// Places near an existing entity of the same kind.
///
/// Picks a random same-kind anchor and a random valid position within the
/// cluster radius (the `cluster_radius` property on the entity spec, when set).
/// With no same-kind anchor, or no valid position near one, this degrades
/// to the random strategy so early instances of a kind can seed clusters.
#[derive(Debug, Clone, Default)]
pub struct ClusteredPlacer;

impl EntityPlacer for ClusteredPlacer {
    fn name(&self) -> &'static str {
        "clustered"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let radius = spec
            .properties
            .get("cluster_radius")
            .and_then(|v| v.as_f64())
            .unwrap_or(defaults::DEFAULT_CLUSTER_RADIUS);

        let anchors: Vec<&Entity> = existing.iter().filter(|e| e.kind == spec.kind).collect();
        if let Some(anchor) = rng.choose(&anchors) {
            let anchor_pos = anchor.position;
            let nearby: Vec<Position> = valid_candidates(grid, spec, existing)
                .into_iter()
                .filter(|pos| pos.euclidean_distance(anchor_pos) <= radius)
                .collect();
            if let Some(pos) = rng.choose(&nearby) {
                return Some(*pos);
            }
        }

        RandomPlacer.find_position(grid, spec, existing, rng)
    }
}

/// Maximizes the minimum distance to existing entities.
///
/// With nothing placed yet this is uniform over all valid positions.
#[derive(Debug, Clone, Default)]
pub struct SpreadPlacer;

impl EntityPlacer for SpreadPlacer {
    fn name(&self) -> &'static str {
        "spread"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let candidates = valid_candidates(grid, spec, existing);
        if existing.is_empty() {
            return rng.choose(&candidates).copied();
        }
        let isolation = |pos: &Position| {
            existing
                .iter()
                .map(|e| pos.euclidean_distance(e.position))
                .fold(f64::INFINITY, f64::min)
        };
        choose_best(&candidates, rng, |pos| isolation(pos))
    }
}

/// Prefers positions adjacent to blocking terrain.
///
/// A candidate qualifies when at least one of its in-bounds 8-neighbors
/// is unwalkable; the grid edge itself does not count as a wall.
#[derive(Debug, Clone, Default)]
pub struct WallProximityPlacer;

impl EntityPlacer for WallProximityPlacer {
    fn name(&self) -> &'static str {
        "wall_proximity"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let against_wall: Vec<Position> = valid_candidates(grid, spec, existing)
            .into_iter()
            .filter(|pos| {
                pos.adjacent_positions()
                    .into_iter()
                    .any(|n| grid.contains(n) && !grid.is_walkable_pos(n))
            })
            .collect();
        rng.choose(&against_wall).copied()
    }
}

/// Prefers the position nearest the grid center.
#[derive(Debug, Clone, Default)]
pub struct CenterPlacer;

impl EntityPlacer for CenterPlacer {
    fn name(&self) -> &'static str {
        "center"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let cx = (grid.width() as f64 - 1.0) / 2.0;
        let cy = (grid.height() as f64 - 1.0) / 2.0;
        let candidates = valid_candidates(grid, spec, existing);
        choose_best(&candidates, rng, |pos| {
            let dx = pos.x as f64 - cx;
            let dy = pos.y as f64 - cy;
            -(dx * dx + dy * dy)
        })
    }
}

/// Prefers positions nearest any of the four grid corners.
#[derive(Debug, Clone, Default)]
pub struct CornerPlacer;

impl EntityPlacer for CornerPlacer {
    fn name(&self) -> &'static str {
        "corner"
    }

    fn find_position(
        &self,
        grid: &TileGrid,
        spec: &EntitySpec,
        existing: &[Entity],
        rng: &mut SeededRandom,
    ) -> Option<Position> {
        let w = grid.width() as i32;
        let h = grid.height() as i32;
        let corners = [
            Position::new(0, 0),
            Position::new(w - 1, 0),
            Position::new(0, h - 1),
            Position::new(w - 1, h - 1),
        ];
        let candidates = valid_candidates(grid, spec, existing);
        choose_best(&candidates, rng, |pos| {
            -corners
                .iter()
                .map(|c| pos.euclidean_distance(*c))
                .fold(f64::INFINITY, f64::min)
        })
    }
}

/// Picks uniformly among the candidates scoring highest under `score`.
///
/// Scores are computed identically for ties, so exact equality is a
/// deterministic tie test.
fn choose_best<F>(candidates: &[Position], rng: &mut SeededRandom, score: F) -> Option<Position>
where
    F: Fn(&Position) -> f64,
{
    let best = candidates
        .iter()
        .map(&score)
        .fold(f64::NEG_INFINITY, f64::max);
    if best == f64::NEG_INFINITY {
        return None;
    }
    let tied: Vec<Position> = candidates
        .iter()
        .copied()
        .filter(|pos| score(pos) == best)
        .collect();
    rng.choose(&tied).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileType;
    use crate::level::{EntityKind, PropertyBag, PropertyValue};

    fn entity_at(id: u64, kind: EntityKind, x: i32, y: i32) -> Entity {
        Entity {
            id,
            kind,
            position: Position::new(x, y),
            properties: PropertyBag::new(),
        }
    }

    #[test]
    fn test_random_placer_uniform_over_valid() {
        let mut grid = TileGrid::filled(3, 1, TileType::Wall).unwrap();
        grid.set(1, 0, TileType::Ground).unwrap();
        let spec = EntitySpec::new(EntityKind::Item, 1);

        let pos = RandomPlacer
            .find_position(&grid, &spec, &[], &mut SeededRandom::new(1))
            .unwrap();
        assert_eq!(pos, Position::new(1, 0));
    }

    #[test]
    fn test_random_placer_none_when_no_candidates() {
        let grid = TileGrid::filled(3, 3, TileType::Wall).unwrap();
        let spec = EntitySpec::new(EntityKind::Item, 1);
        assert!(RandomPlacer
            .find_position(&grid, &spec, &[], &mut SeededRandom::new(1))
            .is_none());
    }

    #[test]
    fn test_clustered_placer_stays_near_anchor() {
        let grid = TileGrid::filled(30, 30, TileType::Ground).unwrap();
        let existing = vec![entity_at(0, EntityKind::Enemy, 5, 5)];
        let mut spec = EntitySpec::new(EntityKind::Enemy, 1);
        spec.properties.insert(
            "cluster_radius".to_string(),
            PropertyValue::Float(3.0),
        );

        let mut rng = SeededRandom::new(11);
        for _ in 0..20 {
            let pos = ClusteredPlacer
                .find_position(&grid, &spec, &existing, &mut rng)
                .unwrap();
            assert!(pos.euclidean_distance(Position::new(5, 5)) <= 3.0);
        }
    }

    #[test]
    fn test_clustered_placer_falls_back_without_anchor() {
        let grid = TileGrid::filled(10, 10, TileType::Ground).unwrap();
        let spec = EntitySpec::new(EntityKind::Enemy, 1);
        let pos = ClusteredPlacer.find_position(&grid, &spec, &[], &mut SeededRandom::new(2));
        assert!(pos.is_some());
    }

    #[test]
    fn test_spread_placer_avoids_existing() {
        let grid = TileGrid::filled(11, 1, TileType::Ground).unwrap();
        let existing = vec![entity_at(0, EntityKind::Enemy, 0, 0)];
        let spec = EntitySpec::new(EntityKind::Enemy, 1);

        let pos = SpreadPlacer
            .find_position(&grid, &spec, &existing, &mut SeededRandom::new(3))
            .unwrap();
        // The far end is the unique farthest point from (0, 0).
        assert_eq!(pos, Position::new(10, 0));
    }

    #[test]
    fn test_wall_proximity_placer_requires_adjacent_wall() {
        let mut grid = TileGrid::filled(9, 9, TileType::Ground).unwrap();
        grid.set(4, 4, TileType::Wall).unwrap();
        let spec = EntitySpec::new(EntityKind::Trigger, 1);

        let mut rng = SeededRandom::new(4);
        for _ in 0..20 {
            let pos = WallProximityPlacer
                .find_position(&grid, &spec, &[], &mut rng)
                .unwrap();
            assert!(pos
                .adjacent_positions()
                .into_iter()
                .any(|n| grid.contains(n) && !grid.is_walkable_pos(n)));
        }
    }

    #[test]
    fn test_wall_proximity_edge_does_not_count() {
        // All-ground grid has no walls anywhere, so nothing qualifies even
        // though border tiles touch the grid edge.
        let grid = TileGrid::filled(5, 5, TileType::Ground).unwrap();
        let spec = EntitySpec::new(EntityKind::Trigger, 1);
        assert!(WallProximityPlacer
            .find_position(&grid, &spec, &[], &mut SeededRandom::new(5))
            .is_none());
    }

    #[test]
    fn test_center_placer_picks_middle() {
        let grid = TileGrid::filled(9, 9, TileType::Ground).unwrap();
        let spec = EntitySpec::new(EntityKind::Checkpoint, 1);
        let pos = CenterPlacer
            .find_position(&grid, &spec, &[], &mut SeededRandom::new(6))
            .unwrap();
        assert_eq!(pos, Position::new(4, 4));
    }

    #[test]
    fn test_corner_placer_picks_a_corner() {
        let grid = TileGrid::filled(8, 6, TileType::Ground).unwrap();
        let spec = EntitySpec::new(EntityKind::Exit, 1);
        let pos = CornerPlacer
            .find_position(&grid, &spec, &[], &mut SeededRandom::new(7))
            .unwrap();
        let corners = [
            Position::new(0, 0),
            Position::new(7, 0),
            Position::new(0, 5),
            Position::new(7, 5),
        ];
        assert!(corners.contains(&pos));
    }

    #[test]
    fn test_strategies_respect_min_distance() {
        let grid = TileGrid::filled(12, 12, TileType::Ground).unwrap();
        let existing = vec![entity_at(0, EntityKind::Player, 6, 6)];
        let spec = EntitySpec::new(EntityKind::Enemy, 1).with_min_distance(4.0);

        let placers: [&dyn EntityPlacer; 5] = [
            &RandomPlacer,
            &ClusteredPlacer,
            &SpreadPlacer,
            &CenterPlacer,
            &CornerPlacer,
        ];
        let mut rng = SeededRandom::new(8);
        for placer in placers {
            if let Some(pos) = placer.find_position(&grid, &spec, &existing, &mut rng) {
                assert!(
                    pos.euclidean_distance(Position::new(6, 6)) >= 4.0,
                    "{} violated min_distance",
                    placer.name()
                );
            }
        }
    }
}
