//! Integration tests for the reproducibility guarantee: identical
//! (configuration, seed) inputs produce bit-identical grids and identical
//! entity lists, sequentially and across threads.

use levelforge::{
    EntityKind, EntitySpec, GenerationConfig, GenerationManager, Level, TileType,
};
use proptest::prelude::*;

/// Routes `log` output through the test harness when `RUST_LOG` is set.
fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn full_config(algorithm: &str, seed: u64) -> GenerationConfig {
    GenerationConfig::new(32, 24, algorithm)
        .with_seed(seed)
        .with_entity(EntitySpec::new(EntityKind::Player, 1).with_strategy("pathfinding"))
        .with_entity(
            EntitySpec::new(EntityKind::Exit, 1)
                .with_strategy("pathfinding")
                .with_min_distance(4.0),
        )
        .with_entity(EntitySpec::new(EntityKind::Enemy, 4).with_strategy("spread"))
        .with_entity(EntitySpec::new(EntityKind::Item, 3).with_strategy("wall_proximity"))
        .with_entity(EntitySpec::new(EntityKind::Npc, 2).with_strategy("clustered"))
        .with_entity(EntitySpec::new(EntityKind::Checkpoint, 1).with_strategy("center"))
        .with_entity(EntitySpec::new(EntityKind::Trigger, 1).with_strategy("corner"))
}

fn assert_identical(a: &Level, b: &Level) {
    assert_eq!(a.grid, b.grid, "grids differ");
    assert_eq!(a.entities, b.entities, "entity lists differ");
    assert_eq!(a.report.is_playable, b.report.is_playable);
    assert_eq!(a.report.quality_score, b.report.quality_score);
}

/// Every built-in algorithm reproduces exactly, entities included, with
/// every built-in placement strategy exercised.
#[test]
fn identical_runs_for_every_algorithm() {
    init_logs();
    let manager = GenerationManager::with_defaults();
    for algorithm in ["noise_field", "cellular_automata", "maze_carver", "room_graph"] {
        let config = full_config(algorithm, 20_240_601);
        let first = manager.generate(&config).expect("generation succeeds");
        let second = manager.generate(&config).expect("generation succeeds");
        assert_identical(&first, &second);
    }
}

/// Different seeds produce different levels (overwhelmingly likely for a
/// 32x24 grid; a collision here means seeding is broken).
#[test]
fn different_seeds_differ() {
    init_logs();
    let manager = GenerationManager::with_defaults();
    let a = manager
        .generate(&full_config("cellular_automata", 1))
        .expect("generation succeeds");
    let b = manager
        .generate(&full_config("cellular_automata", 2))
        .expect("generation succeeds");
    assert_ne!(a.grid, b.grid);
}

/// Independent runs of the same configuration on separate threads agree
/// with a sequential run: there is no hidden shared state.
#[test]
fn parallel_runs_are_independent() {
    init_logs();
    let manager = std::sync::Arc::new(GenerationManager::with_defaults());
    let config = full_config("room_graph", 9001);
    let reference = manager.generate(&config).expect("generation succeeds");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            let config = config.clone();
            std::thread::spawn(move || manager.generate(&config).expect("generation succeeds"))
        })
        .collect();

    for handle in handles {
        let level = handle.join().expect("worker thread panicked");
        assert_identical(&reference, &level);
    }
}

/// Entity positions always satisfy the walkability table for their kind,
/// for all generators and strategies.
#[test]
fn placed_entities_stand_on_walkable_tiles() {
    init_logs();
    let manager = GenerationManager::with_defaults();
    for algorithm in ["noise_field", "cellular_automata", "maze_carver", "room_graph"] {
        let level = manager
            .generate(&full_config(algorithm, 424_242))
            .expect("generation succeeds");
        for entity in &level.entities {
            let tile = level
                .grid
                .get_pos(entity.position)
                .expect("entity in bounds");
            assert!(
                tile.is_walkable(),
                "{:?} stands on {:?} in {}",
                entity.kind,
                tile,
                algorithm
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Determinism holds for arbitrary seeds, not just hand-picked ones.
    #[test]
    fn determinism_over_arbitrary_seeds(seed in any::<u64>()) {
        let manager = GenerationManager::with_defaults();
        let config = GenerationConfig::new(16, 16, "cellular_automata")
            .with_seed(seed)
            .with_entity(EntitySpec::new(EntityKind::Player, 1).with_strategy("pathfinding"))
            .with_entity(EntitySpec::new(EntityKind::Enemy, 2));

        let a = manager.generate(&config).expect("generation succeeds");
        let b = manager.generate(&config).expect("generation succeeds");
        prop_assert_eq!(&a.grid, &b.grid);
        prop_assert_eq!(&a.entities, &b.entities);
    }

    /// Maze output is a single connected component for arbitrary seeds.
    #[test]
    fn maze_connectivity_over_arbitrary_seeds(seed in any::<u64>()) {
        let manager = GenerationManager::with_defaults();
        let config = GenerationConfig::new(17, 13, "maze_carver").with_seed(seed);
        let level = manager.generate(&config).expect("generation succeeds");

        let walkable: Vec<_> = level.grid.walkable_positions().collect();
        prop_assert!(!walkable.is_empty());
        let reached = levelforge::placement::reachable_from(&level.grid, walkable[0]);
        prop_assert_eq!(reached.len(), walkable.len());
    }
}

/// A degenerate all-wall terrain still reproduces (everything fails to
/// place, identically).
#[test]
fn determinism_with_total_placement_failure() {
    init_logs();
    let manager = GenerationManager::with_defaults();
    let config = GenerationConfig::new(12, 12, "cellular_automata")
        .with_seed(3)
        .with_parameter("initial_density", 1.0)
        .with_parameter("iterations", 0.0)
        .with_entity(EntitySpec::new(EntityKind::Player, 1).with_strategy("pathfinding"));

    let a = manager.generate(&config).expect("soft failures never abort");
    let b = manager.generate(&config).expect("soft failures never abort");
    assert_eq!(a.grid.count_tiles(TileType::Wall), a.grid.area());
    assert!(a.entities.is_empty());
    assert_identical(&a, &b);
}
