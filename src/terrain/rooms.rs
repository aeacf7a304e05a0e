//! Room-graph terrain generation.
//!
//! Places non-overlapping rectangular rooms by rejection sampling, then
//! connects them with L-shaped corridors along a minimum spanning tree
//! over room centers, so every room is reachable from every other by
//! construction.

use super::{dimension_errors, parameter_table, unknown_parameter_errors, TerrainGenerator};
use crate::config::GenerationConfig;
use crate::grid::{Position, TileGrid, TileType};
use crate::random::SeededRandom;
use crate::{ForgeError, ForgeResult};
use log::warn;
use std::collections::HashMap;

/// Attempts per room before giving up on that room.
const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Room-and-corridor generator.
///
/// Parameters:
/// - `room_count` (>= 1, integer-valued): rooms to attempt
/// - `min_room_size` (>= 3, integer-valued): smallest room edge
/// - `max_room_size` (>= min_room_size, integer-valued): largest room edge
/// - `corridor_width` (>= 1, integer-valued): corridor thickness
///
/// Placing fewer rooms than requested is tolerated (and logged); placing
/// none at all aborts the run.
#[derive(Debug, Clone, Default)]
pub struct RoomGraphGenerator;

impl RoomGraphGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// A placed rectangular room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Room {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Room {
    fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Overlap test with a one-tile gap so room walls never merge.
    fn overlaps_with_gap(&self, other: &Room) -> bool {
        !(self.x >= other.x + other.width + 1
            || other.x >= self.x + self.width + 1
            || self.y >= other.y + other.height + 1
            || other.y >= self.y + self.height + 1)
    }
}

impl TerrainGenerator for RoomGraphGenerator {
    fn name(&self) -> &'static str {
        "room_graph"
    }

    fn default_parameters(&self) -> HashMap<String, f64> {
        parameter_table(&[
            ("room_count", 8.0),
            ("min_room_size", 4.0),
            ("max_room_size", 10.0),
            ("corridor_width", 1.0),
        ])
    }

    fn validate_parameters(&self, config: &GenerationConfig) -> Vec<String> {
        let defaults = self.default_parameters();
        let mut errors = unknown_parameter_errors(config, &defaults, self.name());

        let room_count = config.parameter("room_count", &defaults);
        let min_size = config.parameter("min_room_size", &defaults);
        let max_size = config.parameter("max_room_size", &defaults);
        let corridor_width = config.parameter("corridor_width", &defaults);

        for (name, value, minimum) in [
            ("room_count", room_count, 1.0),
            ("min_room_size", min_size, 3.0),
            ("max_room_size", max_size, 3.0),
            ("corridor_width", corridor_width, 1.0),
        ] {
            if value < minimum || value.fract() != 0.0 {
                errors.push(format!(
                    "{}: {} must be an integer >= {}, got {}",
                    self.name(),
                    name,
                    minimum,
                    value
                ));
            }
        }
        if max_size < min_size {
            errors.push(format!(
                "{}: max_room_size ({}) must be >= min_room_size ({})",
                self.name(),
                max_size,
                min_size
            ));
        }

        if errors.is_empty() {
            // The smallest room plus a wall border must fit.
            let min_dim = min_size as u32 + 2;
            errors.extend(dimension_errors(config, min_dim, min_dim, self.name()));
        }

        errors
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut SeededRandom,
    ) -> ForgeResult<TileGrid> {
        let defaults = self.default_parameters();
        let room_count = config.parameter("room_count", &defaults) as u32;
        let min_size = config.parameter("min_room_size", &defaults) as i32;
        let max_size = config.parameter("max_room_size", &defaults) as i32;
        let corridor_width = config.parameter("corridor_width", &defaults) as i32;

        let mut grid = TileGrid::filled(config.width, config.height, TileType::Wall)?;
        let rooms = place_rooms(&grid, room_count, min_size, max_size, rng)?;
        if rooms.len() < room_count as usize {
            warn!(
                "room_graph: placed {} of {} requested rooms on a {}x{} grid",
                rooms.len(),
                room_count,
                config.width,
                config.height
            );
        }

        for room in &rooms {
            carve_room(&mut grid, room)?;
        }
        for (a, b) in spanning_tree_edges(&rooms) {
            carve_l_corridor(&mut grid, rooms[a].center(), rooms[b].center(), corridor_width)?;
        }

        Ok(grid)
    }
}

/// Rejection-samples non-overlapping rooms within the grid border.
fn place_rooms(
    grid: &TileGrid,
    room_count: u32,
    min_size: i32,
    max_size: i32,
    rng: &mut SeededRandom,
) -> ForgeResult<Vec<Room>> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut rooms: Vec<Room> = Vec::new();

    for _ in 0..room_count {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let w = rng.next_range(min_size, max_size.min(width - 2));
            let h = rng.next_range(min_size, max_size.min(height - 2));
            let room = Room {
                x: rng.next_range(1, width - w - 1),
                y: rng.next_range(1, height - h - 1),
                width: w,
                height: h,
            };
            if rooms.iter().any(|existing| room.overlaps_with_gap(existing)) {
                continue;
            }
            rooms.push(room);
            break;
        }
    }

    if rooms.is_empty() {
        return Err(ForgeError::GenerationFailed(format!(
            "room_graph: could not place any of {} rooms on a {}x{} grid",
            room_count, width, height
        )));
    }
    Ok(rooms)
}

fn carve_room(grid: &mut TileGrid, room: &Room) -> ForgeResult<()> {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            grid.set(x, y, TileType::Ground)?;
        }
    }
    Ok(())
}

/// Prim's minimum spanning tree over room centers (Euclidean weights).
///
/// Returns edges as index pairs into the room list.
fn spanning_tree_edges(rooms: &[Room]) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    if rooms.len() < 2 {
        return edges;
    }

    let mut in_tree = vec![false; rooms.len()];
    in_tree[0] = true;
    for _ in 1..rooms.len() {
        let mut best: Option<(usize, usize, f64)> = None;
        for (a, _) in rooms.iter().enumerate().filter(|&(i, _)| in_tree[i]) {
            for (b, _) in rooms.iter().enumerate().filter(|&(i, _)| !in_tree[i]) {
                let dist = rooms[a].center().euclidean_distance(rooms[b].center());
                if best.map(|(_, _, d)| dist < d).unwrap_or(true) {
                    best = Some((a, b, dist));
                }
            }
        }
        if let Some((a, b, _)) = best {
            in_tree[b] = true;
            edges.push((a, b));
        }
    }
    edges
}

/// Carves an L-shaped corridor of the given width between two points,
/// horizontal leg first. Cells falling outside the grid are clipped.
fn carve_l_corridor(
    grid: &mut TileGrid,
    start: Position,
    end: Position,
    width: i32,
) -> ForgeResult<()> {
    let (min_x, max_x) = (start.x.min(end.x), start.x.max(end.x));
    for x in min_x..=max_x {
        for offset in 0..width {
            if grid.in_bounds(x, start.y + offset) {
                grid.set(x, start.y + offset, TileType::Ground)?;
            }
        }
    }
    let (min_y, max_y) = (start.y.min(end.y), start.y.max(end.y));
    for y in min_y..=max_y {
        for offset in 0..width {
            if grid.in_bounds(end.x + offset, y) {
                grid.set(end.x + offset, y, TileType::Ground)?;
            }
        }
    }
    Ok(())
}
