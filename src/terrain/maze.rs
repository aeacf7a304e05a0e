//! Maze-carving terrain generation.
//!
//! Carves a spanning tree of corridors out of a solid wall grid with an
//! iterative randomized depth-first search over a cell lattice. Because
//! the carved passages form a tree, the walkable region is a single
//! connected component by construction.

use super::{dimension_errors, parameter_table, unknown_parameter_errors, TerrainGenerator};
use crate::config::GenerationConfig;
use crate::grid::{TileGrid, TileType};
use crate::random::SeededRandom;
use crate::{ForgeError, ForgeResult};
use std::collections::HashMap;

/// Tree-maze generator.
///
/// Parameters:
/// - `path_width` (>= 1, integer-valued): corridor width in tiles
/// - `wall_thickness` (>= 1, integer-valued): wall width between corridors
///
/// The grid must fit at least one lattice cell per axis:
/// `2 * wall_thickness + path_width` tiles.
#[derive(Debug, Clone, Default)]
pub struct MazeCarverGenerator;

impl MazeCarverGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Lattice geometry derived from the parameters.
struct Lattice {
    path_width: i32,
    wall_thickness: i32,
    cols: i32,
    rows: i32,
}

impl Lattice {
    fn step(&self) -> i32 {
        self.path_width + self.wall_thickness
    }

    /// Top-left tile of a lattice cell's carved area.
    fn cell_origin(&self, cx: i32, cy: i32) -> (i32, i32) {
        (
            self.wall_thickness + cx * self.step(),
            self.wall_thickness + cy * self.step(),
        )
    }
}

impl TerrainGenerator for MazeCarverGenerator {
    fn name(&self) -> &'static str {
        "maze_carver"
    }

    fn default_parameters(&self) -> HashMap<String, f64> {
        parameter_table(&[("path_width", 1.0), ("wall_thickness", 1.0)])
    }

    fn validate_parameters(&self, config: &GenerationConfig) -> Vec<String> {
        let defaults = self.default_parameters();
        let mut errors = unknown_parameter_errors(config, &defaults, self.name());

        let path_width = config.parameter("path_width", &defaults);
        let wall_thickness = config.parameter("wall_thickness", &defaults);
        for (name, value) in [("path_width", path_width), ("wall_thickness", wall_thickness)] {
            if value < 1.0 || value.fract() != 0.0 {
                errors.push(format!(
                    "{}: {} must be a positive integer, got {}",
                    self.name(),
                    name,
                    value
                ));
            }
        }

        if errors.is_empty() {
            // One lattice cell plus surrounding walls must fit.
            let min = (2.0 * wall_thickness + path_width) as u32;
            errors.extend(dimension_errors(config, min, min, self.name()));
        }

        errors
    }

    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut SeededRandom,
    ) -> ForgeResult<TileGrid> {
        let defaults = self.default_parameters();
        let path_width = config.parameter("path_width", &defaults) as i32;
        let wall_thickness = config.parameter("wall_thickness", &defaults) as i32;

        let step = path_width + wall_thickness;
        let cols = (config.width as i32 - wall_thickness) / step;
        let rows = (config.height as i32 - wall_thickness) / step;
        if cols < 1 || rows < 1 {
            return Err(ForgeError::GenerationFailed(format!(
                "maze lattice does not fit a {}x{} grid with path_width {} and wall_thickness {}",
                config.width, config.height, path_width, wall_thickness
            )));
        }
        let lattice = Lattice {
            path_width,
            wall_thickness,
            cols,
            rows,
        };

        let mut grid = TileGrid::filled(config.width, config.height, TileType::Wall)?;
        let mut visited = vec![false; (cols * rows) as usize];
        let cell_index = |cx: i32, cy: i32| (cy * cols + cx) as usize;

        let start = rng.next_int((cols * rows) as u32) as i32;
        let start = (start % cols, start / cols);
        visited[cell_index(start.0, start.1)] = true;
        carve_cell(&mut grid, &lattice, start.0, start.1)?;

        // Iterative backtracker: walk to a random unvisited neighbor,
        // carving the passage, and retreat when boxed in.
        let mut stack = vec![start];
        while let Some(&(cx, cy)) = stack.last() {
            let mut neighbors: Vec<(i32, i32)> = [(0, -1), (-1, 0), (1, 0), (0, 1)]
                .iter()
                .map(|&(dx, dy)| (cx + dx, cy + dy))
                .filter(|&(nx, ny)| {
                    nx >= 0 && ny >= 0 && nx < cols && ny < rows && !visited[cell_index(nx, ny)]
                })
                .collect();

            if neighbors.is_empty() {
                stack.pop();
                continue;
            }

            rng.shuffle(&mut neighbors);
            let (nx, ny) = neighbors[0];
            visited[cell_index(nx, ny)] = true;
            carve_cell(&mut grid, &lattice, nx, ny)?;
            carve_passage(&mut grid, &lattice, (cx, cy), (nx, ny))?;
            stack.push((nx, ny));
        }

        Ok(grid)
    }
}

/// Carves a lattice cell's path_width square to ground.
fn carve_cell(grid: &mut TileGrid, lattice: &Lattice, cx: i32, cy: i32) -> ForgeResult<()> {
    let (ox, oy) = lattice.cell_origin(cx, cy);
    carve_rect(grid, ox, oy, lattice.path_width, lattice.path_width)
}

/// Carves the wall strip between two adjacent lattice cells.
fn carve_passage(
    grid: &mut TileGrid,
    lattice: &Lattice,
    from: (i32, i32),
    to: (i32, i32),
) -> ForgeResult<()> {
    let (fx, fy) = lattice.cell_origin(from.0.min(to.0), from.1.min(to.1));
    if from.0 != to.0 {
        // Horizontal passage east of the leftmost cell.
        carve_rect(
            grid,
            fx + lattice.path_width,
            fy,
            lattice.wall_thickness,
            lattice.path_width,
        )
    } else {
        // Vertical passage south of the topmost cell.
        carve_rect(
            grid,
            fx,
            fy + lattice.path_width,
            lattice.path_width,
            lattice.wall_thickness,
        )
    }
}

fn carve_rect(grid: &mut TileGrid, x: i32, y: i32, w: i32, h: i32) -> ForgeResult<()> {
    for ty in y..y + h {
        for tx in x..x + w {
            grid.set(tx, ty, TileType::Ground)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;
    use crate::placement::reachable_from;

    #[test]
    fn test_default_parameters_pass_validation() {
        let generator = MazeCarverGenerator::new();
        let config = GenerationConfig::new(9, 9, "maze_carver");
        assert!(generator.validate_parameters(&config).is_empty());
    }

    #[test]
    fn test_lattice_must_fit() {
        let generator = MazeCarverGenerator::new();
        // 2*1 + 2 = 4 tiles minimum; a 3-wide grid cannot hold one cell.
        let config = GenerationConfig::new(3, 9, "maze_carver").with_parameter("path_width", 2.0);
        assert!(!generator.validate_parameters(&config).is_empty());
    }

    #[test]
    fn test_non_integer_parameters_rejected() {
        let generator = MazeCarverGenerator::new();
        let config = GenerationConfig::new(9, 9, "maze_carver").with_parameter("path_width", 1.5);
        let errors = generator.validate_parameters(&config);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_single_connected_component() {
        let generator = MazeCarverGenerator::new();
        for seed in [1u64, 42, 999] {
            let config = GenerationConfig::new(21, 21, "maze_carver");
            let grid = generator
                .generate(&config, &mut SeededRandom::new(seed))
                .unwrap();

            let walkable: Vec<Position> = grid.walkable_positions().collect();
            assert!(!walkable.is_empty());
            let reached = reachable_from(&grid, walkable[0]);
            assert_eq!(
                reached.len(),
                walkable.len(),
                "maze for seed {} is not one component",
                seed
            );
        }
    }

    #[test]
    fn test_wide_corridors() {
        let generator = MazeCarverGenerator::new();
        let config = GenerationConfig::new(9, 9, "maze_carver")
            .with_parameter("path_width", 2.0)
            .with_parameter("wall_thickness", 1.0);
        let grid = generator
            .generate(&config, &mut SeededRandom::new(42))
            .unwrap();

        // 2x2 lattice of 2x2 cells, all carved and connected.
        let walkable: Vec<Position> = grid.walkable_positions().collect();
        let reached = reachable_from(&grid, walkable[0]);
        assert_eq!(reached.len(), walkable.len());
        // A spanning tree over 4 cells carves 3 passages: 4*4 + 3*2 tiles.
        assert_eq!(walkable.len(), 22);
    }

    #[test]
    fn test_deterministic_output() {
        let generator = MazeCarverGenerator::new();
        let config = GenerationConfig::new(15, 15, "maze_carver");
        let grid_a = generator
            .generate(&config, &mut SeededRandom::new(3))
            .unwrap();
        let grid_b = generator
            .generate(&config, &mut SeededRandom::new(3))
            .unwrap();
        assert_eq!(grid_a, grid_b);
    }

    #[test]
    fn test_border_walls_preserved() {
        let generator = MazeCarverGenerator::new();
        let config = GenerationConfig::new(11, 11, "maze_carver");
        let grid = generator
            .generate(&config, &mut SeededRandom::new(8))
            .unwrap();
        for x in 0..11 {
            assert_eq!(grid.get(x, 0).unwrap(), TileType::Wall);
        }
        for y in 0..11 {
            assert_eq!(grid.get(0, y).unwrap(), TileType::Wall);
        }
    }
}
