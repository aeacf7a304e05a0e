//! # Grid Module
//!
//! Tile types, coordinates, and the bounds-checked 2D tile container.
//!
//! The walkability of every [`TileType`] is defined by a single fixed
//! classification table ([`TileType::is_walkable`]); every component that
//! cares about walkability consults that table and nothing else.

use crate::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};

/// Represents a 2D tile coordinate in a level.
///
/// # Examples
///
/// ```
/// use levelforge::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use levelforge::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns all 8 adjacent positions (including diagonals).
    pub fn adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x - 1, self.y - 1),
            Position::new(self.x, self.y - 1),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y + 1),
        ]
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    ///
    /// This is the adjacency used for all reachability computations:
    /// "reachable" in this engine always means connected under
    /// 4-directional movement over walkable tiles.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
            Position::new(self.x, self.y + 1),
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// The closed set of terrain tile types.
///
/// Each variant maps to exactly one walkability classification via
/// [`TileType::is_walkable`]; no other table exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Ground,
    Wall,
    Water,
    Grass,
    Stone,
    Sand,
    Lava,
    Ice,
}

impl TileType {
    /// All tile types, in declaration order.
    pub const ALL: [TileType; 8] = [
        TileType::Ground,
        TileType::Wall,
        TileType::Water,
        TileType::Grass,
        TileType::Stone,
        TileType::Sand,
        TileType::Lava,
        TileType::Ice,
    ];

    /// The fixed walkability classification table.
    ///
    /// Wall, Water, and Lava block movement; every other type is walkable.
    ///
    /// # Examples
    ///
    /// ```
    /// use levelforge::TileType;
    ///
    /// assert!(TileType::Ground.is_walkable());
    /// assert!(TileType::Ice.is_walkable());
    /// assert!(!TileType::Wall.is_walkable());
    /// assert!(!TileType::Lava.is_walkable());
    /// ```
    pub const fn is_walkable(self) -> bool {
        !matches!(self, TileType::Wall | TileType::Water | TileType::Lava)
    }
}

/// A bounds-checked, owned 2D grid of tiles.
///
/// Tiles are stored in a single flat buffer indexed `y * width + x` for
/// cache locality. All access goes through bounds-checked methods; there is
/// no way to read or write outside the grid.
///
/// A grid is created once by a terrain generator and treated as immutable
/// for the rest of the pipeline.
///
/// # Examples
///
/// ```
/// use levelforge::{TileGrid, TileType};
///
/// let mut grid = TileGrid::filled(10, 8, TileType::Wall).unwrap();
/// grid.set(3, 4, TileType::Ground).unwrap();
/// assert_eq!(grid.get(3, 4).unwrap(), TileType::Ground);
/// assert!(grid.is_walkable(3, 4));
/// assert!(!grid.in_bounds(10, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// Creates a grid filled with the given tile type.
    ///
    /// Returns a configuration error for zero-sized dimensions.
    pub fn filled(width: u32, height: u32, fill: TileType) -> ForgeResult<Self> {
        if width == 0 || height == 0 {
            return Err(ForgeError::Configuration(vec![format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )]));
        }
        Ok(Self {
            width,
            height,
            tiles: vec![fill; (width as usize) * (height as usize)],
        })
    }

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles.
    pub fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Whether (x, y) lies within the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Whether a position lies within the grid.
    pub fn contains(&self, pos: Position) -> bool {
        self.in_bounds(pos.x, pos.y)
    }

    fn index(&self, x: i32, y: i32) -> ForgeResult<usize> {
        if !self.in_bounds(x, y) {
            return Err(ForgeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Reads the tile at (x, y), failing if out of bounds.
    pub fn get(&self, x: i32, y: i32) -> ForgeResult<TileType> {
        let idx = self.index(x, y)?;
        Ok(self.tiles[idx])
    }

    /// Reads the tile at a position, failing if out of bounds.
    pub fn get_pos(&self, pos: Position) -> ForgeResult<TileType> {
        self.get(pos.x, pos.y)
    }

    /// Writes the tile at (x, y), failing if out of bounds.
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) -> ForgeResult<()> {
        let idx = self.index(x, y)?;
        self.tiles[idx] = tile;
        Ok(())
    }

    /// Writes the tile at a position, failing if out of bounds.
    pub fn set_pos(&mut self, pos: Position, tile: TileType) -> ForgeResult<()> {
        self.set(pos.x, pos.y, tile)
    }

    /// Whether the tile at (x, y) is walkable per the classification table.
    ///
    /// Out-of-bounds coordinates are never walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(TileType::is_walkable).unwrap_or(false)
    }

    /// Whether the tile at a position is walkable.
    pub fn is_walkable_pos(&self, pos: Position) -> bool {
        self.is_walkable(pos.x, pos.y)
    }

    /// Iterates over every position in the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Iterates over every walkable position in row-major order.
    pub fn walkable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|&p| self.is_walkable_pos(p))
    }

    /// Counts tiles of the given type.
    pub fn count_tiles(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}
