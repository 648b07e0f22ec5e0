use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Fixed-size rectangular grid shared by both snakes and the food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWorld {
    width: usize,
    height: usize,
}

impl GridWorld {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// True for cells on the outermost ring of the grid
    pub fn on_boundary(&self, pos: Position) -> bool {
        pos.x == 0
            || pos.x == self.width as i32 - 1
            || pos.y == 0
            || pos.y == self.height as i32 - 1
    }

    /// Uniformly sampled in-bounds cell. Occupied cells are not excluded.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = rng.gen_range(0..self.width) as i32;
        let y = rng.gen_range(0..self.height) as i32;
        Position::new(x, y)
    }
}

/// Identity of one of the two competing snakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnakeId {
    First,
    Second,
}

impl SnakeId {
    pub const ALL: [SnakeId; 2] = [SnakeId::First, SnakeId::Second];

    pub fn index(&self) -> usize {
        match self {
            SnakeId::First => 0,
            SnakeId::Second => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SnakeId::First => "Snake 1",
            SnakeId::Second => "Snake 2",
        }
    }
}

impl std::fmt::Display for SnakeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
