use rand::Rng;
use serde::{Deserialize, Serialize};

/// Direction a snake is heading in.
///
/// The variants are listed in canonical cyclic order: stepping forward through
/// [`Direction::ALL`] is a 90° clockwise turn on screen (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// All headings in canonical order; a heading's position here is its index
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Number of distinct headings
    pub const COUNT: usize = 4;

    /// Position of this heading within [`Direction::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
        }
    }

    /// `(dx, dy)` becomes `(dy, -dx)`
    pub fn turned_left(&self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }

    /// `(dx, dy)` becomes `(-dy, dx)`
    pub fn turned_right(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// Uniformly random heading
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::COUNT)]
    }
}

/// Action relative to the current heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Keep the current heading
    Straight,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnLeft, Action::TurnRight];

    /// Number of distinct actions
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnLeft => 1,
            Action::TurnRight => 2,
        }
    }

    /// Heading that results from taking this action while facing `direction`
    pub fn apply(&self, direction: Direction) -> Direction {
        match self {
            Action::Straight => direction,
            Action::TurnLeft => direction.turned_left(),
            Action::TurnRight => direction.turned_right(),
        }
    }
}
