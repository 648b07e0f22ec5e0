//! Dense tabular action-value store
//!
//! The table covers every `(x, y, heading, action)` combination of a grid, so
//! lookups never miss. Values live in one flat `Vec<f64>` laid out row-major
//! over `[width][height][heading][action]`.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::game::{Action, Direction, GridWorld, Position};

/// Situational key of the table: where the head is and which way it points.
///
/// Food location and body occupancy are deliberately not part of the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub head: Position,
    pub direction: Direction,
}

impl State {
    pub fn new(head: Position, direction: Direction) -> Self {
        Self { head, direction }
    }

    /// `(head x, head y, heading index)`
    pub fn as_tuple(&self) -> (i32, i32, usize) {
        (self.head.x, self.head.y, self.direction.index())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl QTable {
    /// Zero-initialized table covering `world`
    pub fn new(world: GridWorld) -> Self {
        let width = world.width();
        let height = world.height();
        Self {
            width,
            height,
            values: vec![0.0; Self::table_len(width, height)],
        }
    }

    /// Rebuild a table from its flat value layout
    pub fn from_values(
        width: usize,
        height: usize,
        values: Vec<f64>,
    ) -> Result<Self, PersistenceError> {
        let expected = Self::table_len(width, height);
        if values.len() != expected {
            return Err(PersistenceError::Length {
                expected,
                found: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    fn table_len(width: usize, height: usize) -> usize {
        width * height * Direction::COUNT * Action::COUNT
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn covers(&self, world: GridWorld) -> bool {
        self.width == world.width() && self.height == world.height()
    }

    /// Offset of the first action slot for `state`
    fn state_offset(&self, state: State) -> usize {
        debug_assert!(
            state.head.x >= 0
                && (state.head.x as usize) < self.width
                && state.head.y >= 0
                && (state.head.y as usize) < self.height,
            "state {:?} outside {}x{} table",
            state,
            self.width,
            self.height
        );
        let (x, y, heading) = state.as_tuple();
        ((x as usize * self.height + y as usize) * Direction::COUNT + heading) * Action::COUNT
    }

    /// Q-values of every action in `state`, indexed by [`Action::index`]
    pub fn action_values(&self, state: State) -> &[f64] {
        let start = self.state_offset(state);
        &self.values[start..start + Action::COUNT]
    }

    pub fn get(&self, state: State, action: Action) -> f64 {
        self.values[self.state_offset(state) + action.index()]
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        let offset = self.state_offset(state) + action.index();
        self.values[offset] = value;
    }

    pub fn max_value(&self, state: State) -> f64 {
        self.action_values(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action; ties go to the lowest action index
    pub fn best_action(&self, state: State) -> Action {
        let values = self.action_values(state);
        let mut best = 0;
        for (idx, value) in values.iter().enumerate().skip(1) {
            if *value > values[best] {
                best = idx;
            }
        }
        Action::ALL[best]
    }

    /// One-step Q-learning backup. Returns the stored value.
    pub fn update(
        &mut self,
        state: State,
        action: Action,
        reward: f64,
        next_state: State,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let old_value = self.get(state, action);
        let next_max = self.max_value(next_state);
        let new_value = (1.0 - alpha) * old_value + alpha * (reward + gamma * next_max);
        self.set(state, action, new_value);
        new_value
    }
}
