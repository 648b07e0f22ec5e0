//! A learning snake
//!
//! Each [`SnakeAgent`] owns its body, heading, score and Q-table. The episode
//! driver talks to it through a small protocol: read the state, pick an
//! action, turn, advance, maybe grow, then learn from the transition.

use rand::Rng;
use std::collections::VecDeque;

use super::q_table::{QTable, State};
use crate::game::{Action, Direction, GameConfig, GridWorld, Position, SnakeId};

#[derive(Debug, Clone)]
pub struct SnakeAgent {
    id: SnakeId,
    world: GridWorld,
    /// Body segments, head at the front
    body: VecDeque<Position>,
    direction: Direction,
    score: u32,
    q_table: QTable,
}

impl SnakeAgent {
    /// Create a one-cell snake at `head`.
    ///
    /// # Panics
    ///
    /// If `q_table` does not cover `world`.
    pub fn new(
        id: SnakeId,
        world: GridWorld,
        head: Position,
        direction: Direction,
        q_table: QTable,
    ) -> Self {
        assert!(
            q_table.covers(world),
            "q-table is {}x{}, world is {}x{}",
            q_table.width(),
            q_table.height(),
            world.width(),
            world.height()
        );
        Self {
            id,
            world,
            body: VecDeque::from([head]),
            direction,
            score: 0,
            q_table,
        }
    }

    /// Spawn at the configured start cell with a random heading
    pub fn spawn<R: Rng + ?Sized>(
        id: SnakeId,
        config: &GameConfig,
        q_table: QTable,
        rng: &mut R,
    ) -> Self {
        Self::new(
            id,
            config.world(),
            config.spawn_position(id),
            Direction::random(rng),
            q_table,
        )
    }

    /// Reset body, heading and score for a new episode; the table is kept
    pub fn respawn(&mut self, head: Position, direction: Direction) {
        self.body.clear();
        self.body.push_back(head);
        self.direction = direction;
        self.score = 0;
    }

    pub fn id(&self) -> SnakeId {
        self.id
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Number of body cells, head included
    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn get_state(&self) -> State {
        State::new(self.head(), self.direction)
    }

    /// Epsilon-greedy choice over the current state's Q-values
    pub fn choose_action<R: Rng + ?Sized>(&self, epsilon: f64, rng: &mut R) -> Action {
        if rng.gen::<f64>() < epsilon {
            Action::ALL[rng.gen_range(0..Action::COUNT)]
        } else {
            self.q_table.best_action(self.get_state())
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        self.direction = action.apply(self.direction);
    }

    /// Step the head one cell along the heading.
    ///
    /// Returns `false` and leaves the snake untouched when the step would
    /// leave the grid.
    pub fn advance(&mut self) -> bool {
        let new_head = self.head().moved_in_direction(self.direction);
        if !self.world.in_bounds(new_head) {
            return false;
        }

        self.body.push_front(new_head);
        if self.body.len() > self.score as usize + 1 {
            self.body.pop_back();
        }
        true
    }

    /// Raise the length allowance by one; the next advance keeps its tail
    pub fn grow(&mut self) {
        self.score += 1;
    }

    pub fn update_q_table(
        &mut self,
        state: State,
        action: Action,
        reward: f64,
        next_state: State,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        self.q_table
            .update(state, action, reward, next_state, alpha, gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn agent_at(x: i32, y: i32, direction: Direction, world: GridWorld) -> SnakeAgent {
        SnakeAgent::new(
            SnakeId::First,
            world,
            Position::new(x, y),
            direction,
            QTable::new(world),
        )
    }

    #[test]
    fn test_spawn() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let agent = SnakeAgent::spawn(
            SnakeId::Second,
            &config,
            QTable::new(config.world()),
            &mut rng,
        );
        assert_eq!(agent.head(), Position::new(60, 40));
        assert_eq!(agent.length(), 1);
        assert_eq!(agent.score(), 0);
    }

    #[test]
    fn test_get_state() {
        let agent = agent_at(3, 4, Direction::Left, GridWorld::new(10, 10));
        assert_eq!(agent.get_state().as_tuple(), (3, 4, 2));
    }

    #[test]
    fn test_advance_without_growth_keeps_length() {
        let mut agent = agent_at(5, 5, Direction::Right, GridWorld::new(10, 10));
        assert!(agent.advance());
        assert_eq!(agent.head(), Position::new(6, 5));
        assert_eq!(agent.length(), 1);
    }

    #[test]
    fn test_grow_extends_on_next_advance() {
        let mut agent = agent_at(5, 5, Direction::Down, GridWorld::new(10, 10));
        agent.grow();
        assert_eq!(agent.length(), 1);

        assert!(agent.advance());
        assert_eq!(agent.length(), 2);
        let body: Vec<_> = agent.body().copied().collect();
        assert_eq!(body, vec![Position::new(5, 6), Position::new(5, 5)]);

        assert!(agent.advance());
        assert_eq!(agent.length(), 2);
    }

    #[test]
    fn test_advance_out_of_bounds_is_rejected() {
        let mut agent = agent_at(0, 3, Direction::Left, GridWorld::new(10, 10));
        let before: Vec<_> = agent.body().copied().collect();

        assert!(!agent.advance());
        assert_eq!(agent.body().copied().collect::<Vec<_>>(), before);
        assert_eq!(agent.direction(), Direction::Left);
    }

    #[test]
    fn test_apply_action_turns() {
        let mut agent = agent_at(5, 5, Direction::Right, GridWorld::new(10, 10));
        agent.apply_action(Action::TurnLeft);
        assert_eq!(agent.direction(), Direction::Up);
        agent.apply_action(Action::TurnRight);
        assert_eq!(agent.direction(), Direction::Right);
        agent.apply_action(Action::TurnRight);
        assert_eq!(agent.direction(), Direction::Down);
    }

    #[test]
    fn test_greedy_choice_without_exploration() {
        let world = GridWorld::new(10, 10);
        let mut agent = agent_at(5, 5, Direction::Up, world);
        let state = agent.get_state();
        let next = State::new(Position::new(5, 4), Direction::Up);
        // Two positive updates on TurnRight make it the unique best action
        agent.update_q_table(state, Action::TurnRight, 1.0, next, 0.5, 0.9);
        agent.update_q_table(state, Action::TurnRight, 1.0, next, 0.5, 0.9);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(agent.choose_action(0.0, &mut rng), Action::TurnRight);
        }
    }

    #[test]
    fn test_full_exploration_hits_every_action() {
        let agent = agent_at(5, 5, Direction::Up, GridWorld::new(10, 10));
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; Action::COUNT];
        for _ in 0..300 {
            seen[agent.choose_action(1.0, &mut rng).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_respawn_keeps_table() {
        let world = GridWorld::new(10, 10);
        let mut agent = agent_at(5, 5, Direction::Up, world);
        let state = agent.get_state();
        agent.update_q_table(state, Action::Straight, 10.0, state, 0.1, 0.9);
        agent.grow();
        agent.advance();

        agent.respawn(Position::new(2, 5), Direction::Down);
        assert_eq!(agent.length(), 1);
        assert_eq!(agent.score(), 0);
        assert_eq!(agent.head(), Position::new(2, 5));
        assert_eq!(agent.q_table().get(state, Action::Straight), 1.0);
    }
}
