use rand::Rng;
use tracing::{debug, info, warn};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{GridWorld, Position, SnakeId},
};
use crate::error::PersistenceError;
use crate::rl::{reward, QLearningConfig, QTable, QTableStore, SnakeAgent};

/// What one snake did during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStep {
    pub id: SnakeId,
    pub action: Action,
    pub reward: f64,
    pub ate_food: bool,
}

/// Result of a tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Snakes that completed their move, in processing order
    pub steps: Vec<AgentStep>,
    /// Snake whose move left the grid, ending the episode
    pub crashed: Option<SnakeId>,
}

/// Final numbers of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSummary {
    /// 1-based episode number within this process
    pub episode: usize,
    /// `None` when the episode was ended without a wall hit
    pub crashed: Option<SnakeId>,
    /// Scores indexed by [`SnakeId::index`]
    pub scores: [u32; 2],
    pub ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Episode over, waiting for a restart or exit decision
    Terminal(EpisodeSummary),
    Stopped,
}

/// Drawable snapshot of one snake
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeView {
    pub id: SnakeId,
    /// Head first
    pub body: Vec<Position>,
    pub score: u32,
}

/// Read-only snapshot of the arena for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaView {
    pub world: GridWorld,
    pub food: Position,
    pub snakes: [SnakeView; 2],
    pub phase: Phase,
    pub episode: usize,
    pub ticks: u64,
}

/// Operator decision at the end of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Restart,
    Exit,
}

/// Supplies restart/exit decisions when an episode ends
pub trait DecisionSource {
    fn decide(&mut self, summary: &EpisodeSummary) -> Decision;
}

/// Restarts until a fixed number of episodes has been played
#[derive(Debug, Clone, Copy)]
pub struct EpisodeBudget {
    pub episodes: usize,
}

impl EpisodeBudget {
    pub fn new(episodes: usize) -> Self {
        Self { episodes }
    }
}

impl DecisionSource for EpisodeBudget {
    fn decide(&mut self, summary: &EpisodeSummary) -> Decision {
        if summary.episode >= self.episodes {
            Decision::Exit
        } else {
            Decision::Restart
        }
    }
}

/// Episode driver: owns both snakes, the food and the learning schedule.
///
/// Snakes are processed one after the other within a tick. When a move
/// leaves the grid the whole episode ends immediately, both tables are
/// persisted and the arena waits in [`Phase::Terminal`] for a [`Decision`].
pub struct Arena<R: Rng, S: QTableStore> {
    config: GameConfig,
    learning: QLearningConfig,
    world: GridWorld,
    agents: [SnakeAgent; 2],
    food: Position,
    rng: R,
    store: S,
    phase: Phase,
    episode: usize,
    ticks: u64,
}

impl<R: Rng, S: QTableStore> Arena<R, S> {
    /// Create an arena, restoring whatever tables `store` holds
    pub fn new(config: GameConfig, learning: QLearningConfig, mut store: S, mut rng: R) -> Self {
        let world = config.world();
        let [first, second] = store.load(world);

        let mut spawn = |id: SnakeId, table: Option<QTable>| {
            let table = table
                .filter(|table| {
                    let fits = table.covers(world);
                    if !fits {
                        warn!(
                            snake = %id,
                            found_width = table.width(),
                            found_height = table.height(),
                            "stored q-table does not fit the grid, starting cold"
                        );
                    }
                    fits
                })
                .unwrap_or_else(|| QTable::new(world));
            SnakeAgent::spawn(id, &config, table, &mut rng)
        };
        let agents = [spawn(SnakeId::First, first), spawn(SnakeId::Second, second)];
        let food = world.random_cell(&mut rng);

        info!(
            width = world.width(),
            height = world.height(),
            alpha = learning.alpha,
            gamma = learning.gamma,
            epsilon = learning.epsilon,
            "arena ready"
        );

        Self {
            config,
            learning,
            world,
            agents,
            food,
            rng,
            store,
            phase: Phase::Running,
            episode: 1,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn learning(&self) -> &QLearningConfig {
        &self.learning
    }

    pub fn world(&self) -> GridWorld {
        self.world
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn agents(&self) -> &[SnakeAgent; 2] {
        &self.agents
    }

    pub fn agent(&self, id: SnakeId) -> &SnakeAgent {
        &self.agents[id.index()]
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.agents[0].score(), self.agents[1].score()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Ticks played in the current episode
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> ArenaView {
        ArenaView {
            world: self.world,
            food: self.food,
            snakes: self.agents.each_ref().map(|agent| SnakeView {
                id: agent.id(),
                body: agent.body().copied().collect(),
                score: agent.score(),
            }),
            phase: self.phase,
            episode: self.episode,
            ticks: self.ticks,
        }
    }

    /// Advance the simulation by one tick. Does nothing unless running.
    ///
    /// A save failure at the end of the episode is returned after the arena
    /// has already moved to [`Phase::Terminal`].
    pub fn tick(&mut self) -> Result<TickReport, PersistenceError> {
        let mut report = TickReport::default();
        if !self.is_running() {
            return Ok(report);
        }
        self.ticks += 1;

        let QLearningConfig {
            alpha,
            gamma,
            epsilon,
        } = self.learning;

        for agent in self.agents.iter_mut() {
            let id = agent.id();
            let state = agent.get_state();
            let action = agent.choose_action(epsilon, &mut self.rng);
            agent.apply_action(action);

            if !agent.advance() {
                info!(
                    snake = %id,
                    score = agent.score(),
                    tick = self.ticks,
                    "hit a wall, game over"
                );
                report.crashed = Some(id);
                break;
            }

            let head = agent.head();
            let ate_food = head == self.food;
            if ate_food {
                agent.grow();
                self.food = self.world.random_cell(&mut self.rng);
                info!(snake = %id, score = agent.score(), "ate food");
            }

            let next_state = agent.get_state();
            // Scored against the food as it stands after any respawn
            let reward = reward(head, self.food, &self.world);
            agent.update_q_table(state, action, reward, next_state, alpha, gamma);

            report.steps.push(AgentStep {
                id,
                action,
                reward,
                ate_food,
            });
        }

        debug!(tick = self.ticks, ?report, "tick");

        if let Some(id) = report.crashed {
            self.finish_episode(Some(id))?;
        }
        Ok(report)
    }

    /// End a running episode without a wall hit, persisting tables as usual
    pub fn end_episode(&mut self) -> Result<(), PersistenceError> {
        if self.is_running() {
            self.finish_episode(None)?;
        }
        Ok(())
    }

    fn finish_episode(&mut self, crashed: Option<SnakeId>) -> Result<(), PersistenceError> {
        let summary = EpisodeSummary {
            episode: self.episode,
            crashed,
            scores: self.scores(),
            ticks: self.ticks,
        };
        self.phase = Phase::Terminal(summary);
        info!(
            episode = summary.episode,
            ticks = summary.ticks,
            first = summary.scores[0],
            second = summary.scores[1],
            "episode finished"
        );
        self.persist()
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let [first, second] = &self.agents;
        self.store.save([first.q_table(), second.q_table()])
    }

    /// Apply an operator decision. Returns `false` outside [`Phase::Terminal`].
    pub fn resolve(&mut self, decision: Decision) -> bool {
        if !matches!(self.phase, Phase::Terminal(_)) {
            return false;
        }
        match decision {
            Decision::Restart => self.restart(),
            Decision::Exit => {
                info!("exiting");
                self.phase = Phase::Stopped;
            }
        }
        true
    }

    /// Ask `source` for a decision if the episode is over
    pub fn consult<D: DecisionSource + ?Sized>(&mut self, source: &mut D) -> Option<Decision> {
        let Phase::Terminal(summary) = self.phase else {
            return None;
        };
        let decision = source.decide(&summary);
        self.resolve(decision);
        Some(decision)
    }

    /// Stop from any phase. A running episode has its tables saved first.
    pub fn shutdown(&mut self) -> Result<(), PersistenceError> {
        let was_running = self.is_running();
        self.phase = Phase::Stopped;
        if was_running {
            info!(
                first = self.agents[0].score(),
                second = self.agents[1].score(),
                "final scores"
            );
            self.persist()?;
        }
        Ok(())
    }

    fn restart(&mut self) {
        for agent in self.agents.iter_mut() {
            let head = self.config.spawn_position(agent.id());
            agent.respawn(head, Direction::random(&mut self.rng));
        }
        self.food = self.world.random_cell(&mut self.rng);
        self.episode += 1;
        self.ticks = 0;
        self.phase = Phase::Running;
        info!(episode = self.episode, "restarting");
    }
}
