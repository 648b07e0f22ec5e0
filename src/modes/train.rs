//! Headless training mode
//!
//! Runs episodes back to back without a terminal UI. Every episode end
//! persists both Q-tables through the arena's store, and a rolling summary is
//! logged every `log_frequency` episodes.
//!
//! # Example
//!
//! ```rust,ignore
//! use duel_snake::game::GameConfig;
//! use duel_snake::modes::{TrainConfig, TrainMode};
//! use duel_snake::rl::{FileStore, QLearningConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut train_mode = TrainMode::new(
//!     TrainConfig::new(10_000),
//!     GameConfig::default(),
//!     QLearningConfig::default(),
//!     FileStore::new("."),
//!     StdRng::from_entropy(),
//! );
//! train_mode.run()?;
//! ```

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::{Arena, EpisodeBudget, GameConfig, Phase};
use crate::metrics::TrainingStats;
use crate::rl::{QLearningConfig, QTableStore};

/// Configuration for training mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// End an episode after this many ticks even if nobody hit a wall
    ///
    /// A greedy policy can settle into a loop that never reaches a wall.
    pub max_ticks: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            log_frequency: 100,
            max_ticks: Some(10_000),
        }
    }
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize) -> Self {
        Self {
            num_episodes,
            ..Default::default()
        }
    }
}

/// Training mode: the arena driven by an [`EpisodeBudget`] instead of an operator
pub struct TrainMode<R: Rng, S: QTableStore> {
    arena: Arena<R, S>,

    /// Training statistics tracker
    stats: TrainingStats,

    config: TrainConfig,

    budget: EpisodeBudget,
}

impl<R: Rng, S: QTableStore> TrainMode<R, S> {
    pub fn new(
        config: TrainConfig,
        game_config: GameConfig,
        learning: QLearningConfig,
        store: S,
        rng: R,
    ) -> Self {
        let arena = Arena::new(game_config, learning, store, rng);
        let budget = EpisodeBudget::new(config.num_episodes);

        Self {
            arena,
            // 100-episode rolling window
            stats: TrainingStats::new(100),
            config,
            budget,
        }
    }

    pub fn arena(&self) -> &Arena<R, S> {
        &self.arena
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Run the training loop until the episode budget is spent
    pub fn run(&mut self) -> Result<()> {
        self.log_header();

        let mut returns = [0.0; 2];

        loop {
            match self.arena.phase() {
                Phase::Running => {
                    if self
                        .config
                        .max_ticks
                        .is_some_and(|max| self.arena.ticks() >= max)
                    {
                        self.arena
                            .end_episode()
                            .context("Failed to save q-tables at tick cap")?;
                        continue;
                    }

                    let report = self
                        .arena
                        .tick()
                        .context("Failed to save q-tables at episode end")?;
                    for step in &report.steps {
                        returns[step.id.index()] += step.reward;
                    }
                }
                Phase::Terminal(summary) => {
                    self.stats.record_episode(&summary, returns);
                    returns = [0.0; 2];

                    if summary.episode % self.config.log_frequency == 0 {
                        self.log_progress(summary.episode);
                    }

                    self.arena.consult(&mut self.budget);
                }
                Phase::Stopped => break,
            }
        }

        info!(summary = %self.stats.format_summary(), "training complete");

        Ok(())
    }

    fn log_header(&self) {
        let world = self.arena.world();
        let learning = self.arena.learning();
        info!(
            episodes = self.config.num_episodes,
            grid = %format!("{}x{}", world.width(), world.height()),
            alpha = learning.alpha,
            gamma = learning.gamma,
            epsilon = learning.epsilon,
            max_ticks = ?self.config.max_ticks,
            "starting training"
        );
    }

    fn log_progress(&self, episode: usize) {
        info!(
            "[Episode {}/{}] {}",
            episode,
            self.config.num_episodes,
            self.stats.format_summary()
        );
    }
}
