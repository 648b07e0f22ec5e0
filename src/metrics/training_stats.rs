//! Training statistics tracking
//!
//! Rolling-window averages of episode length, per-snake return and per-snake
//! score, plus lifetime totals of episodes, ticks and wall hits.

use std::collections::VecDeque;

use crate::game::{EpisodeSummary, SnakeId};

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use duel_snake::game::{EpisodeSummary, SnakeId};
/// use duel_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// let summary = EpisodeSummary {
///     episode: 1,
///     crashed: Some(SnakeId::Second),
///     scores: [2, 0],
///     ticks: 150,
/// };
/// stats.record_episode(&summary, [12.5, -3.0]);
///
/// assert_eq!(stats.total_episodes(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode lengths in ticks (rolling window)
    episode_lengths: VecDeque<u64>,

    /// Accumulated reward per snake per episode (rolling window)
    episode_returns: [VecDeque<f64>; 2],

    /// Food eaten per snake per episode (rolling window)
    episode_scores: [VecDeque<u32>; 2],

    /// Lifetime wall hits per snake
    crashes: [usize; 2],

    /// Best single-episode score per snake
    best_scores: [u32; 2],

    total_episodes: usize,

    total_ticks: u64,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new training statistics tracker
    ///
    /// # Arguments
    ///
    /// * `window_size` - Number of recent episodes to keep for rolling averages
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_returns: [
                VecDeque::with_capacity(window_size),
                VecDeque::with_capacity(window_size),
            ],
            episode_scores: [
                VecDeque::with_capacity(window_size),
                VecDeque::with_capacity(window_size),
            ],
            crashes: [0; 2],
            best_scores: [0; 2],
            total_episodes: 0,
            total_ticks: 0,
            window_size,
        }
    }

    /// Record the end of an episode
    ///
    /// # Arguments
    ///
    /// * `summary` - Final numbers reported by the arena
    /// * `returns` - Reward each snake accumulated during the episode
    pub fn record_episode(&mut self, summary: &EpisodeSummary, returns: [f64; 2]) {
        let window = self.window_size;
        Self::push_deque(&mut self.episode_lengths, summary.ticks, window);
        for id in SnakeId::ALL {
            let i = id.index();
            Self::push_deque(&mut self.episode_returns[i], returns[i], window);
            Self::push_deque(&mut self.episode_scores[i], summary.scores[i], window);
            self.best_scores[i] = self.best_scores[i].max(summary.scores[i]);
        }
        if let Some(id) = summary.crashed {
            self.crashes[id.index()] += 1;
        }
        self.total_episodes += 1;
        self.total_ticks += summary.ticks;
    }

    /// Mean episode length in ticks over the rolling window
    pub fn mean_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<u64>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Mean accumulated reward of one snake over the rolling window
    pub fn mean_return(&self, id: SnakeId) -> f64 {
        let deque = &self.episode_returns[id.index()];
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f64>() / deque.len() as f64
        }
    }

    /// Mean food eaten by one snake over the rolling window
    pub fn mean_score(&self, id: SnakeId) -> f64 {
        let deque = &self.episode_scores[id.index()];
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<u32>() as f64 / deque.len() as f64
        }
    }

    pub fn best_score(&self, id: SnakeId) -> u32 {
        self.best_scores[id.index()]
    }

    /// Lifetime number of episodes this snake ended by hitting a wall
    pub fn crashes(&self, id: SnakeId) -> usize {
        self.crashes[id.index()]
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Ticks: {} | Len: {:.1} | S1 score: {:.2} (best {}) return: {:.2} | S2 score: {:.2} (best {}) return: {:.2} | Crashes: {}/{}",
            self.total_episodes,
            self.total_ticks,
            self.mean_episode_length(),
            self.mean_score(SnakeId::First),
            self.best_score(SnakeId::First),
            self.mean_return(SnakeId::First),
            self.mean_score(SnakeId::Second),
            self.best_score(SnakeId::Second),
            self.mean_return(SnakeId::Second),
            self.crashes(SnakeId::First),
            self.crashes(SnakeId::Second),
        )
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
