use std::time::{Duration, Instant};

use crate::game::{EpisodeSummary, SnakeId};

/// Session numbers shown by the watch-mode header
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    /// Best score per snake, indexed by [`SnakeId::index`]
    pub high_scores: [u32; 2],
    pub games_played: u32,
    /// Wins per snake; the snake that did not hit the wall wins
    pub wins: [u32; 2],
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_scores: [0; 2],
            games_played: 0,
            wins: [0; 2],
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, summary: &EpisodeSummary) {
        self.games_played += 1;
        for id in SnakeId::ALL {
            let i = id.index();
            self.high_scores[i] = self.high_scores[i].max(summary.scores[i]);
        }
        if let Some(crashed) = summary.crashed {
            let winner = match crashed {
                SnakeId::First => SnakeId::Second,
                SnakeId::Second => SnakeId::First,
            };
            self.wins[winner.index()] += 1;
        }
    }

    pub fn high_score(&self, id: SnakeId) -> u32 {
        self.high_scores[id.index()]
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
