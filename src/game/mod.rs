//! Core game logic for the two-snake arena
//!
//! This module contains the grid geometry and the episode driver without any
//! I/O or rendering dependencies, so it can run headless for training or
//! behind the terminal UI.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{
    AgentStep, Arena, ArenaView, Decision, DecisionSource, EpisodeBudget, EpisodeSummary, Phase,
    SnakeView, TickReport,
};
pub use state::{GridWorld, Position, SnakeId};
