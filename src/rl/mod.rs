//! Tabular Q-learning for the competing snakes
//!
//! Provides:
//! - Dense Q-table keyed by head position, heading and action
//! - The learning agent (state extraction, epsilon-greedy choice, TD update)
//! - The shaped reward function
//! - Q-table persistence behind a small gateway trait

pub mod agent;
pub mod config;
pub mod persistence;
pub mod q_table;
pub mod reward;

pub use agent::SnakeAgent;
pub use config::QLearningConfig;
pub use persistence::{FileStore, MemoryStore, QTableRecord, QTableStore};
pub use q_table::{QTable, State};
pub use reward::{reward, BOUNDARY_PENALTY, FOOD_REWARD};
