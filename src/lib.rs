//! Duel Snake - two snakes learning to chase food with tabular Q-learning
//!
//! This library provides:
//! - Grid geometry and the episode driver (game module)
//! - Q-tables, the learning agent, rewards and table persistence (rl module)
//! - TUI rendering and key handling (render, input modules)
//! - Interactive and headless execution modes (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
