//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters of the tabular Q-learning rule, fixed for a whole run.
///
/// # Example
///
/// ```rust
/// use duel_snake::rl::QLearningConfig;
///
/// let config = QLearningConfig {
///     epsilon: 0.05,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate: weight of new experience against the old estimate
    ///
    /// Default: 0.1
    pub alpha: f64,

    /// Discount factor for the best next-state value
    ///
    /// Default: 0.9
    pub gamma: f64,

    /// Probability of picking a uniformly random action
    ///
    /// Default: 0.1
    pub epsilon: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
        }
    }
}

impl QLearningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(format!("alpha must be in (0, 1], got {}", self.alpha));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }

        Ok(())
    }
}
