//! DQN agent hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the DQN agent.
///
/// All hyperparameters of the learning loop live here and are passed into the
/// agent and trainer at construction; nothing reads ambient globals. Defaults
/// match the classic snake Q-learning setup.
///
/// # Example
///
/// ```rust
/// use snake_dqn::rl::AgentConfig;
///
/// let config = AgentConfig {
///     gamma: 0.95,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 1e-3
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Starting value of the exploration schedule. Epsilon for a decision is
    /// `max(0, epsilon_start - games_played)`, so the agent stops exploring
    /// via the random branch after `epsilon_start` completed episodes.
    ///
    /// Default: 80
    pub epsilon_start: u32,

    /// Upper bound (exclusive) of the uniform integer draw compared against
    /// epsilon. With the defaults, the very first episode explores with
    /// probability 80/200.
    ///
    /// Default: 200
    pub exploration_scale: u32,

    /// Replay memory capacity; the oldest transition is evicted when full
    ///
    /// Default: 100_000
    pub memory_capacity: usize,

    /// Number of transitions sampled for each long-memory update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Hidden layer width of the Q-network
    ///
    /// Default: 256
    pub hidden_dim: usize,
}

impl AgentConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error
    /// message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if self.exploration_scale == 0 {
            return Err("exploration_scale must be at least 1".to_string());
        }

        if self.epsilon_start > self.exploration_scale {
            return Err(format!(
                "epsilon_start ({}) cannot exceed exploration_scale ({})",
                self.epsilon_start, self.exploration_scale
            ));
        }

        if self.memory_capacity == 0 {
            return Err("memory_capacity must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.hidden_dim == 0 {
            return Err("hidden_dim must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.9,
            epsilon_start: 80,
            exploration_scale: 200,
            memory_capacity: 100_000,
            batch_size: 1000,
            hidden_dim: 256,
        }
    }
}
