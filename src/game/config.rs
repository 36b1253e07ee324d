use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Reward for an ordinary step (0 by default; negative to punish stalling)
    pub step_reward: f32,
    /// Penalty for dying or starving out
    pub death_penalty: f32,

    /// Episode is cut off (as a death) after this many steps per snake
    /// segment without eating, so a circling agent cannot stall forever
    pub hunger_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            food_reward: 10.0,
            step_reward: 0.0,
            death_penalty: -10.0,
            hunger_limit: 100,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Maximum steps the snake may go without food before the episode ends.
    pub fn hunger_budget(&self, snake_len: usize) -> u32 {
        self.hunger_limit * snake_len as u32
    }
}
