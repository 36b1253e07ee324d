//! Training mode for the DQN agent
//!
//! Runs the classic DQN loop: observe, act epsilon-greedily, train on the
//! single transition just taken, remember it, and at every game-over train
//! on a replay batch and advance the epsilon schedule. A new record score
//! triggers a checkpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use snake_dqn::modes::{TrainMode, TrainConfig};
//! use snake_dqn::rl::{default_device, TrainingBackend};
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(500, PathBuf::from("models/snake.mpk"));
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
//! train_mode.run()?;
//! ```

use anyhow::{anyhow, Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::PathBuf;

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{observe, save_model, AgentConfig, DqnAgent, Environment, SnakeEnvironment};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of games to train; 0 trains until interrupted
    pub num_games: usize,

    /// Path to save the record-holding model
    pub save_path: PathBuf,

    /// Log training progress every N games
    pub log_frequency: usize,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// Agent hyperparameters
    pub agent_config: AgentConfig,
}

impl TrainConfig {
    /// Create a training configuration with defaults.
    ///
    /// ```rust
    /// use snake_dqn::modes::TrainConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = TrainConfig::new(500, PathBuf::from("models/snake.mpk"));
    /// assert_eq!(config.num_games, 500);
    /// ```
    pub fn new(num_games: usize, save_path: PathBuf) -> Self {
        Self {
            num_games,
            save_path,
            log_frequency: 10,
            game_config: GameConfig::default(),
            agent_config: AgentConfig::default(),
        }
    }
}

/// Everything known about a game the moment it ends.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeSummary {
    /// Ordinal of the finished game (1-based)
    pub game: u32,
    /// Final score of the finished game
    pub score: u32,
    /// Steps the game lasted
    pub steps: usize,
    /// Best score across all games so far
    pub record: u32,
    /// Whether this game strictly beat the previous record
    pub new_record: bool,
    /// Loss of the episode-boundary replay batch update
    pub batch_loss: f32,
}

/// Training mode driver.
///
/// Advances one environment tick per [`TrainMode::step`] call; the step
/// returns a summary exactly when a game ends, so callers (the headless
/// loop here, or a TUI) can react to episode boundaries without polling
/// internal state.
pub struct TrainMode<B: AutodiffBackend> {
    agent: DqnAgent<B>,
    env: SnakeEnvironment,
    stats: TrainingStats,
    config: TrainConfig,
    episode_steps: usize,
}

impl<B: AutodiffBackend> TrainMode<B> {
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        config
            .agent_config
            .validate()
            .map_err(|e| anyhow!("invalid agent configuration: {e}"))?;

        let agent = DqnAgent::new(config.agent_config.clone(), device);
        let env = SnakeEnvironment::new(config.game_config.clone());
        let stats = TrainingStats::new(100);

        Ok(Self {
            agent,
            env,
            stats,
            config,
            episode_steps: 0,
        })
    }

    /// Run the training loop to completion.
    ///
    /// With `num_games` 0 the loop only ends on an external interrupt.
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        while self.config.num_games == 0 || self.stats.games_played() < self.config.num_games {
            if let Some(summary) = self.step()? {
                if summary.new_record {
                    self.save_record_model(summary.record)?;
                }
                if summary.game as usize % self.config.log_frequency == 0 {
                    println!("{}", self.stats.format_summary());
                }
            }
        }

        println!("\nTraining complete!");
        println!("Record model saved to: {:?}", self.config.save_path);
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Advance the loop by one environment tick.
    ///
    /// Returns `Some(summary)` when this tick ended a game, `None` otherwise.
    /// On game over the environment has already been reset for the next game
    /// and the replay batch update has run.
    pub fn step(&mut self) -> Result<Option<EpisodeSummary>> {
        let state = observe(&self.env);
        let action = self.agent.get_action(&state);
        let outcome = self.env.play_step(action);
        let next_state = observe(&self.env);

        let step_loss = self
            .agent
            .train_short_memory(state, action, outcome.reward, next_state, outcome.done)
            .context("single-step update failed")?;
        self.stats.record_step_loss(step_loss);

        self.agent
            .remember(state, action, outcome.reward, next_state, outcome.done);
        self.episode_steps += 1;

        if !outcome.done {
            return Ok(None);
        }

        // Game over: reset, advance the epsilon schedule, replay a batch
        self.env.reset();
        self.agent.finish_game();
        let batch_loss = self
            .agent
            .train_long_memory()
            .context("replay batch update failed")?;

        let steps = self.episode_steps;
        self.episode_steps = 0;
        let new_record = self.stats.record_game(outcome.score, steps, batch_loss);

        Ok(Some(EpisodeSummary {
            game: self.agent.games_played(),
            score: outcome.score,
            steps,
            record: self.stats.record(),
            new_record,
            batch_loss,
        }))
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn env(&self) -> &SnakeEnvironment {
        &self.env
    }

    pub fn agent(&self) -> &DqnAgent<B> {
        &self.agent
    }

    fn save_record_model(&self, record: u32) -> Result<()> {
        save_model(
            &self.agent,
            &self.config.game_config,
            record,
            &self.config.save_path,
        )
        .with_context(|| format!("Failed to save model to {:?}", self.config.save_path))
    }

    fn print_header(&self) {
        println!("{}", "=".repeat(70));
        println!("DQN Training - Snake");
        println!("{}", "=".repeat(70));
        println!("Games: {}", self.config.num_games);
        println!(
            "Game config: {}x{} grid",
            self.config.game_config.grid_width, self.config.game_config.grid_height
        );
        println!("Agent config:");
        println!("  Learning rate: {}", self.config.agent_config.learning_rate);
        println!("  Gamma: {}", self.config.agent_config.gamma);
        println!(
            "  Exploration: epsilon {} / scale {}",
            self.config.agent_config.epsilon_start, self.config.agent_config.exploration_scale
        );
        println!("  Memory capacity: {}", self.config.agent_config.memory_capacity);
        println!("  Batch size: {}", self.config.agent_config.batch_size);
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{default_device, TrainingBackend};
    use tempfile::TempDir;

    fn small_train_config(save_path: PathBuf) -> TrainConfig {
        let mut config = TrainConfig::new(1, save_path);
        config.game_config = GameConfig::small();
        config.agent_config.hidden_dim = 16;
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(500, PathBuf::from("test.mpk"));
        assert_eq!(config.num_games, 500);
        assert_eq!(config.save_path, PathBuf::from("test.mpk"));
    }

    #[test]
    fn test_invalid_agent_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = small_train_config(temp_dir.path().join("model.mpk"));
        config.agent_config.batch_size = 0;

        let result = TrainMode::<TrainingBackend>::new(config, default_device());
        assert!(result.is_err());
    }

    #[test]
    fn test_step_returns_summary_only_at_game_over() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_train_config(temp_dir.path().join("model.mpk"));
        let mut mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        // The hunger cutoff bounds every game, so a summary must arrive
        // within a generous number of ticks.
        let mut summary = None;
        for _ in 0..100_000 {
            if let Some(s) = mode.step().unwrap() {
                summary = Some(s);
                break;
            }
        }

        let summary = summary.expect("a game must terminate");
        assert_eq!(summary.game, 1);
        assert!(summary.steps > 0);
        assert_eq!(mode.agent().games_played(), 1);
        // Environment is ready for the next game
        assert!(mode.env().state().is_alive);
        assert_eq!(mode.env().state().steps, 0);
    }

    #[test]
    fn test_first_finished_game_sets_record() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_train_config(temp_dir.path().join("model.mpk"));
        let mut mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        let summary = loop {
            if let Some(s) = mode.step().unwrap() {
                break s;
            }
        };

        // Score 0 ties the initial record and must not claim a new one
        assert_eq!(summary.new_record, summary.score > 0);
        assert_eq!(summary.record, summary.score);
    }
}
