//! DQN agent: policy, replay memory and trainer wired together
//!
//! The agent owns the three learning components and exposes the operations
//! the training loop needs: epsilon-greedy action selection, storing
//! transitions, an immediate single-transition update after every step, and
//! a sampled batch update at episode boundaries.

use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::AgentConfig;
use super::error::{AgentError, TrainerError};
use super::features::State;
use super::memory::{ReplayMemory, Transition};
use super::network::{greedy_action, QNetwork, QNetworkConfig, NUM_ACTIONS};
use super::trainer::QTrainer;
use crate::game::TurnAction;

/// DQN agent for the snake environment.
///
/// Exploration is a linear epsilon schedule over completed games: with
/// `epsilon = epsilon_start - games_played` and a uniform draw from
/// `[0, exploration_scale)`, the agent explores while `draw < epsilon`.
/// Once `games_played >= epsilon_start` the schedule bottoms out and every
/// action is greedy.
///
/// # Type Parameters
///
/// * `B` - Autodiff backend for gradient computation
pub struct DqnAgent<B: AutodiffBackend> {
    trainer: QTrainer<B>,
    memory: ReplayMemory,
    config: AgentConfig,
    games_played: u32,
    rng: StdRng,
    device: B::Device,
}

impl<B: AutodiffBackend> DqnAgent<B> {
    /// Create an agent with a freshly initialized Q-network.
    ///
    /// The configuration must already be validated.
    pub fn new(config: AgentConfig, device: B::Device) -> Self {
        let network = QNetworkConfig::new(config.hidden_dim).init::<B>(&device);
        Self::with_network(network, config, device)
    }

    /// Create an agent around an existing network, e.g. one loaded from a
    /// checkpoint.
    pub fn with_network(network: QNetwork<B>, config: AgentConfig, device: B::Device) -> Self {
        let trainer = QTrainer::new(
            network,
            config.learning_rate,
            config.gamma,
            device.clone(),
        );
        Self {
            trainer,
            memory: ReplayMemory::new(config.memory_capacity),
            config,
            games_played: 0,
            rng: StdRng::from_entropy(),
            device,
        }
    }

    /// Deterministic exploration draws for tests.
    #[cfg(test)]
    pub fn with_seed(config: AgentConfig, device: B::Device, seed: u64) -> Self {
        let mut agent = Self::new(config, device);
        agent.rng = StdRng::seed_from_u64(seed);
        agent
    }

    /// Current exploration threshold. Decreases by one per completed game
    /// and may go negative, at which point exploration is impossible.
    pub fn epsilon(&self) -> i64 {
        self.config.epsilon_start as i64 - self.games_played as i64
    }

    /// Pick an action for the given state.
    ///
    /// Draws uniformly from `[0, exploration_scale)`; below the current
    /// epsilon the action is uniform over the three turns, otherwise it is
    /// the argmax of the network's Q-values (inference only, no gradients).
    pub fn get_action(&mut self, state: &State) -> TurnAction {
        let draw = self.rng.gen_range(0..self.config.exploration_scale) as i64;
        if draw < self.epsilon() {
            let index = self.rng.gen_range(0..NUM_ACTIONS);
            return TurnAction::from_index(index);
        }
        self.greedy_action(state)
    }

    /// The action with the highest predicted Q-value (inference only,
    /// no gradients).
    pub fn greedy_action(&self, state: &State) -> TurnAction {
        greedy_action(&self.trainer.network().valid(), state, &self.device)
    }

    /// Store one transition in the replay memory.
    pub fn remember(
        &mut self,
        state: State,
        action: TurnAction,
        reward: f32,
        next_state: State,
        done: bool,
    ) {
        self.memory.push(Transition {
            state,
            action,
            reward,
            next_state,
            done,
        });
    }

    /// One TD update on the single transition just taken.
    pub fn train_short_memory(
        &mut self,
        state: State,
        action: TurnAction,
        reward: f32,
        next_state: State,
        done: bool,
    ) -> Result<f32, TrainerError> {
        self.trainer
            .train_step(&[state], &[action], &[reward], &[next_state], &[done])
    }

    /// One TD update on a batch sampled from the replay memory.
    ///
    /// Uses up to `batch_size` transitions; with fewer stored, the whole
    /// memory forms the batch.
    pub fn train_long_memory(&mut self) -> Result<f32, AgentError> {
        let batch = self.memory.sample(self.config.batch_size)?;
        let loss = self.trainer.train_transitions(&batch)?;
        Ok(loss)
    }

    /// Mark the current game finished, advancing the epsilon schedule.
    pub fn finish_game(&mut self) {
        self.games_played += 1;
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn network(&self) -> &QNetwork<B> {
        self.trainer.network()
    }

    /// Replace the network weights, e.g. after loading a checkpoint.
    pub fn set_network(&mut self, network: QNetwork<B>) {
        self.trainer.set_network(network);
    }

    #[cfg(test)]
    pub fn set_games_played(&mut self, games: u32) {
        self.games_played = games;
    }
}
