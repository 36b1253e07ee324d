//! Reinforcement learning components for the snake agent
//!
//! This module contains the DQN learning core: the environment contract and
//! its snake implementation, the 11-feature state extractor, the replay
//! memory, the Q-network and trainer, the agent that ties them together,
//! and checkpoint persistence.

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod error;
pub mod features;
pub mod memory;
pub mod network;
pub mod persistence;
pub mod trainer;

pub use agent::DqnAgent;
pub use backend::{default_device, InferenceBackend, TrainingBackend};
pub use config::AgentConfig;
pub use environment::{Environment, SnakeEnvironment, StepOutcome};
pub use error::{AgentError, MemoryError, TrainerError};
pub use features::{batch_to_tensor, observe, State, STATE_DIM};
pub use memory::{ReplayMemory, Transition};
pub use network::{greedy_action, QNetwork, QNetworkConfig, ValueModel, NUM_ACTIONS};
pub use persistence::{load_network, save_model, ModelMetadata};
pub use trainer::QTrainer;
