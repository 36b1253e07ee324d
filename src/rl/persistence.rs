//! Model persistence for saving and loading trained agents
//!
//! Checkpoints are written as two files: the Q-network weights in Burn's
//! record format at `<path>`, and a JSON sidecar at `<path>.meta.json` with
//! the configuration and training progress needed to reconstruct the network
//! and resume or replay it.

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::{AutodiffBackend, Backend},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::agent::DqnAgent;
use super::config::AgentConfig;
use super::network::{QNetwork, QNetworkConfig};
use crate::game::GameConfig;

/// Metadata saved alongside the network weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Agent hyperparameters used during training
    pub agent_config: AgentConfig,

    /// Game configuration the agent was trained on
    pub game_config: GameConfig,

    /// Number of games completed when the checkpoint was taken
    pub games_played: u32,

    /// Best score achieved so far
    pub record: u32,

    /// Crate version that wrote the checkpoint
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        agent_config: AgentConfig,
        game_config: GameConfig,
        games_played: u32,
        record: u32,
    ) -> Self {
        Self {
            agent_config,
            game_config,
            games_played,
            record,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save an agent's network and metadata to a checkpoint.
///
/// Creates parent directories if they don't exist. Writes:
/// - `<path>` - Network weights (Burn record format)
/// - `<path>.meta.json` - Metadata as JSON
pub fn save_model<B: AutodiffBackend>(
    agent: &DqnAgent<B>,
    game_config: &GameConfig,
    record: u32,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(agent.network().clone().into_record(), path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = ModelMetadata::new(
        agent.config().clone(),
        game_config.clone(),
        agent.games_played(),
        record,
    );
    let meta_path = path.with_extension("meta.json");
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a network and its metadata from a checkpoint.
///
/// The network is rebuilt from the hidden width recorded in the metadata,
/// then the saved weights are loaded into it. Works on any backend, so the
/// same checkpoint serves both further training and inference-only replay.
pub fn load_network<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(QNetwork<B>, ModelMetadata)> {
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let network = QNetworkConfig::new(metadata.agent_config.hidden_dim).init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    Ok((network.load_record(record), metadata))
}
