/// Errors from the replay memory.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Sampling before any transition was stored is a caller bug: the
    /// training loop only samples after at least one completed episode.
    #[error("sampled from empty replay memory")]
    Empty,
}

/// Errors from the trainer.
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error(
        "batch field lengths differ: states={states}, actions={actions}, \
         rewards={rewards}, next_states={next_states}, dones={dones}"
    )]
    InvalidBatch {
        states: usize,
        actions: usize,
        rewards: usize,
        next_states: usize,
        dones: usize,
    },

    #[error("train_step called with an empty batch")]
    EmptyBatch,
}

/// Errors surfaced by the agent's training operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Trainer(#[from] TrainerError),
}
