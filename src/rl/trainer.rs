//! Q-learning trainer
//!
//! Performs one temporal-difference update per call. The TD target for the
//! taken action is the immediate reward when the transition is terminal,
//! otherwise `reward + gamma * max(Q(next_state))`; every other entry of the
//! target tensor equals the current prediction, so only the taken action's
//! error contributes to the MSE loss.

use burn::{
    module::AutodiffModule,
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, ElementConversion, Tensor, TensorData},
};

use super::error::TrainerError;
use super::features::{batch_to_tensor, State};
use super::memory::Transition;
use super::network::{QNetwork, ValueModel, NUM_ACTIONS};
use crate::game::TurnAction;

/// Trainer owning the Q-network and its optimizer.
///
/// Model parameters are owned here and mutated only by [`QTrainer::train_step`];
/// one call performs exactly one Adam step. The discount factor and learning
/// rate are threaded in from the agent configuration at construction.
pub struct QTrainer<B: AutodiffBackend> {
    network: QNetwork<B>,
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    learning_rate: f64,
    gamma: f32,
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    pub fn new(network: QNetwork<B>, learning_rate: f64, gamma: f32, device: B::Device) -> Self {
        Self {
            network,
            optim: AdamConfig::new().init(),
            learning_rate,
            gamma,
            device,
        }
    }

    /// One TD update over aligned parallel batch fields.
    ///
    /// Accepts a single transition's fields (length-1 slices) or a batch.
    /// The five slices must be non-empty and of equal length; anything else
    /// fails fast with [`TrainerError`] before touching the model.
    ///
    /// Returns the MSE loss of the step.
    pub fn train_step(
        &mut self,
        states: &[State],
        actions: &[TurnAction],
        rewards: &[f32],
        next_states: &[State],
        dones: &[bool],
    ) -> Result<f32, TrainerError> {
        let n = states.len();
        if n != actions.len()
            || n != rewards.len()
            || n != next_states.len()
            || n != dones.len()
        {
            return Err(TrainerError::InvalidBatch {
                states: n,
                actions: actions.len(),
                rewards: rewards.len(),
                next_states: next_states.len(),
                dones: dones.len(),
            });
        }
        if n == 0 {
            return Err(TrainerError::EmptyBatch);
        }

        // Predicted Q-values on the autodiff backend: [n, 3]
        let state_tensor = batch_to_tensor::<B>(states, &self.device);
        let q_pred = self.network.forward(state_tensor);

        // Next-state Q-values on the inner backend (no gradient tracking)
        let next_tensor = batch_to_tensor::<B::InnerBackend>(next_states, &self.device);
        let next_q = self.network.valid().predict(next_tensor);
        let next_q_data: Vec<f32> = next_q
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");

        // Target tensor equals the prediction except at the taken action
        let q_data: Vec<f32> = q_pred
            .to_data()
            .to_vec()
            .expect("f32 tensor data extraction");
        let targets = build_targets(
            &q_data,
            &next_q_data,
            actions,
            rewards,
            dones,
            self.gamma,
        );
        let target_tensor = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [n, NUM_ACTIONS]),
            &self.device,
        );

        // MSE loss over the full Q matrix; only taken-action entries differ
        let diff = q_pred - target_tensor;
        let loss = (diff.clone() * diff).mean();
        let loss_val: f32 = loss.clone().into_scalar().elem();

        // Exactly one optimizer step per call
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.network);
        self.network = self
            .optim
            .step(self.learning_rate, self.network.clone(), grads);

        Ok(loss_val)
    }

    /// Convenience wrapper: split whole transitions into the five parallel
    /// fields and run one update.
    pub fn train_transitions(&mut self, batch: &[Transition]) -> Result<f32, TrainerError> {
        let states: Vec<State> = batch.iter().map(|t| t.state).collect();
        let actions: Vec<TurnAction> = batch.iter().map(|t| t.action).collect();
        let rewards: Vec<f32> = batch.iter().map(|t| t.reward).collect();
        let next_states: Vec<State> = batch.iter().map(|t| t.next_state).collect();
        let dones: Vec<bool> = batch.iter().map(|t| t.done).collect();

        self.train_step(&states, &actions, &rewards, &next_states, &dones)
    }

    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    /// Replace the network, e.g. with weights loaded from a checkpoint.
    pub fn set_network(&mut self, network: QNetwork<B>) {
        self.network = network;
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }
}

/// Assemble TD targets: a copy of the predicted Q matrix where the entry of
/// the taken action is replaced by `reward` (terminal) or
/// `reward + gamma * max(next_q)` (non-terminal).
fn build_targets(
    q_pred: &[f32],
    next_q: &[f32],
    actions: &[TurnAction],
    rewards: &[f32],
    dones: &[bool],
    gamma: f32,
) -> Vec<f32> {
    let mut targets = q_pred.to_vec();

    for i in 0..actions.len() {
        let q_new = if dones[i] {
            rewards[i]
        } else {
            let row = &next_q[i * NUM_ACTIONS..(i + 1) * NUM_ACTIONS];
            let max_next = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            rewards[i] + gamma * max_next
        };
        targets[i * NUM_ACTIONS + actions[i].index()] = q_new;
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::backend::{default_device, TrainingBackend};
    use crate::rl::features::STATE_DIM;
    use crate::rl::network::QNetworkConfig;

    fn test_trainer() -> QTrainer<TrainingBackend> {
        let device = default_device();
        let network = QNetworkConfig::new(16).init::<TrainingBackend>(&device);
        QTrainer::new(network, 1e-3, 0.9, device)
    }

    fn state(fill: f32) -> State {
        State([fill; STATE_DIM])
    }

    #[test]
    fn test_terminal_target_is_immediate_reward() {
        let q_pred = vec![0.5, -0.2, 0.1];
        let next_q = vec![9.0, 9.0, 9.0]; // must not contribute

        let targets = build_targets(
            &q_pred,
            &next_q,
            &[TurnAction::TurnRight],
            &[7.0],
            &[true],
            0.9,
        );

        // Taken action entry replaced by the raw reward, others untouched
        assert_eq!(targets, vec![0.5, 7.0, 0.1]);
    }

    #[test]
    fn test_non_terminal_target_discounts_best_next_value() {
        let q_pred = vec![0.0, 0.0, 0.0];
        let next_q = vec![1.0, 3.0, 2.0];

        let targets = build_targets(
            &q_pred,
            &next_q,
            &[TurnAction::Straight],
            &[1.0],
            &[false],
            0.9,
        );

        assert!((targets[0] - (1.0 + 0.9 * 3.0)).abs() < 1e-6);
        assert_eq!(&targets[1..], &[0.0, 0.0]);
    }

    #[test]
    fn test_batched_targets_row_by_row() {
        let q_pred = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let next_q = vec![0.0, 1.0, 0.0, 2.0, 0.0, 0.0];

        let targets = build_targets(
            &q_pred,
            &next_q,
            &[TurnAction::TurnLeft, TurnAction::Straight],
            &[1.0, -10.0],
            &[false, true],
            0.5,
        );

        // Row 0: non-terminal, action index 2
        assert!((targets[2] - (1.0 + 0.5 * 1.0)).abs() < 1e-6);
        // Row 1: terminal, action index 0
        assert_eq!(targets[3], -10.0);
        // Untouched entries keep their predictions
        assert_eq!(targets[0], 0.1);
        assert_eq!(targets[4], 0.5);
    }

    #[test]
    fn test_single_transition_update() {
        let mut trainer = test_trainer();

        let loss = trainer
            .train_step(
                &[state(1.0)],
                &[TurnAction::Straight],
                &[10.0],
                &[state(0.0)],
                &[false],
            )
            .unwrap();

        assert!(loss.is_finite());
        assert!(loss >= 0.0);
    }

    #[test]
    fn test_mismatched_lengths_fail_fast() {
        let mut trainer = test_trainer();

        let result = trainer.train_step(
            &[state(0.0), state(1.0)],
            &[TurnAction::Straight], // wrong length
            &[0.0, 0.0],
            &[state(0.0), state(0.0)],
            &[false, false],
        );

        assert!(matches!(result, Err(TrainerError::InvalidBatch { .. })));
    }

    #[test]
    fn test_empty_batch_fails_fast() {
        let mut trainer = test_trainer();
        let result = trainer.train_step(&[], &[], &[], &[], &[]);
        assert!(matches!(result, Err(TrainerError::EmptyBatch)));
    }

    #[test]
    fn test_update_moves_prediction_toward_target() {
        let mut trainer = test_trainer();
        let device = default_device();

        let s = state(1.0);
        let read_q = |trainer: &QTrainer<TrainingBackend>| -> Vec<f32> {
            let t = batch_to_tensor::<crate::rl::backend::InferenceBackend>(&[s], &device);
            trainer
                .network()
                .valid()
                .predict(t)
                .into_data()
                .to_vec()
                .expect("f32 tensor data extraction")
        };

        let before = read_q(&trainer)[TurnAction::Straight.index()];

        // Repeatedly regress the straight action toward a large terminal
        // reward; its Q-value must increase.
        for _ in 0..50 {
            trainer
                .train_step(
                    &[s],
                    &[TurnAction::Straight],
                    &[10.0],
                    &[state(0.0)],
                    &[true],
                )
                .unwrap();
        }

        let after = read_q(&trainer)[TurnAction::Straight.index()];
        assert!(
            after > before,
            "Q(s, straight) should grow toward the reward: {} -> {}",
            before,
            after
        );
    }

    #[test]
    fn test_train_transitions_matches_field_form() {
        let mut trainer = test_trainer();

        let batch = vec![
            Transition {
                state: state(0.0),
                action: TurnAction::TurnLeft,
                reward: 1.0,
                next_state: state(1.0),
                done: false,
            },
            Transition {
                state: state(1.0),
                action: TurnAction::Straight,
                reward: -10.0,
                next_state: state(0.0),
                done: true,
            },
        ];

        let loss = trainer.train_transitions(&batch).unwrap();
        assert!(loss.is_finite());
    }
}
