//! Q-value network for the DQN agent
//!
//! A small feed-forward network mapping the 11-element state vector to one
//! Q-value per relative action:
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: [batch, 3]   (Q-values for straight / turn-right / turn-left)
//! ```
//!
//! The rest of the crate treats the network as an opaque trainable value
//! function through the [`ValueModel`] trait; the architecture here is a
//! tunable detail, not a structural requirement of the learning loop.

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{activation::relu, backend::Backend, Tensor},
};

use super::features::{batch_to_tensor, State, STATE_DIM};
use crate::game::TurnAction;

/// Number of discrete actions the network scores
pub const NUM_ACTIONS: usize = 3;

/// A trainable state → action-values function.
///
/// The policy's exploit branch and the trainer's TD-target computation only
/// rely on this seam, so a different approximator can be substituted without
/// touching the learning loop.
pub trait ValueModel<B: Backend> {
    /// Score every action for a batch of states: `[batch, STATE_DIM]` →
    /// `[batch, NUM_ACTIONS]`.
    fn predict(&self, states: Tensor<B, 2>) -> Tensor<B, 2>;
}

/// Configuration for the Q-network
#[derive(Debug, Clone)]
pub struct QNetworkConfig {
    /// Input feature count (the state vector length)
    pub state_dim: usize,
    /// Hidden layer width
    pub hidden_dim: usize,
    /// Output count (one Q-value per action)
    pub num_actions: usize,
}

impl QNetworkConfig {
    /// Create a configuration with the standard state/action dimensions
    pub fn new(hidden_dim: usize) -> Self {
        Self {
            state_dim: STATE_DIM,
            hidden_dim,
            num_actions: NUM_ACTIONS,
        }
    }

    /// Initialize the Q-network on the given device
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc1: LinearConfig::new(self.state_dim, self.hidden_dim).init(device),
            fc2: LinearConfig::new(self.hidden_dim, self.num_actions).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Two-layer Q-value network.
///
/// Generic over the Burn backend so the same module runs under autodiff for
/// training and on the plain backend for inference.
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: `[batch, STATE_DIM]` → `[batch, NUM_ACTIONS]`
    pub fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.fc1.forward(states);
        let x = relu(x);
        self.fc2.forward(x)
    }
}

impl<B: Backend> ValueModel<B> for QNetwork<B> {
    fn predict(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        self.forward(states)
    }
}

/// Greedy action for a single state: the argmax of the model's Q-values.
/// Ties break toward the lowest action index.
pub fn greedy_action<B: Backend, M: ValueModel<B>>(
    model: &M,
    state: &State,
    device: &B::Device,
) -> TurnAction {
    let q_values: Vec<f32> = model
        .predict(batch_to_tensor(&[*state], device))
        .into_data()
        .to_vec()
        .expect("f32 tensor data extraction");

    let mut best = 0;
    for (i, &q) in q_values.iter().enumerate() {
        if q > q_values[best] {
            best = i;
        }
    }
    TurnAction::from_index(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use burn::backend::Autodiff;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_forward_pass_shapes() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        let states = Tensor::zeros([2, STATE_DIM], &device);
        let q_values = network.forward(states);

        assert_eq!(q_values.dims(), [2, NUM_ACTIONS]);
    }

    #[test]
    fn test_different_batch_sizes() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        for batch_size in [1, 4, 32, 1000] {
            let states = Tensor::zeros([batch_size, STATE_DIM], &device);
            let q_values = network.forward(states);
            assert_eq!(q_values.dims(), [batch_size, NUM_ACTIONS]);
        }
    }

    #[test]
    fn test_predict_matches_forward() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        let states = Tensor::<TestBackend, 2>::ones([1, STATE_DIM], &device);
        let via_forward = network.forward(states.clone()).into_data();
        let via_predict = network.predict(states).into_data();

        assert_eq!(
            via_forward.as_slice::<f32>().unwrap(),
            via_predict.as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_output_finite() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        let states = Tensor::ones([8, STATE_DIM], &device);
        let q_values = network.forward(states);

        let data: TensorData = q_values.into_data();
        for &val in data.as_slice::<f32>().unwrap() {
            assert!(val.is_finite(), "Q-values should be finite, got: {}", val);
        }
    }

    #[test]
    fn test_gradient_flow() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestAutodiffBackend>(&device);

        let states =
            Tensor::<TestAutodiffBackend, 2>::ones([1, STATE_DIM], &device).require_grad();
        let loss = network.forward(states.clone()).sum();
        let gradients = loss.backward();

        let grad = states.grad(&gradients);
        assert!(grad.is_some(), "gradients should flow back to the input");
    }

    #[test]
    fn test_smaller_hidden_dim() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::new(16).init::<TestBackend>(&device);

        let states = Tensor::zeros([3, STATE_DIM], &device);
        assert_eq!(network.forward(states).dims(), [3, NUM_ACTIONS]);
    }
}
