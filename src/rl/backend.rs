//! Backend type aliases and device management
//!
//! This module provides convenient type aliases for the Burn backends used in
//! training and inference, as well as a helper for device management.
//!
//! NdArray on the CPU is plenty for this agent: the state vector has 11
//! entries and the Q-network is two small linear layers. A GPU backend (Wgpu)
//! could be swapped in later for larger experiments.

use burn::backend::{
    ndarray::{NdArray, NdArrayDevice},
    Autodiff,
};

/// Backend type for training (with autodiff)
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
