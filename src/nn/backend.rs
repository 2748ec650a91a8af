//! Backend type alias and device management
//!
//! Controllers only ever run forward passes on tiny dense layers, so the plain
//! NdArray CPU backend is used without an autodiff wrapper. Genetic search
//! never needs gradients.
//!
//! # Example
//!
//! ```rust
//! use evo_snake::nn::{InferenceBackend, default_device};
//!
//! let device = default_device();
//! // let network = NeuralNetwork::<InferenceBackend>::random(topology, &device, &mut rng);
//! ```

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend type for controller inference
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
///
/// Returns the default NdArray device (CPU).
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_device_calls() {
        let device1 = default_device();
        let device2 = default_device();
        assert_eq!(device1, device2);
    }
}
