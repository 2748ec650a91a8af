//! Layer nonlinearities

use burn::tensor::{Tensor, activation, backend::Backend};
use serde::{Deserialize, Serialize};

/// Slope used by [`Activation::LeakyRelu`] for negative inputs
pub const LEAKY_RELU_SLOPE: f64 = 0.01;

/// Nonlinearity applied after a dense layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Relu,
    LeakyRelu,
    Tanh,
    Sigmoid,
    /// Normalizes each row into a distribution; meant for the output layer
    Softmax,
}

impl Activation {
    /// Apply to a `[batch, features]` tensor
    pub fn apply<B: Backend>(self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        match self {
            Activation::Identity => x,
            Activation::Relu => activation::relu(x),
            Activation::LeakyRelu => activation::leaky_relu(x, LEAKY_RELU_SLOPE),
            Activation::Tanh => activation::tanh(x),
            Activation::Sigmoid => activation::sigmoid(x),
            Activation::Softmax => activation::softmax(x, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::backend::{InferenceBackend, default_device};
    use burn::tensor::TensorData;

    fn apply(activation: Activation, values: [f32; 4]) -> Vec<f32> {
        let device = default_device();
        let x = Tensor::<InferenceBackend, 2>::from_data(
            TensorData::new(values.to_vec(), [1, 4]),
            &device,
        );
        activation.apply(x).into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_relu_family() {
        assert_eq!(apply(Activation::Relu, [-2.0, 0.0, 1.5, 3.0]), vec![0.0, 0.0, 1.5, 3.0]);
        let leaky = apply(Activation::LeakyRelu, [-2.0, 0.0, 1.5, 3.0]);
        assert!((leaky[0] + 0.02).abs() < 1e-6);
        assert_eq!(leaky[3], 3.0);
        assert_eq!(apply(Activation::Identity, [-2.0, 0.0, 1.5, 3.0]), vec![-2.0, 0.0, 1.5, 3.0]);
    }

    #[test]
    fn test_softmax_is_distribution() {
        let probs = apply(Activation::Softmax, [1.0, 2.0, 3.0, 4.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_bounded_activations() {
        for value in apply(Activation::Tanh, [-50.0, -0.5, 0.5, 50.0]) {
            assert!((-1.0..=1.0).contains(&value));
        }
        for value in apply(Activation::Sigmoid, [-50.0, -0.5, 0.5, 50.0]) {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Activation::LeakyRelu).unwrap();
        assert_eq!(json, "\"leaky_relu\"");
        assert!(serde_json::from_str::<Activation>("\"gelu\"").is_err());
    }
}
