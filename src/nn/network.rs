//! Feed-forward controller network
//!
//! A [`NeuralNetwork`] is a chain of dense layers, each computing
//! `activation(x · W + b)`. Shapes are described by a [`Topology`]:
//!
//! ```text
//! Input: [1, layer_sizes[0]]
//!   ↓ Linear(layer_sizes[0] → layer_sizes[1]) + hidden activation
//!   ↓ ...
//!   ↓ Linear(layer_sizes[n-2] → layer_sizes[n-1]) + output activation
//! Output: [1, layer_sizes[n-1]]
//! ```
//!
//! The network holds no state besides its weights, so `forward` is a pure
//! function of its input.
//!
//! # Example
//!
//! ```rust
//! use evo_snake::nn::{Activation, InferenceBackend, NeuralNetwork, Topology, default_device};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let topology = Topology::new(vec![6, 5, 4], Activation::Relu, Activation::Softmax).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//! let network = NeuralNetwork::<InferenceBackend>::random(topology, &default_device(), &mut rng);
//!
//! let output = network.forward(&[0.1; 6]).unwrap();
//! assert_eq!(output.len(), 4);
//! ```

use burn::tensor::{Tensor, TensorData, backend::Backend};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::activation::Activation;
use crate::error::{Result, SnakeError};

/// Range of the uniform distribution used for fresh weights: `[-r, r)`
pub const INIT_WEIGHT_RANGE: f32 = 1.0;

/// Shape descriptor of a network
///
/// Together with a flat chromosome this fully determines a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Width of every layer, input first and output last
    pub layer_sizes: Vec<usize>,

    /// Activation of every layer except the last
    pub hidden_activation: Activation,

    /// Activation of the last layer
    pub output_activation: Activation,
}

impl Topology {
    /// Build and validate a topology
    ///
    /// # Returns
    ///
    /// `Err(SnakeError::InvalidConfig)` if there are fewer than two layers or
    /// any layer is empty.
    pub fn new(
        layer_sizes: Vec<usize>,
        hidden_activation: Activation,
        output_activation: Activation,
    ) -> Result<Self> {
        let topology = Self {
            layer_sizes,
            hidden_activation,
            output_activation,
        };
        topology.validate()?;
        Ok(topology)
    }

    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(SnakeError::InvalidConfig(format!(
                "a network needs an input and an output layer, got {} layer(s)",
                self.layer_sizes.len()
            )));
        }
        if let Some(idx) = self.layer_sizes.iter().position(|&size| size == 0) {
            return Err(SnakeError::InvalidConfig(format!(
                "layer {idx} has zero width"
            )));
        }
        Ok(())
    }

    pub fn input_len(&self) -> usize {
        self.layer_sizes.first().copied().unwrap_or(0)
    }

    pub fn output_len(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or(0)
    }

    /// `(inputs, outputs)` of each dense layer
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.layer_sizes.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Number of trainable parameters, weights plus biases
    pub fn num_parameters(&self) -> usize {
        self.layer_shapes()
            .map(|(inputs, outputs)| inputs * outputs + outputs)
            .sum()
    }

    fn activation_for(&self, layer: usize) -> Activation {
        if layer + 2 == self.layer_sizes.len() {
            self.output_activation
        } else {
            self.hidden_activation
        }
    }
}

/// One dense layer; `weights` is `[inputs, outputs]`, `bias` is `[1, outputs]`
#[derive(Debug, Clone)]
struct DenseLayer<B: Backend> {
    weights: Tensor<B, 2>,
    bias: Tensor<B, 2>,
    activation: Activation,
}

/// Feed-forward network evaluated on a Burn backend
#[derive(Debug, Clone)]
pub struct NeuralNetwork<B: Backend> {
    layers: Vec<DenseLayer<B>>,
    topology: Topology,
    device: B::Device,
}

impl<B: Backend> NeuralNetwork<B> {
    /// Create a network with weights and biases drawn uniformly from
    /// `[-INIT_WEIGHT_RANGE, INIT_WEIGHT_RANGE)`
    pub fn random<R: Rng>(topology: Topology, device: &B::Device, rng: &mut R) -> Self {
        let parameters: Vec<f32> = (0..topology.num_parameters())
            .map(|_| rng.gen_range(-INIT_WEIGHT_RANGE..INIT_WEIGHT_RANGE))
            .collect();
        Self::build(topology, &parameters, device)
    }

    /// Create a network from a flat parameter slice
    ///
    /// Layout per layer: the weight matrix row-major (`inputs × outputs`),
    /// then the bias vector. Layers follow in order.
    ///
    /// # Returns
    ///
    /// `Err(SnakeError::ShapeMismatch)` if the slice length differs from
    /// `topology.num_parameters()`.
    pub fn from_parameters(
        topology: Topology,
        parameters: &[f32],
        device: &B::Device,
    ) -> Result<Self> {
        topology.validate()?;
        let expected = topology.num_parameters();
        if parameters.len() != expected {
            return Err(SnakeError::ShapeMismatch {
                context: "network parameters",
                expected,
                actual: parameters.len(),
            });
        }
        Ok(Self::build(topology, parameters, device))
    }

    fn build(topology: Topology, parameters: &[f32], device: &B::Device) -> Self {
        let mut offset = 0;
        let mut layers = Vec::with_capacity(topology.layer_sizes.len().saturating_sub(1));

        for (idx, (inputs, outputs)) in topology.layer_shapes().enumerate() {
            let weight_end = offset + inputs * outputs;
            let bias_end = weight_end + outputs;

            let weights = Tensor::<B, 2>::from_data(
                TensorData::new(parameters[offset..weight_end].to_vec(), [inputs, outputs]),
                device,
            );
            let bias = Tensor::<B, 2>::from_data(
                TensorData::new(parameters[weight_end..bias_end].to_vec(), [1, outputs]),
                device,
            );

            layers.push(DenseLayer {
                weights,
                bias,
                activation: topology.activation_for(idx),
            });
            offset = bias_end;
        }

        Self {
            layers,
            topology,
            device: device.clone(),
        }
    }

    /// Forward pass for a single feature vector
    ///
    /// # Returns
    ///
    /// One value per output unit, or `Err(SnakeError::ShapeMismatch)` if
    /// `features` does not match the input width.
    pub fn forward(&self, features: &[f32]) -> Result<Vec<f32>> {
        let expected = self.topology.input_len();
        if features.len() != expected {
            return Err(SnakeError::ShapeMismatch {
                context: "network input",
                expected,
                actual: features.len(),
            });
        }

        let mut x = Tensor::<B, 2>::from_data(
            TensorData::new(features.to_vec(), [1, expected]),
            &self.device,
        );
        for layer in &self.layers {
            let z = x.matmul(layer.weights.clone()) + layer.bias.clone();
            x = layer.activation.apply(z);
        }

        tensor_values(x)
    }

    /// Flat parameters in the layout accepted by [`Self::from_parameters`]
    pub fn parameters(&self) -> Result<Vec<f32>> {
        let mut parameters = Vec::with_capacity(self.topology.num_parameters());
        for layer in &self.layers {
            parameters.extend(tensor_values(layer.weights.clone())?);
            parameters.extend(tensor_values(layer.bias.clone())?);
        }
        Ok(parameters)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn input_len(&self) -> usize {
        self.topology.input_len()
    }

    pub fn output_len(&self) -> usize {
        self.topology.output_len()
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }
}

fn tensor_values<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|err| SnakeError::Tensor(format!("{err:?}")))
}

/// Index of the largest value; ties go to the lowest index
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::backend::{InferenceBackend, default_device};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type TestNetwork = NeuralNetwork<InferenceBackend>;

    fn topology(sizes: &[usize]) -> Topology {
        Topology::new(sizes.to_vec(), Activation::Relu, Activation::Softmax).unwrap()
    }

    #[test]
    fn test_topology_parameter_count() {
        // (6*5 + 5) + (5*4 + 4)
        assert_eq!(topology(&[6, 5, 4]).num_parameters(), 59);
        assert_eq!(topology(&[3, 4]).num_parameters(), 16);
    }

    #[test]
    fn test_topology_validation() {
        assert!(Topology::new(vec![4], Activation::Relu, Activation::Softmax).is_err());
        assert!(Topology::new(vec![4, 0, 4], Activation::Relu, Activation::Softmax).is_err());
    }

    #[test]
    fn test_forward_output_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let network = TestNetwork::random(topology(&[6, 8, 5, 4]), &default_device(), &mut rng);

        let output = network.forward(&[0.5; 6]).unwrap();
        assert_eq!(output.len(), 4);

        let sum: f32 = output.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_forward_rejects_wrong_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let network = TestNetwork::random(topology(&[6, 4]), &default_device(), &mut rng);
        assert!(matches!(
            network.forward(&[0.0; 5]),
            Err(SnakeError::ShapeMismatch { expected: 6, actual: 5, .. })
        ));
    }

    #[test]
    fn test_forward_is_pure() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let network = TestNetwork::random(topology(&[3, 4, 4]), &default_device(), &mut rng);
        let features = [0.2, -0.7, 1.0];
        assert_eq!(network.forward(&features).unwrap(), network.forward(&features).unwrap());
    }

    #[test]
    fn test_known_weights() {
        // Single identity layer: out = x · W + b
        let topology = Topology::new(vec![2, 2], Activation::Identity, Activation::Identity).unwrap();
        let parameters = [1.0, 2.0, 3.0, 4.0, 0.5, -0.5];
        let network =
            TestNetwork::from_parameters(topology, &parameters, &default_device()).unwrap();

        let output = network.forward(&[1.0, 1.0]).unwrap();
        assert_eq!(output, vec![4.5, 5.5]);
    }

    #[test]
    fn test_parameters_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let network = TestNetwork::random(topology(&[4, 3, 4]), &default_device(), &mut rng);
        let parameters = network.parameters().unwrap();
        assert_eq!(parameters.len(), network.topology().num_parameters());
        assert!(parameters.iter().all(|p| (-1.0..1.0).contains(p)));

        let rebuilt =
            TestNetwork::from_parameters(network.topology().clone(), &parameters, &default_device())
                .unwrap();
        assert_eq!(rebuilt.parameters().unwrap(), parameters);
    }

    #[test]
    fn test_argmax_ties_go_low() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2, 0.0]), 1);
        assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]), 0);
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), 1);
    }
}
