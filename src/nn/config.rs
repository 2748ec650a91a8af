//! Controller network configuration

use serde::{Deserialize, Serialize};

use super::activation::Activation;
use super::network::Topology;
use crate::error::{Result, SnakeError};

/// Number of network outputs, one per direction
pub const NUM_ACTIONS: usize = 4;

/// Hidden layout and activations of the controller network
///
/// The input width comes from the snake's vision and the output width is
/// always [`NUM_ACTIONS`], so only the hidden part is configurable.
///
/// # Example
///
/// ```rust
/// use evo_snake::nn::NetworkConfig;
///
/// let config = NetworkConfig {
///     hidden_layers: vec![16],
///     ..Default::default()
/// };
/// let topology = config.topology(32).unwrap();
/// assert_eq!(topology.layer_sizes, vec![32, 16, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Width of each hidden layer
    ///
    /// Default: [20, 12]
    pub hidden_layers: Vec<usize>,

    /// Activation for every hidden layer
    ///
    /// Default: ReLU
    pub hidden_activation: Activation,

    /// Activation for the output layer
    ///
    /// Default: softmax
    pub output_activation: Activation,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![20, 12],
            hidden_activation: Activation::Relu,
            output_activation: Activation::Softmax,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden_layers.contains(&0) {
            return Err(SnakeError::InvalidConfig(
                "hidden layers must have at least one unit".to_string(),
            ));
        }
        Ok(())
    }

    /// Full topology for a given input width
    pub fn topology(&self, input_len: usize) -> Result<Topology> {
        self.validate()?;
        let mut layer_sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        layer_sizes.push(input_len);
        layer_sizes.extend_from_slice(&self.hidden_layers);
        layer_sizes.push(NUM_ACTIONS);
        Topology::new(layer_sizes, self.hidden_activation, self.output_activation)
    }
}
