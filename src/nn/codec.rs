//! Genome codec: network weights ↔ flat chromosome

use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};

use super::network::{NeuralNetwork, Topology};
use crate::error::Result;

/// Flat encoding of every weight and bias of one network
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chromosome {
    genes: Vec<f32>,
}

impl Chromosome {
    pub fn new(genes: Vec<f32>) -> Self {
        Self { genes }
    }

    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [f32] {
        &mut self.genes
    }

    pub fn into_genes(self) -> Vec<f32> {
        self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl From<Vec<f32>> for Chromosome {
    fn from(genes: Vec<f32>) -> Self {
        Self::new(genes)
    }
}

/// Flatten a network, layer by layer: weights row-major, then bias
pub fn encode<B: Backend>(network: &NeuralNetwork<B>) -> Result<Chromosome> {
    network.parameters().map(Chromosome::new)
}

/// Inverse of [`encode`] for the given topology
///
/// # Returns
///
/// `Err(SnakeError::ShapeMismatch)` if the chromosome length is not the
/// topology's parameter count. Nothing is truncated or padded.
pub fn decode<B: Backend>(
    chromosome: &Chromosome,
    topology: &Topology,
    device: &B::Device,
) -> Result<NeuralNetwork<B>> {
    NeuralNetwork::from_parameters(topology.clone(), chromosome.genes(), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnakeError;
    use crate::nn::activation::Activation;
    use crate::nn::backend::{InferenceBackend, default_device};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type TestNetwork = NeuralNetwork<InferenceBackend>;

    #[test]
    fn test_round_trip_preserves_outputs() {
        let device = default_device();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let features: Vec<f32> = (0..10).map(|i| i as f32 / 10.0 - 0.4).collect();

        for (sizes, hidden) in [
            (vec![10, 4], Activation::Relu),
            (vec![10, 16, 4], Activation::Tanh),
            (vec![10, 20, 12, 4], Activation::LeakyRelu),
        ] {
            let topology = Topology::new(sizes, hidden, Activation::Softmax).unwrap();
            let network = TestNetwork::random(topology.clone(), &device, &mut rng);

            let chromosome = encode(&network).unwrap();
            assert_eq!(chromosome.len(), topology.num_parameters());

            let restored: TestNetwork = decode(&chromosome, &topology, &device).unwrap();
            let before = network.forward(&features).unwrap();
            let after = restored.forward(&features).unwrap();
            for (a, b) in before.iter().zip(&after) {
                assert!((a - b).abs() < 1e-6);
            }
            assert_eq!(encode(&restored).unwrap(), chromosome);
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let topology = Topology::new(vec![3, 4], Activation::Relu, Activation::Softmax).unwrap();
        let short = Chromosome::new(vec![0.0; 15]);
        let result: Result<TestNetwork> = decode(&short, &topology, &default_device());
        assert!(matches!(
            result,
            Err(SnakeError::ShapeMismatch { expected: 16, actual: 15, .. })
        ));
    }

    #[test]
    fn test_chromosome_serializes_as_flat_list() {
        let chromosome = Chromosome::new(vec![0.5, -1.0]);
        assert_eq!(serde_json::to_string(&chromosome).unwrap(), "[0.5,-1.0]");
    }
}
