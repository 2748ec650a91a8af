//! Neural controller for snake agents
//!
//! Provides:
//! - Dense feed-forward networks on the Burn NdArray backend
//! - Activation functions (identity, ReLU, leaky ReLU, tanh, sigmoid, softmax)
//! - The genome codec between networks and flat chromosomes
//! - JSON persistence of evolved genomes

pub mod activation;
pub mod backend;
pub mod codec;
pub mod config;
pub mod network;
pub mod persistence;

pub use activation::Activation;
pub use backend::{InferenceBackend, default_device};
pub use codec::{Chromosome, decode, encode};
pub use config::{NUM_ACTIONS, NetworkConfig};
pub use network::{NeuralNetwork, Topology, argmax};
pub use persistence::{SavedGenome, load_genome, save_genome};

/// Controller network type used by snakes
pub type Brain = NeuralNetwork<InferenceBackend>;
