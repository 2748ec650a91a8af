//! Evolution engine
//!
//! Provides:
//! - Elitism and roulette-wheel selection
//! - Simulated binary and single-point crossover
//! - Gaussian and uniform mutation with a static or decaying rate
//! - Generation replacement of a fixed-size population

pub mod config;
pub mod individual;
pub mod operators;
pub mod population;

pub use config::{GeneticConfig, MutationRateType, MutationType};
pub use individual::{Evaluation, Individual};
pub use operators::{Mutation, crossover_simulated_binary, crossover_single_point, mutate};
pub use population::Population;
