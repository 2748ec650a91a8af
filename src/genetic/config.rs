//! Genetic algorithm hyperparameter configuration

use serde::{Deserialize, Serialize};

use super::operators::Mutation;
use crate::error::{Result, SnakeError};

/// What a mutation does to a selected gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Add Gaussian noise with `gaussian_mu`/`gaussian_std`
    Gaussian,
    /// Replace with a fresh value from Uniform[-1, 1)
    Uniform,
}

/// How the mutation rate evolves over generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationRateType {
    /// The same rate every generation
    Static,
    /// `mutation_rate / sqrt(generation + 1)`
    Decaying,
}

/// Configuration for the genetic algorithm
///
/// # Example
///
/// ```rust
/// use evo_snake::genetic::GeneticConfig;
///
/// let config = GeneticConfig {
///     num_parents: 10,
///     num_offspring: 20,
///     ..Default::default()
/// };
/// assert_eq!(config.population_size(), 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneticConfig {
    /// Number of generations to run
    ///
    /// Default: 100
    pub num_generations: usize,

    /// Individuals carried unchanged into the next generation
    ///
    /// Default: 50
    pub num_parents: usize,

    /// Children bred per generation
    ///
    /// Default: 100
    pub num_offspring: usize,

    /// Distribution index of simulated binary crossover
    ///
    /// Larger values keep children closer to their parents.
    ///
    /// Default: 100.0
    pub eta_sbx: f32,

    /// Probability of using SBX instead of single-point crossover
    ///
    /// Default: 0.5
    pub probability_sbx: f64,

    /// Offset added to every roulette weight `fitness - min_fitness`
    ///
    /// With zero, a population of equal fitness cannot be sampled.
    ///
    /// Default: 1e-6
    pub roulette_epsilon: f64,

    /// Default: Gaussian
    pub mutation_type: MutationType,

    /// Per-gene mutation probability
    ///
    /// Default: 0.05
    pub mutation_rate: f64,

    /// Default: Static
    pub mutation_rate_type: MutationRateType,

    /// Mean of the Gaussian mutation noise
    ///
    /// Default: 0.0
    pub gaussian_mu: f32,

    /// Standard deviation of the Gaussian mutation noise
    ///
    /// Default: 0.2
    pub gaussian_std: f32,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            num_generations: 100,
            num_parents: 50,
            num_offspring: 100,
            eta_sbx: 100.0,
            probability_sbx: 0.5,
            roulette_epsilon: 1e-6,
            mutation_type: MutationType::Gaussian,
            mutation_rate: 0.05,
            mutation_rate_type: MutationRateType::Static,
            gaussian_mu: 0.0,
            gaussian_std: 0.2,
        }
    }
}

fn probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SnakeError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

impl GeneticConfig {
    /// Parents plus offspring
    pub fn population_size(&self) -> usize {
        self.num_parents + self.num_offspring
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.num_generations == 0 {
            return Err(SnakeError::InvalidConfig(
                "num_generations must be at least 1".to_string(),
            ));
        }
        if self.num_parents == 0 {
            return Err(SnakeError::InvalidConfig(
                "num_parents must be at least 1".to_string(),
            ));
        }
        if !(self.eta_sbx.is_finite() && self.eta_sbx >= 0.0) {
            return Err(SnakeError::InvalidConfig(format!(
                "eta_sbx must be a non-negative number, got {}",
                self.eta_sbx
            )));
        }
        probability("probability_sbx", self.probability_sbx)?;
        probability("mutation_rate", self.mutation_rate)?;
        if !(self.roulette_epsilon.is_finite() && self.roulette_epsilon >= 0.0) {
            return Err(SnakeError::InvalidConfig(format!(
                "roulette_epsilon must be a non-negative number, got {}",
                self.roulette_epsilon
            )));
        }
        if !self.gaussian_mu.is_finite()
            || !(self.gaussian_std.is_finite() && self.gaussian_std >= 0.0)
        {
            return Err(SnakeError::InvalidConfig(format!(
                "gaussian noise needs a finite mean and non-negative std, got N({}, {})",
                self.gaussian_mu, self.gaussian_std
            )));
        }
        Ok(())
    }

    /// Mutation rate in effect for a zero-based generation index
    pub fn mutation_rate_for(&self, generation: usize) -> f64 {
        match self.mutation_rate_type {
            MutationRateType::Static => self.mutation_rate,
            MutationRateType::Decaying => self.mutation_rate / ((generation + 1) as f64).sqrt(),
        }
    }

    /// The mutation operator described by this configuration
    pub fn mutation(&self) -> Result<Mutation> {
        match self.mutation_type {
            MutationType::Gaussian => Mutation::gaussian(self.gaussian_mu, self.gaussian_std),
            MutationType::Uniform => Ok(Mutation::Uniform),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size(), 150);
    }

    #[test]
    fn test_validation_probabilities() {
        let mut config = GeneticConfig::default();
        config.probability_sbx = 1.5;
        assert!(config.validate().is_err());

        config.probability_sbx = 0.5;
        config.mutation_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_counts() {
        let mut config = GeneticConfig::default();
        config.num_parents = 0;
        assert!(config.validate().is_err());

        let mut config = GeneticConfig::default();
        config.num_generations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_noise() {
        let mut config = GeneticConfig::default();
        config.gaussian_std = -1.0;
        assert!(config.validate().is_err());

        config.gaussian_std = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = GeneticConfig::default();
        config.eta_sbx = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mutation_rate_schedule() {
        let mut config = GeneticConfig::default();
        assert_eq!(config.mutation_rate_for(0), 0.05);
        assert_eq!(config.mutation_rate_for(99), 0.05);

        config.mutation_rate_type = MutationRateType::Decaying;
        assert_eq!(config.mutation_rate_for(0), 0.05);
        assert!((config.mutation_rate_for(3) - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_mutation_type_rejected() {
        let json = serde_json::to_string(&GeneticConfig::default())
            .unwrap()
            .replace("\"gaussian\"", "\"cauchy\"");
        assert!(serde_json::from_str::<GeneticConfig>(&json).is_err());
    }
}
