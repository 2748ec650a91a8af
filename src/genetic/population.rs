use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use super::config::GeneticConfig;
use super::individual::Individual;
use super::operators::{crossover_simulated_binary, crossover_single_point, mutate};
use crate::error::{Result, SnakeError};
use crate::nn::{Brain, Topology, default_device, encode};

/// An ordered set of individuals
///
/// The order is significant: ties in fitness are broken in favour of the
/// lower index.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// `size` unevaluated individuals with freshly initialized controllers
    pub fn random<R: Rng>(size: usize, topology: &Topology, rng: &mut R) -> Result<Self> {
        let device = default_device();
        let individuals = (0..size)
            .map(|_| encode(&Brain::random(topology.clone(), &device, rng)).map(Individual::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(individuals))
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    /// Fitness of every individual, failing if any has not been evaluated
    fn fitnesses(&self) -> Result<Vec<f64>> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(idx, individual)| {
                individual.fitness().ok_or_else(|| {
                    SnakeError::InvalidPopulation(format!("individual {idx} is not evaluated"))
                })
            })
            .collect()
    }

    /// Indices ordered by fitness, best first, ties by lower index
    fn ranking(&self) -> Result<Vec<usize>> {
        let fitnesses = self.fitnesses()?;
        let mut order: Vec<usize> = (0..fitnesses.len()).collect();
        order.sort_by(|&a, &b| fitnesses[b].total_cmp(&fitnesses[a]));
        Ok(order)
    }

    /// Indices of the `k` fittest individuals, best first
    pub fn elite_indices(&self, k: usize) -> Result<Vec<usize>> {
        if k > self.len() {
            return Err(SnakeError::InvalidPopulation(format!(
                "cannot select {k} elites from {} individuals",
                self.len()
            )));
        }
        let mut order = self.ranking()?;
        order.truncate(k);
        Ok(order)
    }

    /// The `k` fittest individuals, best first
    pub fn select_elitism(&self, k: usize) -> Result<Vec<Individual>> {
        Ok(self
            .elite_indices(k)?
            .into_iter()
            .map(|idx| self.individuals[idx].clone())
            .collect())
    }

    /// Draw `k` individuals with replacement, proportionally to
    /// `fitness - min_fitness + epsilon`
    ///
    /// # Returns
    ///
    /// `Err(SnakeError::InvalidPopulation)` if the population is empty, holds
    /// unevaluated individuals, or every weight is zero.
    pub fn select_roulette_wheel<R: Rng>(
        &self,
        k: usize,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<Vec<Individual>> {
        if self.is_empty() {
            return Err(SnakeError::InvalidPopulation(
                "cannot sample from an empty population".to_string(),
            ));
        }
        let fitnesses = self.fitnesses()?;
        let min = fitnesses.iter().copied().fold(f64::INFINITY, f64::min);
        let weights = fitnesses.iter().map(|fitness| fitness - min + epsilon);
        let wheel = WeightedIndex::new(weights)
            .map_err(|err| SnakeError::InvalidPopulation(format!("roulette wheel: {err}")))?;

        Ok((0..k)
            .map(|_| self.individuals[wheel.sample(rng)].clone())
            .collect())
    }

    /// The first individual with the highest fitness
    pub fn fittest(&self) -> Option<&Individual> {
        let mut best: Option<(&Individual, f64)> = None;
        for individual in &self.individuals {
            let Some(fitness) = individual.fitness() else {
                continue;
            };
            if best.is_none_or(|(_, top)| fitness > top) {
                best = Some((individual, fitness));
            }
        }
        best.map(|(individual, _)| individual)
    }

    /// Mean fitness over evaluated individuals
    pub fn mean_fitness(&self) -> Option<f64> {
        let fitnesses: Vec<f64> = self.individuals.iter().filter_map(Individual::fitness).collect();
        if fitnesses.is_empty() {
            return None;
        }
        Some(fitnesses.iter().sum::<f64>() / fitnesses.len() as f64)
    }

    /// Replace every individual with the next generation
    ///
    /// The `num_parents` fittest chromosomes are carried over unchanged.
    /// The remaining `num_offspring` slots are filled with children of
    /// roulette-selected pairs: SBX with probability `probability_sbx`,
    /// otherwise single-point crossover, then mutation at the rate scheduled
    /// for `generation`. Nobody in the new generation is evaluated.
    pub fn next_generation<R: Rng>(
        &mut self,
        config: &GeneticConfig,
        generation: usize,
        rng: &mut R,
    ) -> Result<()> {
        let size = config.population_size();
        if self.len() != size {
            return Err(SnakeError::InvalidPopulation(format!(
                "expected {size} individuals, found {}",
                self.len()
            )));
        }
        let rate = config.mutation_rate_for(generation);
        let mutation = config.mutation()?;

        let mut next: Vec<Individual> = self
            .select_elitism(config.num_parents)?
            .into_iter()
            .map(|elite| Individual::new(elite.into_chromosome()))
            .collect();

        while next.len() < size {
            let parents = self.select_roulette_wheel(2, config.roulette_epsilon, rng)?;
            let (p1, p2) = (parents[0].chromosome(), parents[1].chromosome());
            let (mut c1, mut c2) = if rng.gen_bool(config.probability_sbx) {
                crossover_simulated_binary(p1, p2, config.eta_sbx, rng)?
            } else {
                crossover_single_point(p1, p2, rng)?
            };
            mutate(&mut c1, rate, &mutation, rng);
            mutate(&mut c2, rate, &mutation, rng);

            next.push(Individual::new(c1));
            if next.len() < size {
                next.push(Individual::new(c2));
            }
        }

        self.individuals = next;
        Ok(())
    }
}
