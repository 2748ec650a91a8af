//! Training mode for evolving snake controllers
//!
//! Every generation each individual plays one episode on a cleaned game, its
//! fitness is recorded, and the population is bred into the next generation.
//! The best genome seen during the run is saved at the end.
//!
//! # Example
//!
//! ```rust,no_run
//! use evo_snake::modes::{TrainConfig, TrainMode};
//! use std::path::PathBuf;
//!
//! let mut config = TrainConfig::default();
//! config.genetic.num_generations = 20;
//! config.save_path = Some(PathBuf::from("models/best.json"));
//!
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, ensure};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::agent::{Snake, SnakeConfig};
use crate::game::{Game, GameConfig};
use crate::genetic::{GeneticConfig, Individual, Population};
use crate::metrics::{GenerationRecord, TrainingStats};
use crate::nn::{NetworkConfig, SavedGenome, Topology, save_genome};

/// Generations averaged in the rolling best-fitness statistic
const STATS_WINDOW: usize = 10;

/// Configuration for training mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// Grid size and seed
    pub game: GameConfig,

    /// Body and vision settings
    pub snake: SnakeConfig,

    /// Hidden layers and activations of the controller
    pub network: NetworkConfig,

    /// Genetic algorithm hyperparameters
    pub genetic: GeneticConfig,

    /// Where to write the best genome when training finishes
    pub save_path: Option<PathBuf>,

    /// Log progress every N generations
    ///
    /// Default: 1
    pub log_frequency: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            snake: SnakeConfig::default(),
            network: NetworkConfig::default(),
            genetic: GeneticConfig::default(),
            save_path: None,
            log_frequency: 1,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        self.game.validate().context("Invalid game configuration")?;
        self.snake
            .validate(&self.game)
            .context("Invalid snake configuration")?;
        self.network
            .validate()
            .context("Invalid network configuration")?;
        self.genetic
            .validate()
            .context("Invalid genetic configuration")?;
        ensure!(self.log_frequency > 0, "log_frequency must be at least 1");
        Ok(())
    }
}

/// Training mode for evolving snake controllers
pub struct TrainMode {
    config: TrainConfig,
    game: Game,
    population: Population,
    topology: Topology,
    stats: TrainingStats,
    rng: ChaCha8Rng,
    /// Fittest individual across all generations
    best: Option<Individual>,
    seed: u64,
}

impl TrainMode {
    /// Create a training run with a random initial population
    ///
    /// The run is seeded from `config.game.seed`, or from entropy if unset.
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.game.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let topology = Snake::topology(&config.snake, &config.network)
            .context("Failed to build controller topology")?;
        let population =
            Population::random(config.genetic.population_size(), &topology, &mut rng)
                .context("Failed to initialize population")?;
        let game = Game::new(&config.game).context("Failed to create game")?;

        Ok(Self {
            config,
            game,
            population,
            topology,
            stats: TrainingStats::new(STATS_WINDOW),
            rng,
            best: None,
            seed,
        })
    }

    /// Run every generation and save the best genome
    pub fn run(&mut self) -> Result<()> {
        self.print_header();
        let num_generations = self.config.genetic.num_generations;

        for generation in 0..num_generations {
            let record = self.run_generation(generation)?;

            if (generation + 1) % self.config.log_frequency == 0 || generation + 1 == num_generations
            {
                info!(
                    generation,
                    best_fitness = record.best_fitness,
                    mean_fitness = record.mean_fitness,
                    best_score = record.best_score,
                    best_lifespan = record.best_lifespan,
                    "generation evaluated"
                );
            }

            if generation + 1 < num_generations {
                self.population
                    .next_generation(&self.config.genetic, generation, &mut self.rng)
                    .with_context(|| format!("Failed to breed generation {}", generation + 1))?;
            }
        }

        if let Some(path) = &self.config.save_path {
            let genome = self.best_genome().context("No individual was evaluated")?;
            save_genome(path, &genome)
                .with_context(|| format!("Failed to save best genome to {:?}", path))?;
            println!("Best genome saved to: {:?}", path);
        }

        println!("\nTraining complete!");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Evaluate the current population and record its statistics
    pub fn run_generation(&mut self, generation: usize) -> Result<GenerationRecord> {
        self.evaluate_population()
            .with_context(|| format!("Failed to evaluate generation {generation}"))?;

        let record = GenerationRecord::from_population(generation, &self.population)
            .context("Population has no evaluated individuals")?;
        if record.best_fitness == record.mean_fitness && self.population.len() > 1 {
            warn!(generation, "every individual reached the same fitness");
        }
        self.stats.record_generation(record);

        if let Some(fittest) = self.population.fittest() {
            let improved = match (&self.best, fittest.fitness()) {
                (Some(best), Some(fitness)) => best.fitness().is_none_or(|top| fitness > top),
                (None, _) => true,
                (Some(_), None) => false,
            };
            if improved {
                self.best = Some(fittest.clone());
            }
        }
        Ok(record)
    }

    /// Play one episode per individual, in population order
    fn evaluate_population(&mut self) -> Result<()> {
        let Self {
            config,
            game,
            population,
            topology,
            rng,
            ..
        } = self;

        for (idx, individual) in population.individuals_mut().iter_mut().enumerate() {
            let snake = Snake::from_chromosome(
                &config.snake,
                topology,
                individual.chromosome(),
                game.grid(),
            )?;
            let finished = game.play_episode(snake, rng)?;
            *individual = Individual::from_snake(&finished)
                .with_context(|| format!("Individual {idx} finished without a fitness"))?;

            debug!(
                idx,
                fitness = ?individual.fitness(),
                score = finished.score(),
                "individual evaluated"
            );
        }
        Ok(())
    }

    /// The best individual so far, packaged for persistence
    pub fn best_genome(&self) -> Option<SavedGenome> {
        let best = self.best.as_ref()?;
        let eval = best.evaluation()?;
        Some(SavedGenome::new(
            self.config.game.clone(),
            self.config.snake.clone(),
            self.topology.clone(),
            best.chromosome().clone(),
            eval.fitness,
            eval.score,
        ))
    }

    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Seed the run's random source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Print training header information
    fn print_header(&self) {
        let genetic = &self.config.genetic;
        println!("{}", "=".repeat(70));
        println!("Genetic Training - Evo Snake");
        println!("{}", "=".repeat(70));
        println!("Generations: {}", genetic.num_generations);
        println!(
            "Population: {} parents + {} offspring",
            genetic.num_parents, genetic.num_offspring
        );
        println!(
            "Game Config: {}x{} grid, seed {}",
            self.config.game.grid_width, self.config.game.grid_height, self.seed
        );
        println!("Network: {:?}", self.topology.layer_sizes);
        println!("Genetic Config:");
        println!("  SBX eta: {}", genetic.eta_sbx);
        println!("  SBX probability: {}", genetic.probability_sbx);
        println!(
            "  Mutation: {:?} at {} ({:?})",
            genetic.mutation_type, genetic.mutation_rate, genetic.mutation_rate_type
        );
        println!("Logging: Every {} generations", self.config.log_frequency);
        if let Some(path) = &self.config.save_path {
            println!("Save path: {:?}", path);
        }
        println!("{}", "=".repeat(70));
        println!();
    }
}
