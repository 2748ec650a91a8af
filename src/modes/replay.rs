//! Replay mode for watching an evolved controller play headless
//!
//! Loads a genome written by training mode, rebuilds its snake on the grid it
//! was trained on and plays one episode.
//!
//! # Example
//!
//! ```rust,no_run
//! use evo_snake::modes::ReplayMode;
//! use std::path::Path;
//!
//! let mut replay = ReplayMode::new(Path::new("models/best.json"), Some(7))?;
//! let outcome = replay.run()?;
//! println!("score {} after {} steps", outcome.score, outcome.steps);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::info;

use crate::agent::{DeathCause, Snake};
use crate::game::Game;
use crate::nn::{SavedGenome, load_genome};

/// How a replayed episode ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOutcome {
    pub score: u32,
    pub steps: u32,
    pub fitness: f64,
    pub death_cause: Option<DeathCause>,
}

/// Replay mode for a saved genome
pub struct ReplayMode {
    genome: SavedGenome,
    game: Game,
    rng: ChaCha8Rng,
}

impl ReplayMode {
    /// Load a genome from disk
    ///
    /// `seed` overrides the seed stored with the genome's game configuration,
    /// so the same controller can be watched on different apple sequences.
    pub fn new(path: &Path, seed: Option<u64>) -> Result<Self> {
        let genome = load_genome(path)?;
        info!(path = ?path, fitness = genome.fitness, score = genome.score, "genome loaded");
        Self::from_genome(genome, seed)
    }

    pub fn from_genome(genome: SavedGenome, seed: Option<u64>) -> Result<Self> {
        genome.validate()?;
        let seed = seed
            .or(genome.game.seed)
            .unwrap_or_else(rand::random);
        let game = Game::new(&genome.game).context("Failed to create game")?;
        Ok(Self {
            genome,
            game,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn genome(&self) -> &SavedGenome {
        &self.genome
    }

    /// Play one episode with the saved controller
    pub fn run(&mut self) -> Result<ReplayOutcome> {
        let snake = Snake::from_chromosome(
            &self.genome.snake,
            &self.genome.topology,
            &self.genome.chromosome,
            self.game.grid(),
        )
        .context("Failed to rebuild snake from genome")?;

        let finished = self.game.play_episode(snake, &mut self.rng)?;
        let outcome = ReplayOutcome {
            score: finished.score(),
            steps: finished.steps(),
            fitness: finished
                .fitness()
                .context("Replayed snake finished without a fitness")?,
            death_cause: finished.death_cause(),
        };

        info!(
            score = outcome.score,
            steps = outcome.steps,
            fitness = outcome.fitness,
            cause = ?outcome.death_cause,
            "replay finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SnakeConfig;
    use crate::game::GameConfig;
    use crate::nn::{Chromosome, NetworkConfig, save_genome};
    use tempfile::TempDir;

    fn genome() -> SavedGenome {
        let snake = SnakeConfig::default();
        let topology = Snake::topology(&snake, &NetworkConfig::default()).unwrap();
        let chromosome = Chromosome::new(
            (0..topology.num_parameters())
                .map(|i| ((i % 7) as f32 - 3.0) * 0.1)
                .collect(),
        );
        SavedGenome::new(GameConfig::small(), snake, topology, chromosome, 0.0, 0)
    }

    #[test]
    fn test_replay_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("best.json");
        save_genome(&path, &genome()).unwrap();

        let mut replay = ReplayMode::new(&path, Some(5)).unwrap();
        let outcome = replay.run().unwrap();
        assert!(outcome.steps >= 1);
        assert!(outcome.death_cause.is_some());
        assert!(outcome.fitness >= f64::from(outcome.steps));
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let first = ReplayMode::from_genome(genome(), Some(9)).unwrap().run().unwrap();
        let second = ReplayMode::from_genome(genome(), Some(9)).unwrap().run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_inconsistent_genome() {
        let mut genome = genome();
        genome.chromosome = Chromosome::new(vec![0.0; 3]);
        assert!(ReplayMode::from_genome(genome, None).is_err());
    }

    #[test]
    fn test_rejects_snake_through_wall() {
        let mut genome = genome();
        genome.snake.initial_length = 6;
        assert!(ReplayMode::from_genome(genome, Some(1)).is_err());
    }
}
