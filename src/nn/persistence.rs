//! Genome persistence for saving and loading evolved controllers
//!
//! A saved genome is a single pretty-printed JSON document holding the flat
//! chromosome, the topology needed to decode it and the configuration of the
//! snake and grid it was evolved for.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Chromosome, Topology};
use crate::agent::SnakeConfig;
use crate::game::GameConfig;

/// An evolved controller together with the metadata needed to replay it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGenome {
    /// Version identifier for compatibility checking
    pub version: String,

    /// Grid the genome was evaluated on
    pub game: GameConfig,

    /// Body and vision settings of the snake
    pub snake: SnakeConfig,

    /// Layer layout used to decode the chromosome
    pub topology: Topology,

    pub chromosome: Chromosome,

    /// Fitness reached in the episode that selected this genome
    pub fitness: f64,

    /// Apples eaten in that episode
    pub score: u32,
}

impl SavedGenome {
    pub fn new(
        game: GameConfig,
        snake: SnakeConfig,
        topology: Topology,
        chromosome: Chromosome,
        fitness: f64,
        score: u32,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            game,
            snake,
            topology,
            chromosome,
            fitness,
            score,
        }
    }

    /// Check that the saved snake fits its grid and that the chromosome
    /// length matches the topology
    pub fn validate(&self) -> Result<()> {
        self.game
            .validate()
            .context("Saved game configuration is invalid")?;
        self.snake
            .validate(&self.game)
            .context("Saved snake does not fit its grid")?;
        self.topology.validate().context("Saved topology is invalid")?;
        let expected = self.topology.num_parameters();
        ensure!(
            self.chromosome.len() == expected,
            "Chromosome has {} genes but the topology needs {}",
            self.chromosome.len(),
            expected
        );
        Ok(())
    }
}

/// Save a genome as JSON
///
/// Creates parent directories if they don't exist.
pub fn save_genome(path: &Path, genome: &SavedGenome) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(genome).context("Failed to serialize genome")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write genome to {:?}", path))?;

    Ok(())
}

/// Load a genome previously written by [`save_genome`]
///
/// # Returns
///
/// The genome, or an error if the file is missing, malformed, or holds a
/// chromosome whose length disagrees with its topology.
pub fn load_genome(path: &Path) -> Result<SavedGenome> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read genome from {:?}", path))?;
    let genome: SavedGenome =
        serde_json::from_str(&json).context("Failed to deserialize genome")?;
    genome
        .validate()
        .with_context(|| format!("Genome in {:?} is inconsistent", path))?;
    Ok(genome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::{Activation, Brain, default_device, encode};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::TempDir;

    fn sample_genome() -> SavedGenome {
        let topology = Topology::new(vec![5, 3, 4], Activation::Relu, Activation::Softmax).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let brain = Brain::random(topology.clone(), &default_device(), &mut rng);
        let chromosome = encode(&brain).unwrap();
        SavedGenome::new(
            GameConfig::small(),
            SnakeConfig::default(),
            topology,
            chromosome,
            1234.5,
            3,
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("best.json");
        let genome = sample_genome();

        save_genome(&path, &genome).unwrap();
        assert!(path.exists());

        let loaded = load_genome(&path).unwrap();
        assert_eq!(loaded, genome);
        assert_eq!(loaded.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_load_rejects_truncated_chromosome() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        let mut genome = sample_genome();
        let mut genes = genome.chromosome.into_genes();
        genes.pop();
        genome.chromosome = Chromosome::new(genes);

        save_genome(&path, &genome).unwrap();
        assert!(load_genome(&path).is_err());
    }

    #[test]
    fn test_load_rejects_snake_longer_than_grid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.json");
        let mut genome = sample_genome();
        genome.snake.initial_length = 6;

        save_genome(&path, &genome).unwrap();
        let err = load_genome(&path).unwrap_err();
        assert!(format!("{err:#}").contains("does not fit"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_genome(&dir.path().join("absent.json")).is_err());
    }
}
