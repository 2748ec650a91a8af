use serde::{Deserialize, Serialize};

use crate::agent::Snake;
use crate::nn::Chromosome;

/// Outcome of one episode played by an individual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub fitness: f64,
    /// Apples eaten
    pub score: u32,
    /// Steps survived
    pub lifespan: u32,
}

/// A chromosome and, once it has played, its evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    chromosome: Chromosome,
    evaluation: Option<Evaluation>,
}

impl Individual {
    /// An individual that has not played yet
    pub fn new(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            evaluation: None,
        }
    }

    pub fn evaluated(chromosome: Chromosome, evaluation: Evaluation) -> Self {
        Self {
            chromosome,
            evaluation: Some(evaluation),
        }
    }

    /// Turn a finished snake into an evaluated individual
    ///
    /// Returns `None` while the snake is still alive.
    pub fn from_snake(snake: &Snake) -> Option<Self> {
        let fitness = snake.fitness()?;
        Some(Self::evaluated(
            snake.chromosome().clone(),
            Evaluation {
                fitness,
                score: snake.score(),
                lifespan: snake.steps(),
            },
        ))
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn into_chromosome(self) -> Chromosome {
        self.chromosome
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn set_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = Some(evaluation);
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    pub fn fitness(&self) -> Option<f64> {
        self.evaluation.map(|eval| eval.fitness)
    }

    pub fn score(&self) -> Option<u32> {
        self.evaluation.map(|eval| eval.score)
    }

    pub fn lifespan(&self) -> Option<u32> {
        self.evaluation.map(|eval| eval.lifespan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SnakeConfig;
    use crate::game::{Board, GameConfig, Grid};
    use crate::nn::NetworkConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_unevaluated_individual() {
        let individual = Individual::new(Chromosome::new(vec![0.1, 0.2]));
        assert!(!individual.is_evaluated());
        assert_eq!(individual.fitness(), None);
        assert_eq!(individual.chromosome().len(), 2);
    }

    #[test]
    fn test_from_snake() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let config = GameConfig::small();
        let grid = Grid::with_wall_borders(config.grid_height, config.grid_width);
        let mut snake =
            Snake::random(&SnakeConfig::default(), &NetworkConfig::default(), &grid, &mut rng)
                .unwrap();
        assert!(Individual::from_snake(&snake).is_none());

        let mut board = Board::from_grid(grid);
        let body: Vec<_> = snake.body().copied().collect();
        board.place_body(&body).unwrap();
        while snake.step(&mut board, &mut rng).unwrap() {}

        let individual = Individual::from_snake(&snake).unwrap();
        assert_eq!(individual.fitness(), snake.fitness());
        assert_eq!(individual.lifespan(), Some(snake.steps()));
        assert_eq!(individual.chromosome(), snake.chromosome());
    }
}
