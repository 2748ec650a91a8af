use std::collections::VecDeque;

use rand::Rng;
use tracing::warn;

use super::config::SnakeConfig;
use super::vision::{Vision, VisionEncoder};
use crate::error::{Result, SnakeError};
use crate::game::{Board, Direction, Grid, Item, Position};
use crate::nn::{Brain, Chromosome, NUM_ACTIONS, NetworkConfig, Topology, argmax, decode, encode};

/// How a snake's episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Stepped off the grid or into a wall
    Wall,
    /// Stepped into a body segment
    SelfCollision,
    /// Ran out of moves without eating
    Starvation,
    /// Removed by the environment before dying on its own
    Killed,
}

/// Fitness of a finished episode
///
/// `steps + 2^score + 500·score^2.1`: defined for a score of zero and
/// strictly increasing in score for a fixed number of steps. One apple is
/// worth more than any survival time a single lifespan allows.
pub fn fitness(score: u32, steps: u32) -> f64 {
    let score = f64::from(score);
    f64::from(steps) + 2f64.powf(score) + 500.0 * score.powf(2.1)
}

/// A snake agent: body, heading, controller and lifecycle state
#[derive(Debug, Clone)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Current direction of movement
    direction: Direction,
    /// Moves left before starving
    lifespan: u32,
    max_lifespan: u32,
    score: u32,
    steps: u32,
    death: Option<DeathCause>,
    fitness: Option<f64>,
    brain: Brain,
    chromosome: Chromosome,
    encoder: VisionEncoder,
    vision: Option<Vision>,
}

impl Snake {
    /// Create a snake with its head at `head`, body trailing behind it
    ///
    /// # Returns
    ///
    /// `Err(SnakeError::ShapeMismatch)` if the vision width differs from the
    /// controller's input width or the controller does not have one output
    /// per direction.
    pub fn new(
        config: &SnakeConfig,
        brain: Brain,
        head: Position,
        direction: Direction,
    ) -> Result<Self> {
        let encoder = VisionEncoder::new(config.vision_mode, config.vision_type);
        if encoder.input_len() != brain.input_len() {
            return Err(SnakeError::ShapeMismatch {
                context: "vision features vs network input",
                expected: encoder.input_len(),
                actual: brain.input_len(),
            });
        }
        if brain.output_len() != NUM_ACTIONS {
            return Err(SnakeError::ShapeMismatch {
                context: "network output",
                expected: NUM_ACTIONS,
                actual: brain.output_len(),
            });
        }

        let back = direction.opposite();
        let body = (0..config.initial_length.max(1) as i32)
            .map(|i| {
                let (d_row, d_col) = back.delta();
                head.moved_by(d_row * i, d_col * i)
            })
            .collect();
        let chromosome = encode(&brain)?;

        Ok(Self {
            body,
            direction,
            lifespan: config.max_lifespan,
            max_lifespan: config.max_lifespan,
            score: 0,
            steps: 0,
            death: None,
            fitness: None,
            brain,
            chromosome,
            encoder,
            vision: None,
        })
    }

    /// Create a snake at the grid center, facing right
    pub fn spawn(config: &SnakeConfig, brain: Brain, grid: &Grid) -> Result<Self> {
        let head = Position::new((grid.height() / 2) as i32, (grid.width() / 2) as i32);
        Self::new(config, brain, head, Direction::Right)
    }

    /// Topology of the controller a snake with this configuration uses
    pub fn topology(config: &SnakeConfig, network: &NetworkConfig) -> Result<Topology> {
        let encoder = VisionEncoder::new(config.vision_mode, config.vision_type);
        network.topology(encoder.input_len())
    }

    /// Spawn a snake with a freshly initialized controller
    pub fn random<R: Rng>(
        config: &SnakeConfig,
        network: &NetworkConfig,
        grid: &Grid,
        rng: &mut R,
    ) -> Result<Self> {
        let topology = Self::topology(config, network)?;
        let brain = Brain::random(topology, &crate::nn::default_device(), rng);
        Self::spawn(config, brain, grid)
    }

    /// Spawn a snake whose controller is decoded from a chromosome
    pub fn from_chromosome(
        config: &SnakeConfig,
        topology: &Topology,
        chromosome: &Chromosome,
        grid: &Grid,
    ) -> Result<Self> {
        let brain = decode(chromosome, topology, &crate::nn::default_device())?;
        let mut snake = Self::spawn(config, brain, grid)?;
        snake.chromosome = chromosome.clone();
        Ok(snake)
    }

    /// Refresh the vision for the current pose
    pub fn update(&mut self, grid: &Grid) -> Result<()> {
        let body: Vec<Position> = self.body.iter().copied().collect();
        self.vision = Some(self.encoder.encode(grid, &body, self.direction)?);
        Ok(())
    }

    /// Let the controller pick the heading for the next move
    ///
    /// A reversal on a snake longer than one cell is ignored and the current
    /// heading is kept. Returns the heading in effect afterwards.
    pub fn next_direction(&mut self, grid: &Grid) -> Result<Direction> {
        self.update(grid)?;
        let features = self
            .vision
            .as_ref()
            .map(|vision| vision.features.as_slice())
            .unwrap_or_default();
        let output = self.brain.forward(features)?;
        self.set_direction(Direction::from_index(argmax(&output)));
        Ok(self.direction)
    }

    /// Request a heading; returns false if it was refused as a reversal
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.body.len() > 1 && self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Advance one cell along the current heading
    ///
    /// Checks, in order: wall or off-grid, own body (the tail cell about to
    /// be vacated is free), apple. Every move spends one unit of lifespan.
    ///
    /// # Returns
    ///
    /// Whether the snake is still alive. A dead snake is left untouched.
    pub fn step<R: Rng>(&mut self, board: &mut Board, rng: &mut R) -> Result<bool> {
        if !self.is_alive() {
            return Ok(false);
        }

        self.steps += 1;
        self.lifespan = self.lifespan.saturating_sub(1);

        let new_head = self.head().moved_in_direction(self.direction);
        let grid = board.grid();
        let target = if grid.contains(new_head) {
            grid.get(new_head)?
        } else {
            Item::Wall
        };

        match target {
            Item::Wall => {
                self.die(DeathCause::Wall);
                return Ok(false);
            }
            Item::Body if Some(&new_head) != self.body.back() => {
                self.die(DeathCause::SelfCollision);
                return Ok(false);
            }
            Item::Apple => {
                self.body.push_front(new_head);
                board.advance_body(new_head, None)?;
                self.score += 1;
                self.lifespan = self.max_lifespan;
                match board.replace_apple(new_head, rng) {
                    Ok(_) => {}
                    // The body covers every free cell; play on without an apple.
                    Err(SnakeError::NoSpace) => warn!(length = self.body.len(), "board is full"),
                    Err(err) => return Err(err),
                }
            }
            Item::Body | Item::Empty => {
                let tail = self.body.pop_back();
                self.body.push_front(new_head);
                board.advance_body(new_head, tail)?;
            }
        }

        if self.lifespan == 0 {
            self.die(DeathCause::Starvation);
            return Ok(false);
        }
        Ok(true)
    }

    /// Mark the snake dead without a collision
    pub fn kill(&mut self) {
        if self.is_alive() {
            self.die(DeathCause::Killed);
        }
    }

    fn die(&mut self, cause: DeathCause) {
        self.death = Some(cause);
        self.calculate_fitness();
    }

    /// Compute the terminal fitness; later calls return the stored value
    pub fn calculate_fitness(&mut self) -> f64 {
        *self
            .fitness
            .get_or_insert_with(|| fitness(self.score, self.steps))
    }

    pub fn head(&self) -> Position {
        self.body.front().copied().unwrap_or(Position::new(0, 0))
    }

    /// Body segments, head first
    pub fn body(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Moves left before starving
    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    /// Terminal fitness, available once the snake is dead
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Last vision computed by `update` or `next_direction`
    pub fn vision(&self) -> Option<&Vision> {
        self.vision.as_ref()
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }
}
