//! Training statistics tracking for evolution runs
//!
//! This module keeps one record per generation (best and mean fitness, best
//! score and lifespan) plus a rolling window over recent best fitness values.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::genetic::Population;

/// Summary of one evaluated generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Zero-based generation index
    pub generation: usize,

    /// Fitness of the fittest individual
    pub best_fitness: f64,

    /// Mean fitness over the population
    pub mean_fitness: f64,

    /// Highest score reached by any individual
    pub best_score: u32,

    /// Longest episode, in steps
    pub best_lifespan: u32,

    /// Steps taken by all individuals together
    pub total_steps: u64,
}

impl GenerationRecord {
    /// Summarize an evaluated population
    ///
    /// # Returns
    ///
    /// `None` if no individual has been evaluated.
    pub fn from_population(generation: usize, population: &Population) -> Option<Self> {
        let best_fitness = population.fittest()?.fitness()?;
        let mean_fitness = population.mean_fitness()?;
        let evaluations = population
            .individuals()
            .iter()
            .filter_map(|individual| individual.evaluation());

        let mut record = Self {
            generation,
            best_fitness,
            mean_fitness,
            best_score: 0,
            best_lifespan: 0,
            total_steps: 0,
        };
        for eval in evaluations {
            record.best_score = record.best_score.max(eval.score);
            record.best_lifespan = record.best_lifespan.max(eval.lifespan);
            record.total_steps += u64::from(eval.lifespan);
        }
        Some(record)
    }
}

/// Training statistics tracker
///
/// # Example
///
/// ```rust
/// use evo_snake::metrics::{GenerationRecord, TrainingStats};
///
/// let mut stats = TrainingStats::new(10);
/// stats.record_generation(GenerationRecord {
///     generation: 0,
///     best_fitness: 540.0,
///     mean_fitness: 35.5,
///     best_score: 1,
///     best_lifespan: 37,
///     total_steps: 1200,
/// });
///
/// assert_eq!(stats.generations(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Every generation recorded so far
    history: Vec<GenerationRecord>,

    /// Best fitness per generation (rolling window)
    recent_best: VecDeque<f64>,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new tracker
    ///
    /// # Arguments
    ///
    /// * `window_size` - Number of recent generations in the rolling average
    pub fn new(window_size: usize) -> Self {
        Self {
            history: Vec::new(),
            recent_best: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    pub fn record_generation(&mut self, record: GenerationRecord) {
        if self.recent_best.len() >= self.window_size {
            self.recent_best.pop_front();
        }
        if self.window_size > 0 {
            self.recent_best.push_back(record.best_fitness);
        }
        self.history.push(record);
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    pub fn last(&self) -> Option<&GenerationRecord> {
        self.history.last()
    }

    /// Number of generations recorded
    pub fn generations(&self) -> usize {
        self.history.len()
    }

    /// The generation with the highest best fitness, earliest on ties
    pub fn best_generation(&self) -> Option<&GenerationRecord> {
        self.history.iter().fold(None, |best, record| match best {
            Some(top) if top.best_fitness >= record.best_fitness => Some(top),
            _ => Some(record),
        })
    }

    /// Highest score reached in any generation
    pub fn best_score(&self) -> u32 {
        self.history
            .iter()
            .map(|record| record.best_score)
            .max()
            .unwrap_or(0)
    }

    /// Mean of the best fitness over the rolling window
    ///
    /// # Returns
    ///
    /// The average, or 0.0 if nothing has been recorded
    pub fn mean_recent_best_fitness(&self) -> f64 {
        if self.recent_best.is_empty() {
            0.0
        } else {
            self.recent_best.iter().sum::<f64>() / self.recent_best.len() as f64
        }
    }

    /// Steps taken across every recorded generation
    pub fn total_steps(&self) -> u64 {
        self.history.iter().map(|record| record.total_steps).sum()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a summary of the latest generation
    ///
    /// ```text
    /// Gen: 12 | Best: 4120.33 | Mean: 211.08 | Score: 3 | Lifespan: 188 | Best(avg): 3702.10 | Top score: 4
    /// ```
    pub fn format_summary(&self) -> String {
        let Some(last) = self.last() else {
            return "Gen: - | no generations recorded".to_string();
        };
        format!(
            "Gen: {} | Best: {:.2} | Mean: {:.2} | Score: {} | Lifespan: {} | Best(avg): {:.2} | Top score: {}",
            last.generation,
            last.best_fitness,
            last.mean_fitness,
            last.best_score,
            last.best_lifespan,
            self.mean_recent_best_fitness(),
            self.best_score(),
        )
    }
}
