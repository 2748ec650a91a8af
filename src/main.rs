use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use evo_snake::modes::{ReplayMode, TrainConfig, TrainMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_GENOME_PATH: &str = "models/best_snake.json";

#[derive(Parser)]
#[command(name = "evo_snake")]
#[command(version, about = "Snake agents evolved with a genetic algorithm")]
struct Cli {
    /// What to run
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// JSON training configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations to evolve
    #[arg(long)]
    generations: Option<usize>,

    /// Individuals carried over unchanged each generation
    #[arg(long)]
    parents: Option<usize>,

    /// Children bred each generation
    #[arg(long)]
    offspring: Option<usize>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Seed for the random source
    #[arg(long)]
    seed: Option<u64>,

    /// Where training writes the best genome [default: models/best_snake.json]
    #[arg(long)]
    save_path: Option<PathBuf>,

    /// Genome to replay
    #[arg(long, default_value = DEFAULT_GENOME_PATH)]
    model: PathBuf,

    /// Log progress every N generations
    #[arg(long)]
    log_frequency: Option<usize>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Evolve a population of snakes
    Train,
    /// Play one episode with a saved genome
    Replay,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.mode {
        Mode::Train => {
            let config = train_config(&cli)?;
            let mut train_mode = TrainMode::new(config)?;
            train_mode.run()?;
        }
        Mode::Replay => {
            let mut replay_mode = ReplayMode::new(&cli.model, cli.seed)?;
            let outcome = replay_mode.run()?;
            println!(
                "Score: {} | Steps: {} | Fitness: {:.2} | Death: {:?}",
                outcome.score,
                outcome.steps,
                outcome.fitness,
                outcome.death_cause
            );
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the training configuration from the optional file and CLI flags
fn train_config(cli: &Cli) -> Result<TrainConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse config in {:?}", path))?
        }
        None => TrainConfig::default(),
    };

    if let Some(generations) = cli.generations {
        config.genetic.num_generations = generations;
    }
    if let Some(parents) = cli.parents {
        config.genetic.num_parents = parents;
    }
    if let Some(offspring) = cli.offspring {
        config.genetic.num_offspring = offspring;
    }
    if let Some(width) = cli.width {
        config.game.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.game.grid_height = height;
    }
    if cli.seed.is_some() {
        config.game.seed = cli.seed;
    }
    if let Some(log_frequency) = cli.log_frequency {
        config.log_frequency = log_frequency;
    }
    if let Some(save_path) = &cli.save_path {
        config.save_path = Some(save_path.clone());
    } else if config.save_path.is_none() {
        config.save_path = Some(PathBuf::from(DEFAULT_GENOME_PATH));
    }

    Ok(config)
}
