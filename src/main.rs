use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use grid_snake::storage::FileStore;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a square grid with a saved best score")]
struct Cli {
    /// JSON game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells along each side of the grid
    #[arg(long)]
    tile_count: Option<usize>,

    /// File that keeps the best score between sessions
    #[arg(long, default_value = "snake_scores.json")]
    store: PathBuf,

    /// Hide the cell grid lines
    #[arg(long)]
    no_grid: bool,

    /// Shortest mouse drag, in columns, that counts as a swipe
    #[arg(long, default_value = "0")]
    min_swipe: f64,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(tile_count) = cli.tile_count {
        let mut resized = GameConfig::new(tile_count);
        resized.grid_size = config.grid_size;
        resized.food_reward = config.food_reward;
        resized.speed = config.speed.clone();
        resized.show_grid = config.show_grid;
        config = resized;
    }
    if cli.no_grid {
        config.show_grid = false;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = build_config(&cli)?;
    log::debug!("using configuration {:?}", config);

    let store = FileStore::new(&cli.store);
    let mut human_mode = HumanMode::new(config, store, cli.min_swipe);
    human_mode.run().await?;

    Ok(())
}
