use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{FoodPlacement, GameConfig};
use grid_snake::modes::PlayMode;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic grid snake in the terminal")]
struct Cli {
    /// JSON file holding a game configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the square grid
    #[arg(long)]
    grid_cells: Option<usize>,

    /// Cell size in field units
    #[arg(long)]
    cell_size: Option<u32>,

    /// Milliseconds between simulation ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Never place food under the snake
    #[arg(long)]
    avoid_snake: bool,

    /// Write logs here (filtered by RUST_LOG); discarded otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_cells) = self.grid_cells {
            config.grid_cells = grid_cells;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.rng_seed = self.seed;
        }
        if self.avoid_snake {
            config.food_placement = FoodPlacement::AvoidSnake;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

// The TUI owns the terminal, so logs only go to a file.
fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(anyhow::Error::from_boxed)
                .context("Failed to install tracing subscriber")?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .try_init()
                .map_err(anyhow::Error::from_boxed)
                .context("Failed to install tracing subscriber")?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let config = cli.game_config()?;
    tracing::info!(?config, "configuration resolved");

    let mut play_mode = PlayMode::new(config);
    play_mode.run().await?;

    Ok(())
}
