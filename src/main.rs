use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use duel_snake::config::AppConfig;
use duel_snake::modes::{TrainMode, WatchMode};
use duel_snake::rl::{FileStore, MemoryStore, QTableStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duel_snake")]
#[command(version, about = "Two snakes learning to chase food with Q-learning")]
struct Cli {
    /// Watch the snakes in the terminal, or train headless
    #[arg(long, default_value = "watch")]
    mode: Mode,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between ticks in watch mode
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Episodes to play in train mode
    #[arg(long)]
    episodes: Option<usize>,

    /// Exploration probability
    #[arg(long)]
    epsilon: Option<f64>,

    /// Learning rate
    #[arg(long)]
    alpha: Option<f64>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f64>,

    /// Directory holding the saved q-tables
    #[arg(long)]
    q_table_dir: Option<PathBuf>,

    /// Keep q-tables in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Log file used in watch mode, where stderr belongs to the TUI
    #[arg(long, default_value = "duel_snake.log")]
    log_file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Render both snakes learning in the terminal
    Watch,
    /// Run episodes back to back without rendering
    Train,
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => AppConfig::load_or_default(Path::new("duel_snake.toml"))?,
        };

        // Command line wins over the file
        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.game.tick_ms = tick_ms;
        }
        if let Some(episodes) = self.episodes {
            config.training.num_episodes = episodes;
        }
        if let Some(epsilon) = self.epsilon {
            config.learning.epsilon = epsilon;
        }
        if let Some(alpha) = self.alpha {
            config.learning.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.learning.gamma = gamma;
        }
        if let Some(dir) = &self.q_table_dir {
            config.persistence.q_table_dir = dir.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn init_tracing(mode: Mode, log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        Mode::Watch => {
            let file = File::create(log_file)
                .with_context(|| format!("Failed to create log file {:?}", log_file))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Mode::Train => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

async fn dispatch<S: QTableStore>(cli: &Cli, config: AppConfig, store: S) -> Result<()> {
    match cli.mode {
        Mode::Watch => {
            let mut watch_mode = WatchMode::new(config.game, config.learning, store, cli.rng());
            watch_mode.run().await?;
        }
        Mode::Train => {
            let mut train_mode = TrainMode::new(
                config.training,
                config.game,
                config.learning,
                store,
                cli.rng(),
            );
            train_mode.run()?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.mode, &cli.log_file)?;

    let config = cli.app_config()?;

    if cli.ephemeral {
        dispatch(&cli, config, MemoryStore::new()).await
    } else {
        let store = FileStore::new(config.persistence.q_table_dir.clone());
        dispatch(&cli, config, store).await
    }
}
