use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use term_snake::game::GameConfig;
use term_snake::modes::{HumanMode, HumanOptions};
use term_snake::settings::load_settings;

#[derive(Parser)]
#[command(name = "term_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Grid width in tiles (default: fit the terminal)
    #[arg(long, requires = "height")]
    width: Option<usize>,

    /// Grid height in tiles (default: fit the terminal)
    #[arg(long, requires = "width")]
    height: Option<usize>,

    /// Starting tick interval in milliseconds, overriding saved settings
    #[arg(long)]
    speed: Option<u64>,

    /// End the game on hitting the edge instead of wrapping around
    #[arg(long)]
    hard_walls: bool,

    /// Settings file
    #[arg(long, default_value = "snake_settings.json")]
    settings: PathBuf,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "term_snake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("starting term_snake {}", env!("CARGO_PKG_VERSION"));

    let mut settings = load_settings(&cli.settings);
    if let Some(speed) = cli.speed {
        settings.initial_interval_ms = speed;
        settings = settings.clamped();
    }
    if cli.hard_walls {
        settings.hard_walls = true;
    }

    let grid_override = cli.width.zip(cli.height);
    if let Some((width, height)) = grid_override {
        GameConfig::new(width, height)
            .validate()
            .context("Invalid grid size")?;
    }

    let mut human_mode = HumanMode::new(HumanOptions {
        settings,
        settings_path: cli.settings,
        grid_override,
    })?;
    human_mode.run().await?;

    Ok(())
}
