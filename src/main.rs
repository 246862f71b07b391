use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use simplelog::WriteLogger;

use degen_snake::config::{self, Config, PROJECT_TITLE};
use degen_snake::game::SnakeGame;

/// Snake with a daily lives allowance, played in the terminal
#[derive(Parser, Debug)]
#[command(name = "degen-snake")]
#[command(version, about, long_about = None)]
struct Args {
    /// File holding the local key-value store (lives record)
    #[arg(long, default_value = config::DEFAULT_STORE_FILE)]
    store: PathBuf,

    /// Log file; the terminal itself is taken over by the game
    #[arg(long, default_value = config::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Milliseconds between snake moves
    #[arg(long, default_value_t = config::GAME_SPEED_MS)]
    tick_ms: u64,

    /// Games allowed per calendar day
    #[arg(long, default_value_t = config::LIVES_PER_DAY)]
    lives_per_day: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            tick: Duration::from_millis(self.tick_ms),
            lives_per_day: self.lives_per_day,
            store_path: self.store,
            log_file: self.log_file,
            log_level: self.log_level.into(),
            ..Config::default()
        }
    }
}

fn main() -> Result<()> {
    let config = Args::parse().into_config();

    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {:?}", config.log_file))?;
    WriteLogger::init(config.log_level, simplelog::Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("Starting {}", PROJECT_TITLE);

    let mut game = SnakeGame::new(config).context("Failed to set up the game")?;
    game.run().context("Game loop failed")?;

    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_is_parsed_into_config() {
        let args = Args::try_parse_from(["degen-snake", "--log-level", "debug"]).unwrap();
        assert_eq!(args.into_config().log_level, LevelFilter::Debug);

        let args = Args::try_parse_from(["degen-snake"]).unwrap();
        assert_eq!(args.into_config().log_level, LevelFilter::Info);
    }

    #[test]
    fn unknown_log_level_is_a_usage_error() {
        assert!(Args::try_parse_from(["degen-snake", "--log-level", "verbose"]).is_err());
    }
}
