use std::{path::PathBuf, time::Duration};

use log::LevelFilter;

pub const PROJECT_TITLE: &str = "Degen Hat Snake";
pub const PROJECT_DESCRIPTION: &str = "Hunt for degen hats in this snake game";
pub const DEGEN_TIPS_URL: &str = "https://www.degen.tips";

pub const GRID_SIZE: i16 = 15;
pub const CELL_SIZE: u32 = 15;
pub const GAME_SPEED_MS: u64 = 150;
pub const LIVES_PER_DAY: u32 = 3;

/// Key of the lives record in the local key-value store.
pub const LIVES_KEY: &str = "snakeGameLives";

pub const DEFAULT_STORE_FILE: &str = ".degen_snake_store.json";
pub const DEFAULT_LOG_FILE: &str = "degen_snake.log";

/// Runtime settings. `Default` gives the stock game.
#[derive(Debug, Clone)]
pub struct Config {
    pub grid_size: i16,
    pub cell_size: u32,
    pub tick: Duration,
    pub lives_per_day: u32,
    pub store_path: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// Side length of the square pixel surface.
    pub fn surface_size(&self) -> u32 {
        self.grid_size as u32 * self.cell_size
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_size: GRID_SIZE,
            cell_size: CELL_SIZE,
            tick: Duration::from_millis(GAME_SPEED_MS),
            lives_per_day: LIVES_PER_DAY,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
        }
    }
}
