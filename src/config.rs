use std::path::PathBuf;

use clap::Parser;
use simplelog::LevelFilter;

use crate::difficulty::DifficultyPolicy;
use crate::error::ConfigError;

/// The initial snake is three cells long and must fit in the board.
pub const MIN_GRID_SIZE: i32 = 3;

/// Two terminal columns per cell must still fit a `u16` terminal width.
pub const MAX_GRID_SIZE: i32 = 256;

/// Largest side of the pixel surface the board is rasterised into.
pub const MAX_SURFACE_SIZE: i32 = 4096;

pub const DEFAULT_SCORE_KEY: &str = "snakeHighScore";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: i32,
    pub cell_size: i32,
    pub score_key: String,
    pub seed: Option<u64>,
    pub difficulty: DifficultyPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: 15,
            cell_size: 18,
            score_key: DEFAULT_SCORE_KEY.to_string(),
            seed: None,
            difficulty: DifficultyPolicy::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::InvalidGridSize {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
            });
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.cell_size <= 0 {
            return Err(ConfigError::InvalidCellSize {
                size: self.cell_size,
            });
        }
        match self.grid_size.checked_mul(self.cell_size) {
            Some(side) if side <= MAX_SURFACE_SIZE => Ok(()),
            _ => Err(ConfigError::SurfaceTooLarge {
                grid_size: self.grid_size,
                cell_size: self.cell_size,
                max: MAX_SURFACE_SIZE,
            }),
        }
    }

    /// Side length of the drawing surface in pixels. Only meaningful for a
    /// config that passed [`GameConfig::validate`].
    pub fn surface_size(&self) -> i32 {
        self.grid_size.saturating_mul(self.cell_size)
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Number of cells along each side of the board.
    #[arg(long, value_name = "CELLS", default_value_t = 15, allow_negative_numbers = true)]
    pub grid_size: i32,

    /// Pixel size of one cell on the drawing surface.
    #[arg(long, value_name = "PIXELS", default_value_t = 18, allow_negative_numbers = true)]
    pub cell_size: i32,

    /// File the high score is kept in.
    #[arg(long, value_name = "PATH", default_value = ".snake_scores.json")]
    pub scores: PathBuf,

    /// Key the high score is stored under.
    #[arg(long, value_name = "KEY", default_value = DEFAULT_SCORE_KEY)]
    pub score_key: String,

    /// Keep the high score in memory only.
    #[arg(long)]
    pub no_persist: bool,

    /// Seed for food placement, for reproducible games.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game.
    #[arg(long, value_name = "PATH", default_value = "snake.log")]
    pub log_file: PathBuf,

    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let config = GameConfig {
            grid_size: self.grid_size,
            cell_size: self.cell_size,
            score_key: self.score_key.clone(),
            seed: self.seed,
            difficulty: DifficultyPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }
}
