use std::io;

/// Rejected game settings. Fatal at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid size must be at least {min}, got {size}")]
    InvalidGridSize { size: i32, min: i32 },
    #[display("grid size must be at most {max}, got {size}")]
    GridTooLarge { size: i32, max: i32 },
    #[display("cell size must be positive, got {size}")]
    InvalidCellSize { size: i32 },
    #[display("a {grid_size}-cell grid at {cell_size} px per cell exceeds {max} px")]
    SurfaceTooLarge {
        grid_size: i32,
        cell_size: i32,
        max: i32,
    },
}

/// Failures of the file-backed score store. These never reach the player:
/// reads fall back to zero and writes are logged.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StoreError {
    #[display("score file I/O failed: {_0}")]
    Io(io::Error),
    #[display("score file is not valid JSON: {_0}")]
    Json(serde_json::Error),
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AppError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("terminal I/O failed: {_0}")]
    Io(io::Error),
    #[display("failed to set up logging: {_0}")]
    Logger(log::SetLoggerError),
}
