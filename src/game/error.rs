use std::path::PathBuf;

use thiserror::Error;

/// Reasons a [`GameConfig`](super::GameConfig) cannot be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least {min} cells per side, got {got}")]
    GridTooSmall { min: usize, got: usize },

    #[error("grid must be at most {max} cells per side, got {got}")]
    GridTooLarge { max: usize, got: usize },

    #[error("initial snake length {length} must be between 3 and {max}")]
    InitialLength { length: usize, max: usize },

    #[error("spawn anchor ({x}, {y}) is outside a {cells}x{cells} grid")]
    AnchorOutOfBounds { x: i32, y: i32, cells: usize },

    #[error("cell size must be non-zero")]
    ZeroCellSize,

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
