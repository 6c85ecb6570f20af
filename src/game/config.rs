use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::state::Position;

/// Smallest grid that still fits the default spawn layout
pub const MIN_GRID_CELLS: usize = 4;

/// Largest accepted grid; its cell count fits an allocation and an `i32`
pub const MAX_GRID_CELLS: usize = 1024;

/// Where freshly sampled food is allowed to land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPlacement {
    /// Any cell of the grid, including cells under the snake
    #[default]
    Anywhere,
    /// Only cells the snake does not occupy
    AvoidSnake,
}

/// Configuration shared by the simulation and the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells per side of the square grid
    pub grid_cells: usize,
    /// Size of one cell in field units
    pub cell_size: u32,
    /// Length of the snake at the start of a round
    pub initial_snake_length: usize,
    /// Head cell at spawn; the body trails off towards negative x
    pub spawn_head: Position,
    /// Period between simulation ticks
    pub tick_interval_ms: u64,
    pub food_placement: FoodPlacement,
    /// Seed for food placement; `None` draws one from the OS
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_cells: 20,
            cell_size: 16,
            initial_snake_length: 3,
            spawn_head: Position::new(3, 3),
            tick_interval_ms: 250,
            food_placement: FoodPlacement::Anywhere,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_cells: usize) -> Self {
        Self {
            grid_cells,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Read a JSON-serialized config; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cells < MIN_GRID_CELLS {
            return Err(ConfigError::GridTooSmall {
                min: MIN_GRID_CELLS,
                got: self.grid_cells,
            });
        }
        if self.grid_cells > MAX_GRID_CELLS {
            return Err(ConfigError::GridTooLarge {
                max: MAX_GRID_CELLS,
                got: self.grid_cells,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        let head = self.spawn_head;
        if !self.contains(head) {
            return Err(ConfigError::AnchorOutOfBounds {
                x: head.x,
                y: head.y,
                cells: self.grid_cells,
            });
        }

        // The tail must stay on the grid and leave room to grow.
        let max = (head.x as usize + 1).min(self.total_cells() - 1);
        if self.initial_snake_length < 3 || self.initial_snake_length > max {
            return Err(ConfigError::InitialLength {
                length: self.initial_snake_length,
                max,
            });
        }

        Ok(())
    }

    /// Number of cells on the grid, which is also the longest possible snake
    pub fn total_cells(&self) -> usize {
        self.grid_cells.saturating_mul(self.grid_cells)
    }

    /// Width and height of the playing field in units
    pub fn field_size(&self) -> u32 {
        u32::try_from(self.grid_cells)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.cell_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        let cells = self.grid_cells as i32;
        (0..cells).contains(&pos.x) && (0..cells).contains(&pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_cells, 20);
        assert_eq!(config.cell_size, 16);
        assert_eq!(config.field_size(), 320);
        assert_eq!(config.total_cells(), 400);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.food_placement, FoodPlacement::Anywhere);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.grid_cells, 15);
        assert_eq!(config.total_cells(), 225);
    }

    #[test]
    fn test_bounds_checking() {
        let config = GameConfig::default();
        assert!(config.contains(Position::new(0, 0)));
        assert!(config.contains(Position::new(19, 19)));
        assert!(!config.contains(Position::new(-1, 0)));
        assert!(!config.contains(Position::new(0, -1)));
        assert!(!config.contains(Position::new(20, 0)));
        assert!(!config.contains(Position::new(0, 20)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let tiny = GameConfig::new(2);
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::GridTooSmall { min: 4, got: 2 })
        ));

        let huge = GameConfig::new(1_000_000);
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::GridTooLarge {
                max: MAX_GRID_CELLS,
                got: 1_000_000
            })
        ));

        // would truncate to 21 if converted to i32 first
        let wrapping = GameConfig::new((u32::MAX as usize).saturating_add(21));
        assert!(matches!(
            wrapping.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert_eq!(GameConfig::new(usize::MAX).total_cells(), usize::MAX);

        assert!(GameConfig::new(MAX_GRID_CELLS).validate().is_ok());

        let long = GameConfig {
            initial_snake_length: 5,
            ..Default::default()
        };
        assert!(matches!(
            long.validate(),
            Err(ConfigError::InitialLength { length: 5, max: 4 })
        ));

        let short = GameConfig {
            initial_snake_length: 2,
            ..Default::default()
        };
        assert!(short.validate().is_err());

        let outside = GameConfig {
            spawn_head: Position::new(25, 3),
            ..Default::default()
        };
        assert!(matches!(
            outside.validate(),
            Err(ConfigError::AnchorOutOfBounds { x: 25, .. })
        ));

        let no_cells = GameConfig {
            cell_size: 0,
            ..Default::default()
        };
        assert!(matches!(no_cells.validate(), Err(ConfigError::ZeroCellSize)));

        let no_ticks = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_ticks.validate(),
            Err(ConfigError::ZeroTickInterval)
        ));
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "grid_cells": 12, "food_placement": "avoid_snake", "rng_seed": 7 }}"#
        )
        .unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid_cells, 12);
        assert_eq!(config.food_placement, FoodPlacement::AvoidSnake);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.cell_size, 16);
    }

    #[test]
    fn test_load_errors() {
        let missing = GameConfig::from_json_file("/definitely/not/here.json");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let garbled = GameConfig::from_json_file(file.path());
        assert!(matches!(garbled, Err(ConfigError::Parse { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_cells": 1 }}"#).unwrap();
        let invalid = GameConfig::from_json_file(file.path());
        assert!(matches!(invalid, Err(ConfigError::GridTooSmall { .. })));
    }
}
