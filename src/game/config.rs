use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Tick interval a new session starts at, in milliseconds.
pub const INITIAL_INTERVAL_MS: u64 = 250;
/// Fastest the game will ever get.
pub const MIN_INTERVAL_MS: u64 = 120;
/// How much each piece of food shortens the interval.
pub const INTERVAL_STEP_MS: u64 = 1;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FOOD_SCORE: u32 = 10;

/// What happens when the head crosses the edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallMode {
    /// Reappear on the opposite edge.
    #[default]
    Wrap,
    /// Crossing the edge ends the game.
    Hard,
}

impl WallMode {
    pub fn from_hard_walls(hard_walls: bool) -> Self {
        if hard_walls {
            WallMode::Hard
        } else {
            WallMode::Wrap
        }
    }

    pub fn is_hard(self) -> bool {
        self == WallMode::Hard
    }
}

/// Configuration for the game
///
/// Consulted only when a session is (re)started; changing it never affects
/// a session that is already running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Milliseconds between ticks at the start of a session
    pub initial_interval_ms: u64,
    /// Floor the interval is clamped to as the snake eats
    pub min_interval_ms: u64,
    /// Interval decrease per food eaten
    pub interval_step_ms: u64,
    /// Points awarded per food
    pub food_score: u32,
    pub wall_mode: WallMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: INITIAL_SNAKE_LENGTH,
            initial_interval_ms: INITIAL_INTERVAL_MS,
            min_interval_ms: MIN_INTERVAL_MS,
            interval_step_ms: INTERVAL_STEP_MS,
            food_score: FOOD_SCORE,
            wall_mode: WallMode::Wrap,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_wall_mode(mut self, wall_mode: WallMode) -> Self {
        self.wall_mode = wall_mode;
        self
    }

    pub fn with_initial_interval(mut self, interval_ms: u64) -> Self {
        self.initial_interval_ms = interval_ms;
        self
    }

    /// Check that a session can actually be built from this configuration.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width >= 2 && self.grid_height >= 2,
            "grid must be at least 2x2, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.initial_snake_length >= 1,
            "initial snake length must be at least 1"
        );
        // The snake is laid out horizontally, ending at the centre column.
        ensure!(
            self.initial_snake_length <= self.grid_width / 2 + 1,
            "a snake of length {} does not fit a grid {} cells wide",
            self.initial_snake_length,
            self.grid_width
        );
        ensure!(
            self.initial_snake_length < self.grid_width * self.grid_height,
            "grid has no room for food"
        );
        ensure!(self.min_interval_ms > 0, "minimum interval must be positive");
        ensure!(
            self.min_interval_ms <= self.initial_interval_ms,
            "minimum interval {}ms exceeds initial interval {}ms",
            self.min_interval_ms,
            self.initial_interval_ms
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_interval_ms, 250);
        assert_eq!(config.min_interval_ms, 120);
        assert_eq!(config.interval_step_ms, 1);
        assert_eq!(config.wall_mode, WallMode::Wrap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12).with_wall_mode(WallMode::Hard);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert!(config.wall_mode.is_hard());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameConfig::new(1, 10).validate().is_err());
        assert!(GameConfig::new(4, 4).validate().is_ok());
        assert!(GameConfig::new(3, 3).validate().is_err());
        assert!(GameConfig::new(2, 1).validate().is_err());

        let inverted = GameConfig {
            min_interval_ms: 300,
            ..GameConfig::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_single_row_or_column_grid_is_rejected() {
        // Wrapping across a one-tile axis would put the head back on itself.
        assert!(GameConfig::new(10, 1).validate().is_err());
        let column = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::new(1, 10)
        };
        assert!(column.validate().is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let zero = GameConfig {
            initial_interval_ms: 0,
            min_interval_ms: 0,
            ..GameConfig::small()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_wall_mode_serializes_snake_case() {
        let json = serde_json::to_string(&WallMode::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        assert_eq!(WallMode::from_hard_walls(false), WallMode::Wrap);
    }
}
