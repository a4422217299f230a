//! Player preferences that outlive a session: starting speed, wall policy,
//! grid scale and colour theme.
//!
//! Settings only ever feed the *next* session through [`Settings::game_config`];
//! the running game never reads them.

pub mod persistence;

pub use persistence::{load_settings, save_settings};

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::game::{GameConfig, WallMode, config::INITIAL_INTERVAL_MS};
use crate::render::Theme;

/// Selectable starting intervals; 350ms is the slowest.
pub const SPEED_RANGE_MS: RangeInclusive<u64> = 150..=350;
pub const SPEED_STEP_MS: u64 = 10;

/// Tiles along the shorter side of the play area.
pub const GRID_SCALE_RANGE: RangeInclusive<u16> = 12..=40;
pub const DEFAULT_GRID_SCALE: u16 = 30;

const MIN_GRID_WIDTH: usize = 6;
const MIN_GRID_HEIGHT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub initial_interval_ms: u64,
    pub hard_walls: bool,
    pub grid_scale: u16,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_interval_ms: INITIAL_INTERVAL_MS,
            hard_walls: false,
            grid_scale: DEFAULT_GRID_SCALE,
            theme: Theme::Dark,
        }
    }
}

impl Settings {
    /// Pull every value back into its allowed range.
    pub fn clamped(mut self) -> Self {
        self.initial_interval_ms = self
            .initial_interval_ms
            .clamp(*SPEED_RANGE_MS.start(), *SPEED_RANGE_MS.end());
        self.grid_scale = self
            .grid_scale
            .clamp(*GRID_SCALE_RANGE.start(), *GRID_SCALE_RANGE.end());
        self
    }

    pub fn faster(&mut self) {
        self.initial_interval_ms = self
            .initial_interval_ms
            .saturating_sub(SPEED_STEP_MS)
            .max(*SPEED_RANGE_MS.start());
    }

    pub fn slower(&mut self) {
        self.initial_interval_ms = (self.initial_interval_ms + SPEED_STEP_MS).min(*SPEED_RANGE_MS.end());
    }

    /// More, smaller tiles.
    pub fn finer_grid(&mut self) {
        self.grid_scale = (self.grid_scale + 1).min(*GRID_SCALE_RANGE.end());
    }

    /// Fewer, bigger tiles.
    pub fn coarser_grid(&mut self) {
        self.grid_scale = self
            .grid_scale
            .saturating_sub(1)
            .max(*GRID_SCALE_RANGE.start());
    }

    pub fn toggle_walls(&mut self) {
        self.hard_walls = !self.hard_walls;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn wall_mode(&self) -> WallMode {
        WallMode::from_hard_walls(self.hard_walls)
    }

    /// Zoom level shown in the settings panel, as a percentage.
    pub fn scale_percent(&self) -> u32 {
        (100.0 / self.grid_scale.max(1) as f64).round() as u32
    }

    /// Build the configuration for a session played in an area of
    /// `cells_wide` x `cells_high` terminal cells (one tile per cell).
    pub fn game_config(&self, cells_wide: u16, cells_high: u16) -> GameConfig {
        let (grid_width, grid_height) = fit_grid(cells_wide, cells_high, self.grid_scale);
        GameConfig {
            grid_width,
            grid_height,
            initial_interval_ms: self.initial_interval_ms,
            wall_mode: self.wall_mode(),
            ..GameConfig::default()
        }
    }
}

/// Size the grid so the shorter side holds `scale` tiles and the longer side
/// as many tiles of the same size as fit. Never more tiles than cells.
pub fn fit_grid(cells_wide: u16, cells_high: u16, scale: u16) -> (usize, usize) {
    let width = cells_wide as f64;
    let height = cells_high as f64;
    let tile = width.min(height) / scale.max(1) as f64;

    let (tiles_x, tiles_y) = if tile > 0.0 {
        (
            ((width / tile).floor() as usize).min(cells_wide as usize),
            ((height / tile).floor() as usize).min(cells_high as usize),
        )
    } else {
        (0, 0)
    };

    (tiles_x.max(MIN_GRID_WIDTH), tiles_y.max(MIN_GRID_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.initial_interval_ms, 250);
        assert_eq!(settings.wall_mode(), WallMode::Wrap);
        assert_eq!(settings.grid_scale, 30);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_speed_adjustment_stays_in_range() {
        let mut settings = Settings {
            initial_interval_ms: 160,
            ..Settings::default()
        };
        settings.faster();
        assert_eq!(settings.initial_interval_ms, 150);
        settings.faster();
        assert_eq!(settings.initial_interval_ms, 150);

        settings.initial_interval_ms = 345;
        settings.slower();
        assert_eq!(settings.initial_interval_ms, 350);
    }

    #[test]
    fn test_grid_scale_adjustment_stays_in_range() {
        let mut settings = Settings {
            grid_scale: 40,
            ..Settings::default()
        };
        settings.finer_grid();
        assert_eq!(settings.grid_scale, 40);

        settings.grid_scale = 12;
        settings.coarser_grid();
        assert_eq!(settings.grid_scale, 12);
        assert_eq!(settings.scale_percent(), 8);
    }

    #[test]
    fn test_clamped_fixes_out_of_range_values() {
        let settings = Settings {
            initial_interval_ms: 5,
            grid_scale: 400,
            ..Settings::default()
        }
        .clamped();
        assert_eq!(settings.initial_interval_ms, 150);
        assert_eq!(settings.grid_scale, 40);
    }

    #[test]
    fn test_fit_grid_uses_shorter_side() {
        assert_eq!(fit_grid(100, 60, 30), (50, 30));
        assert_eq!(fit_grid(60, 100, 30), (30, 50));
        // Never more tiles than the terminal has cells.
        assert_eq!(fit_grid(40, 24, 30), (40, 24));
        assert_eq!(fit_grid(0, 0, 30), (6, 4));
    }

    #[test]
    fn test_game_config_carries_preferences() {
        let mut settings = Settings::default();
        settings.toggle_walls();
        settings.slower();

        let config = settings.game_config(100, 60);
        assert_eq!(config.wall_mode, WallMode::Hard);
        assert_eq!(config.initial_interval_ms, 260);
        assert_eq!((config.grid_width, config.grid_height), (50, 30));
        assert_eq!(config.min_interval_ms, 120);
        assert!(config.validate().is_ok());
    }
}
