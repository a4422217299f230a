//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The per-tick transition lives in [`TickEngine::advance`]; everything else here is
//! plain data.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, resolve_turn};
pub use config::{GameConfig, WallMode};
pub use engine::{GameSummary, StepInfo, TickEngine, TickResult};
pub use state::{CollisionType, GameSession, GameState, Position, Snake, moves_per_second};
