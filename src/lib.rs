//! Term Snake - the classic Snake game in the terminal
//!
//! This library provides:
//! - Core game logic with a pure per-tick transition (game module)
//! - The start / running / paused / game-over flow and its tick timer (session module)
//! - Persisted player preferences (settings module)
//! - Keyboard and mouse-gesture input, ratatui rendering with themes
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
pub mod settings;
