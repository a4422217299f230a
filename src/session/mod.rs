//! Screen flow and timing: start, running, paused and game-over, plus the one
//! timer that drives ticks while running.

pub mod machine;
pub mod scheduler;

pub use machine::{SessionMachine, SessionState};
pub use scheduler::TickScheduler;
