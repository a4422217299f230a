use anyhow::Result;
use log::{debug, info};
use std::time::Duration;

use super::scheduler::TickScheduler;
use crate::game::{
    Direction, GameConfig, GameState, GameSummary, TickEngine, TickResult, resolve_turn,
};

/// Which screen the player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the player to start; no timer
    Start,
    Running,
    /// Timer stopped, state frozen
    Paused,
    /// Terminal until restarted
    GameOver,
}

/// Owns the game state, the pending-direction slot and the tick timer, and
/// gates when the engine is allowed to run.
///
/// Every transition method returns whether it was accepted; anything not
/// valid for the current screen is ignored.
pub struct SessionMachine {
    state: SessionState,
    engine: TickEngine,
    game: GameState,
    pending_direction: Option<Direction>,
    scheduler: TickScheduler,
    last_summary: Option<GameSummary>,
}

impl SessionMachine {
    pub fn new(mut engine: TickEngine) -> Self {
        let game = engine.reset();

        Self {
            state: SessionState::Start,
            engine,
            game,
            pending_direction: None,
            scheduler: TickScheduler::new(),
            last_summary: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Summary of the most recent finished session.
    pub fn last_summary(&self) -> Option<&GameSummary> {
        self.last_summary.as_ref()
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    /// Store configuration for the next (re)start. A session in progress is
    /// left untouched; an invalid configuration is returned as an error and
    /// the previous one stays in effect.
    pub fn apply_config(&mut self, config: GameConfig) -> Result<()> {
        self.engine.set_config(config)?;
        if self.state == SessionState::Start {
            self.game = self.engine.reset();
        }
        Ok(())
    }

    pub fn start(&mut self) -> bool {
        if self.state != SessionState::Start {
            return false;
        }
        self.begin();
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.scheduler.stop();
        self.state = SessionState::Paused;
        info!("paused at score {}", self.game.score());
        true
    }

    /// Resume at the current interval; speed is not reset.
    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.scheduler.start(self.interval());
        self.state = SessionState::Running;
        info!("resumed at {}ms", self.game.interval_ms());
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            _ => false,
        }
    }

    /// Throw the current session away and begin a fresh one from the latest
    /// configuration.
    pub fn restart(&mut self) -> bool {
        self.scheduler.stop();
        self.begin();
        true
    }

    /// Queue a direction for the next tick.
    ///
    /// Ignored unless running. A request opposite to the heading the snake
    /// last moved in is dropped, so two quick turns within one tick cannot
    /// fold the snake back onto itself.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.state != SessionState::Running {
            debug!("ignoring {:?} while {:?}", direction, self.state);
            return false;
        }
        let accepted = resolve_turn(self.game.snake.direction, direction);
        if accepted != direction {
            debug!("rejected reversal to {:?}", direction);
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Run one engine tick. Returns `None` when the current screen does not
    /// allow ticking.
    pub fn on_tick(&mut self) -> Option<TickResult> {
        if self.state != SessionState::Running {
            return None;
        }

        let result = self
            .engine
            .advance(&mut self.game, self.pending_direction.take());

        match result {
            TickResult::GameOver(summary) => {
                self.scheduler.stop();
                self.state = SessionState::GameOver;
                self.last_summary = Some(summary);
                info!(
                    "game over ({:?}): score={} speed={}/s length={}",
                    summary.cause,
                    summary.score,
                    summary.moves_per_second(),
                    summary.length
                );
            }
            TickResult::Advanced(step) if step.interval_changed => {
                self.scheduler.reschedule(self.interval());
            }
            TickResult::Advanced(_) | TickResult::Idle => {}
        }

        Some(result)
    }

    /// Wait for the timer. Pending forever unless running.
    pub async fn next_tick(&mut self) {
        self.scheduler.tick().await;
    }

    fn begin(&mut self) {
        self.game = self.engine.reset();
        self.game.snake.direction = Some(Direction::Right);
        self.pending_direction = None;
        self.scheduler.start(self.interval());
        self.state = SessionState::Running;
        info!(
            "session started: {}x{} {:?} walls, {}ms",
            self.game.grid_width,
            self.game.grid_height,
            self.game.session.wall_mode,
            self.game.interval_ms()
        );
    }

    fn interval(&self) -> Duration {
        Duration::from_millis(self.game.interval_ms())
    }
}
