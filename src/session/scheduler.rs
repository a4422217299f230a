use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// The single periodic timer that drives the game.
///
/// Holds at most one [`Interval`]; starting a new one drops (and so cancels)
/// whatever was there before, so pause/resume or speed changes can never
/// stack timers.
#[derive(Debug, Default)]
pub struct TickScheduler {
    timer: Option<Interval>,
    period: Option<Duration>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`, replacing any running timer.
    ///
    /// The first tick fires one full period from now. Must be called from
    /// within a tokio runtime.
    pub fn start(&mut self, period: Duration) {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
        self.period = Some(period);
    }

    pub fn stop(&mut self) {
        self.timer = None;
        self.period = None;
    }

    /// Change the period of a running timer. Does nothing while stopped.
    pub fn reschedule(&mut self, period: Duration) {
        if self.is_active() && self.period != Some(period) {
            self.start(period);
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick. Never resolves while stopped.
    pub async fn tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
