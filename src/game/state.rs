use super::action::Direction;
use super::config::{GameConfig, WallMode};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Fold the position back onto a `width` x `height` torus, so that `-1`
    /// lands on the far edge and `width` lands on `0`.
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Heading used on the next tick; `None` until the snake starts moving
    pub direction: Option<Direction>,
}

impl Snake {
    /// Lay out a resting snake whose tail trails away from `facing`.
    pub fn new(head: Position, facing: Direction, length: usize) -> Self {
        let (dx, dy) = facing.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self {
            body,
            direction: None,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn is_moving(&self) -> bool {
        self.direction.is_some()
    }

    /// Put `new_head` in front, dropping the tail unless the snake grows.
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a hard wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell left to place food on
    BoardFull,
}

/// Score, pace and wall policy of one play-through.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub score: u32,
    /// Milliseconds between ticks; only ever shrinks during play
    pub interval_ms: u64,
    pub min_interval_ms: u64,
    pub interval_step_ms: u64,
    pub food_score: u32,
    pub wall_mode: WallMode,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            interval_ms: config.initial_interval_ms,
            min_interval_ms: config.min_interval_ms,
            interval_step_ms: config.interval_step_ms,
            food_score: config.food_score,
            wall_mode: config.wall_mode,
        }
    }

    /// Step the interval toward the floor. Returns true if it changed.
    pub fn speed_up(&mut self) -> bool {
        if self.interval_ms <= self.min_interval_ms {
            return false;
        }
        let next = self
            .interval_ms
            .saturating_sub(self.interval_step_ms)
            .max(self.min_interval_ms);
        let changed = next != self.interval_ms;
        self.interval_ms = next;
        changed
    }

    pub fn moves_per_second(&self) -> f64 {
        moves_per_second(self.interval_ms)
    }
}

/// Ticks per second for an interval, rounded to one decimal place.
pub fn moves_per_second(interval_ms: u64) -> f64 {
    (10_000.0 / interval_ms.max(1) as f64).round() / 10.0
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub session: GameSession,
    pub steps: u32,
    pub is_alive: bool,
    /// Set once the session has ended
    pub end_cause: Option<CollisionType>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        session: GameSession,
    ) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            session,
            steps: 0,
            is_alive: true,
            end_cause: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn interval_ms(&self) -> u64 {
        self.session.interval_ms
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }
}
