use super::{
    action::{Direction, resolve_turn},
    config::{GameConfig, WallMode},
    state::{CollisionType, GameSession, GameState, Position, Snake},
};
use anyhow::{Context, Result};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// What happened during a tick that kept the game going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether eating shortened the tick interval
    pub interval_changed: bool,
}

/// Final numbers reported when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub interval_ms: u64,
    pub length: usize,
    pub cause: CollisionType,
}

impl GameSummary {
    /// Whole moves per second at the final interval.
    pub fn moves_per_second(&self) -> u64 {
        1000 / self.interval_ms.max(1)
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The snake has no heading yet; nothing moved
    Idle,
    Advanced(StepInfo),
    GameOver(GameSummary),
}

impl TickResult {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TickResult::GameOver(_))
    }
}

/// Pure per-tick state transition: movement, walls, self-collision, food and
/// the speed ramp. Owns only the RNG used to place food.
pub struct TickEngine {
    config: GameConfig,
    rng: StdRng,
}

impl TickEngine {
    /// Fails if `config` cannot produce a playable session.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Deterministic food placement, for tests and replays.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Replace the configuration used by the next `reset`. An invalid
    /// configuration is rejected and the previous one kept.
    pub fn set_config(&mut self, config: GameConfig) -> Result<()> {
        config.validate().context("Invalid game configuration")?;
        self.config = config;
        Ok(())
    }

    /// Build a fresh, not yet moving session from the current configuration.
    ///
    /// The snake is centred with its tail trailing to the left.
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self
            .spawn_food_avoid_snake(&snake, self.config.grid_width, self.config.grid_height)
            .unwrap_or(Position::new(0, 0));

        GameState::new(
            snake,
            food,
            self.config.grid_width,
            self.config.grid_height,
            GameSession::new(&self.config),
        )
    }

    /// Advance the game by one tick.
    ///
    /// `pending` is the latest direction requested since the previous tick;
    /// a reversal of a moving snake is ignored.
    pub fn advance(&mut self, state: &mut GameState, pending: Option<Direction>) -> TickResult {
        if !state.is_alive {
            let cause = state.end_cause.unwrap_or(CollisionType::Wall);
            return TickResult::GameOver(summary(state, cause));
        }

        if let Some(requested) = pending {
            state.snake.direction = Some(resolve_turn(state.snake.direction, requested));
        }

        let Some(direction) = state.snake.direction else {
            return TickResult::Idle;
        };

        let mut new_head = state.snake.head().moved_in_direction(direction);

        match state.session.wall_mode {
            WallMode::Hard if !state.is_in_bounds(new_head) => {
                return self.end(state, CollisionType::Wall);
            }
            WallMode::Hard => {}
            WallMode::Wrap => new_head = new_head.wrapped(state.grid_width, state.grid_height),
        }

        // Checked after wrapping: crossing an edge does not grant immunity.
        if state.snake.collides_with_body(new_head) {
            return self.end(state, CollisionType::SelfCollision);
        }

        let ate_food = new_head == state.food;
        state.snake.advance_to(new_head, ate_food);
        state.steps += 1;

        let mut interval_changed = false;
        if ate_food {
            state.session.score += state.session.food_score;
            interval_changed = state.session.speed_up();

            match self.spawn_food_avoid_snake(&state.snake, state.grid_width, state.grid_height) {
                Some(food) => state.food = food,
                None => return self.end(state, CollisionType::BoardFull),
            }
            debug!(
                "food eaten: score={} interval={}ms length={}",
                state.session.score,
                state.session.interval_ms,
                state.snake.len()
            );
        }

        TickResult::Advanced(StepInfo {
            ate_food,
            interval_changed,
        })
    }

    fn end(&self, state: &mut GameState, cause: CollisionType) -> TickResult {
        state.is_alive = false;
        state.end_cause = Some(cause);
        TickResult::GameOver(summary(state, cause))
    }

    /// Rejection-sample a free cell. `None` when the snake fills the grid.
    fn spawn_food_avoid_snake(
        &mut self,
        snake: &Snake,
        width: usize,
        height: usize,
    ) -> Option<Position> {
        if snake.len() >= width * height {
            return None;
        }
        loop {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}

fn summary(state: &GameState, cause: CollisionType) -> GameSummary {
    GameSummary {
        score: state.session.score,
        interval_ms: state.session.interval_ms,
        length: state.snake.len(),
        cause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(wall_mode: WallMode, head: Position, food: Position) -> (TickEngine, GameState) {
        let config = GameConfig::small().with_wall_mode(wall_mode);
        let mut snake = Snake::new(head, Direction::Right, 3);
        snake.direction = Some(Direction::Right);
        let state = GameState::new(snake, food, 10, 10, GameSession::new(&config));
        (TickEngine::with_seed(config, 7).unwrap(), state)
    }

    #[test]
    fn test_reset() {
        let mut engine = TickEngine::with_seed(GameConfig::default(), 1).unwrap();
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score(), 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.snake.direction, None);
        assert_eq!(state.interval_ms(), 250);
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_idle_snake_does_not_move() {
        let mut engine = TickEngine::with_seed(GameConfig::small(), 1).unwrap();
        let mut state = engine.reset();
        let before = state.clone();

        assert_eq!(engine.advance(&mut state, None), TickResult::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let (mut engine, mut state) =
            scenario(WallMode::Wrap, Position::new(5, 5), Position::new(6, 5));

        let result = engine.advance(&mut state, None);

        assert_eq!(
            result,
            TickResult::Advanced(StepInfo {
                ate_food: true,
                interval_changed: true
            })
        );
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5)
            ]
        );
        assert_eq!(state.score(), 10);
        assert_eq!(state.interval_ms(), 249);
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let (mut engine, mut state) =
            scenario(WallMode::Wrap, Position::new(5, 5), Position::new(0, 0));

        let result = engine.advance(&mut state, None);

        assert!(!result.is_game_over());
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(6, 5));
        assert_eq!(state.score(), 0);
        assert_eq!(state.food, Position::new(0, 0));
    }

    #[test]
    fn test_wrap_mode_crosses_edges() {
        let (mut engine, mut state) =
            scenario(WallMode::Wrap, Position::new(9, 5), Position::new(0, 0));
        engine.advance(&mut state, None);
        assert_eq!(state.snake.head(), Position::new(0, 5));

        engine.advance(&mut state, Some(Direction::Up));
        for _ in 0..5 {
            engine.advance(&mut state, None);
        }
        assert_eq!(state.snake.head(), Position::new(0, 9));
        assert!(state.is_alive);
    }

    #[test]
    fn test_hard_wall_ends_game() {
        let (mut engine, mut state) =
            scenario(WallMode::Hard, Position::new(9, 5), Position::new(0, 0));

        let result = engine.advance(&mut state, None);

        assert_eq!(
            result,
            TickResult::GameOver(GameSummary {
                score: 0,
                interval_ms: 250,
                length: 3,
                cause: CollisionType::Wall,
            })
        );
        assert!(!state.is_alive);
    }

    #[test]
    fn test_hard_wall_beats_food_on_wrapped_cell() {
        let (mut engine, mut state) =
            scenario(WallMode::Hard, Position::new(9, 5), Position::new(0, 5));

        assert!(engine.advance(&mut state, None).is_game_over());
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_self_collision() {
        let config = GameConfig::small();
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        snake.direction = Some(Direction::Right);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10, GameSession::new(&config));
        let mut engine = TickEngine::with_seed(config, 3).unwrap();

        engine.advance(&mut state, Some(Direction::Down));
        engine.advance(&mut state, Some(Direction::Left));
        let result = engine.advance(&mut state, Some(Direction::Up));

        match result {
            TickResult::GameOver(summary) => {
                assert_eq!(summary.cause, CollisionType::SelfCollision);
                assert_eq!(summary.length, 5);
            }
            other => panic!("expected game over, got {:?}", other),
        }
    }

    #[test]
    fn test_self_collision_after_wrapping() {
        let config = GameConfig::new(4, 4);
        // Head at the right edge, tail wrapped around onto column 0.
        let snake = Snake {
            body: vec![
                Position::new(3, 1),
                Position::new(3, 2),
                Position::new(0, 2),
                Position::new(0, 1),
                Position::new(1, 1),
            ],
            direction: Some(Direction::Up),
        };
        let mut state = GameState::new(snake, Position::new(2, 3), 4, 4, GameSession::new(&config));
        let mut engine = TickEngine::with_seed(config, 3).unwrap();

        let result = engine.advance(&mut state, Some(Direction::Right));

        assert!(matches!(
            result,
            TickResult::GameOver(GameSummary {
                cause: CollisionType::SelfCollision,
                ..
            })
        ));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let (mut engine, mut state) =
            scenario(WallMode::Wrap, Position::new(5, 5), Position::new(0, 0));

        let result = engine.advance(&mut state, Some(Direction::Left));

        assert!(!result.is_game_over());
        assert_eq!(state.snake.direction, Some(Direction::Right));
        assert_eq!(state.snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_interval_never_increases() {
        let config = GameConfig {
            initial_interval_ms: 125,
            ..GameConfig::small()
        };
        let mut engine = TickEngine::with_seed(config, 11).unwrap();
        let mut state = engine.reset();
        state.snake.direction = Some(Direction::Right);

        let mut last = state.interval_ms();
        for _ in 0..6 {
            state.food = state
                .snake
                .head()
                .moved_in_direction(Direction::Right)
                .wrapped(10, 10);
            assert!(!engine.advance(&mut state, None).is_game_over());
            assert!(state.interval_ms() <= last);
            assert!(state.interval_ms() >= 120);
            last = state.interval_ms();
        }
        assert_eq!(last, 120);
    }

    #[test]
    fn test_full_board_ends_game() {
        let config = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::new(2, 2)
        };
        let snake = Snake {
            body: vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 1)],
            direction: Some(Direction::Right),
        };
        let mut state = GameState::new(snake, Position::new(1, 0), 2, 2, GameSession::new(&config));
        let mut engine = TickEngine::with_seed(config, 5).unwrap();

        let result = engine.advance(&mut state, None);

        assert!(matches!(
            result,
            TickResult::GameOver(GameSummary {
                cause: CollisionType::BoardFull,
                length: 4,
                score: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let (mut engine, mut state) =
            scenario(WallMode::Wrap, Position::new(5, 5), Position::new(0, 0));
        state.is_alive = false;
        let before = state.clone();

        assert!(engine.advance(&mut state, None).is_game_over());
        assert_eq!(state, before);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let zero_interval = GameConfig {
            initial_interval_ms: 0,
            min_interval_ms: 0,
            ..GameConfig::small()
        };
        assert!(TickEngine::new(zero_interval).is_err());
        assert!(TickEngine::with_seed(GameConfig::new(0, 10), 1).is_err());
        assert!(TickEngine::with_seed(GameConfig::new(10, 1), 1).is_err());

        let mut engine = TickEngine::with_seed(GameConfig::small(), 1).unwrap();
        assert!(engine.set_config(GameConfig::new(0, 0)).is_err());
        assert_eq!(engine.config(), &GameConfig::small());
    }

    #[test]
    fn test_summary_speed_is_floored() {
        let summary = GameSummary {
            score: 0,
            interval_ms: 120,
            length: 3,
            cause: CollisionType::Wall,
        };
        assert_eq!(summary.moves_per_second(), 8);
    }
}
