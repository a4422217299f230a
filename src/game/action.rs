/// One of the four directions the snake can travel in.
///
/// A snake that has not started moving has no direction at all, which the
/// engine models as `Option<Direction>::None` rather than a zero vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Grid delta `(dx, dy)`; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Decide which direction the snake takes given its current heading and a
/// requested turn. Reversals of a moving snake are dropped silently.
pub fn resolve_turn(current: Option<Direction>, requested: Direction) -> Direction {
    match current {
        Some(dir) if dir.is_opposite(requested) => dir,
        _ => requested,
    }
}
