//! Pointer gestures: a short tap picks a direction by screen zone, a longer
//! drag is a swipe along its dominant axis.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Drag length, in rows, beyond which a press/release pair counts as a swipe.
pub const SWIPE_THRESHOLD: f32 = 3.0;
/// Terminal cells are roughly twice as tall as they are wide.
const COLUMNS_PER_ROW: f32 = 2.0;

#[derive(Debug, Default)]
pub struct GestureTracker {
    pressed_at: Option<(u16, u16)>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a mouse event; returns a direction once a gesture completes.
    /// `width` and `height` are the screen size in cells.
    pub fn handle_mouse_event(
        &mut self,
        event: MouseEvent,
        width: u16,
        height: u16,
    ) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed_at = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let start = self.pressed_at.take()?;
                classify(start, (event.column, event.row), width, height)
            }
            _ => None,
        }
    }
}

fn classify(start: (u16, u16), end: (u16, u16), width: u16, height: u16) -> Option<Direction> {
    let dx = end.0 as f32 - start.0 as f32;
    let dy = end.1 as f32 - start.1 as f32;

    if dx.abs() < 1.0 && dy.abs() < 1.0 {
        return tap_zone(end.0, end.1, width, height);
    }

    let dx = dx / COLUMNS_PER_ROW;
    if dx.abs() <= SWIPE_THRESHOLD && dy.abs() <= SWIPE_THRESHOLD {
        return None;
    }

    Some(if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    })
}

/// Split the screen into thirds: the middle band of each edge steers toward
/// that edge; corners and the centre do nothing.
fn tap_zone(x: u16, y: u16, width: u16, height: u16) -> Option<Direction> {
    let (x, y) = (x as f32, y as f32);
    let (width, height) = (width as f32, height as f32);

    let left = width * 0.33;
    let right = width * 0.66;
    let top = height * 0.33;
    let bottom = height * 0.66;

    let middle_row = y > top && y < bottom;
    let middle_column = x > left && x < right;

    if x < left && middle_row {
        Some(Direction::Left)
    } else if x > right && middle_row {
        Some(Direction::Right)
    } else if y < top && middle_column {
        Some(Direction::Up)
    } else if y > bottom && middle_column {
        Some(Direction::Down)
    } else {
        None
    }
}
