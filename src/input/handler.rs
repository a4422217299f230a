use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    /// Start from the start screen
    Confirm,
    TogglePause,
    Restart,
    ToggleSettings,
    ToggleTheme,
    ToggleWalls,
    Faster,
    Slower,
    FinerGrid,
    CoarserGrid,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => KeyAction::Steer(Direction::Up),
                's' => KeyAction::Steer(Direction::Down),
                'a' => KeyAction::Steer(Direction::Left),
                'd' => KeyAction::Steer(Direction::Right),
                ' ' => KeyAction::TogglePause,
                'r' => KeyAction::Restart,
                'o' => KeyAction::ToggleSettings,
                't' => KeyAction::ToggleTheme,
                'h' => KeyAction::ToggleWalls,
                '+' | '=' => KeyAction::Faster,
                '-' | '_' => KeyAction::Slower,
                ']' => KeyAction::FinerGrid,
                '[' => KeyAction::CoarserGrid,
                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },

            KeyCode::Esc => KeyAction::TogglePause,
            KeyCode::Enter => KeyAction::Confirm,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
