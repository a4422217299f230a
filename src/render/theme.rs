use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Colour scheme selectable from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(0x24, 0x24, 0x24),
                grid: Color::Rgb(0x33, 0x33, 0x33),
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Yellow,
                snake_head: Color::Rgb(0x66, 0xBB, 0x6A),
                snake_body: Color::Rgb(0x4C, 0xAF, 0x50),
                food: Color::Rgb(0xFF, 0x52, 0x52),
                overlay: Color::Rgb(0x28, 0x28, 0x28),
            },
            Theme::Light => Palette {
                background: Color::Rgb(0xF0, 0xF0, 0xF0),
                grid: Color::Rgb(0xD8, 0xD8, 0xD8),
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                snake_head: Color::Rgb(0x38, 0x8E, 0x3C),
                snake_body: Color::Rgb(0x4C, 0xAF, 0x50),
                food: Color::Rgb(0xD3, 0x2F, 0x2F),
                overlay: Color::Rgb(0xFF, 0xFF, 0xFF),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub overlay: Color,
}
