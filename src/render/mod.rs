pub mod renderer;
pub mod theme;

pub use renderer::{Renderer, View};
pub use theme::{Palette, Theme};
