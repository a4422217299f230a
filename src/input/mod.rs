pub mod gesture;
pub mod handler;

pub use gesture::GestureTracker;
pub use handler::{InputHandler, KeyAction};
