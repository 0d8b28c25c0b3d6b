mod actions;
mod core;
mod mouse;

pub use actions::EscapeStep;
pub use core::{DrawingState, InputState, StateChanges};
