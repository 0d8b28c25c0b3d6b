//! Input handling and tool state machine.
//!
//! This module translates host keyboard and pointer events into annotation
//! changes. It maintains the active tool, drawing parameters (color, width),
//! the selection, and the drag state machine.

pub mod events;
pub mod modifiers;
pub mod selection;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use selection::Selection;
pub use state::{DrawingState, EscapeStep, InputState, StateChanges};
pub use tool::Tool;
