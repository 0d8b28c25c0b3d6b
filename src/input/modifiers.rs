//! Keyboard modifier state tracking.

/// Keyboard modifier state.
///
/// Tracks which modifier keys are currently pressed. Used to match keybindings
/// and to tell Shift+Return (newline) apart from Return (commit) while editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key pressed
    pub shift: bool,
    /// Ctrl key pressed
    pub ctrl: bool,
    /// Alt key pressed
    pub alt: bool,
}

impl Modifiers {
    /// Creates a new Modifiers instance with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a command modifier (Ctrl or Alt) is held.
    pub fn command_held(&self) -> bool {
        self.ctrl || self.alt
    }

    /// Releases every modifier, e.g. after the overlay loses keyboard focus.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
