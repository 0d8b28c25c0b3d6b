//! Window roles, stacking order and key-window routing.

use std::fmt;

/// The three surfaces the application shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    /// Full-screen transparent drawing surface
    Overlay,
    /// Floating tool/color/width strip
    Toolbar,
    /// Color picker panel opened from the toolbar swatch
    ColorPanel,
}

impl fmt::Display for WindowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WindowRole::Overlay => "overlay",
            WindowRole::Toolbar => "toolbar",
            WindowRole::ColorPanel => "color panel",
        })
    }
}

/// Stacking order, bottom to top.
pub const STACKING_ORDER: [WindowRole; 3] = [
    WindowRole::Overlay,
    WindowRole::Toolbar,
    WindowRole::ColorPanel,
];

/// Inputs that decide which window receives keyboard events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyRouting {
    pub color_panel_open: bool,
    pub color_panel_hovered: bool,
    pub editing_text: bool,
    pub toolbar_hovered: bool,
}

impl KeyRouting {
    /// Picks the key window.
    ///
    /// The color panel follows the mouse while open; a label being edited
    /// keeps the overlay focused; otherwise the toolbar takes focus under the
    /// pointer and the overlay has it the rest of the time.
    pub fn key_window(&self) -> WindowRole {
        if self.color_panel_open && self.color_panel_hovered {
            WindowRole::ColorPanel
        } else if self.editing_text {
            WindowRole::Overlay
        } else if self.toolbar_hovered {
            WindowRole::Toolbar
        } else {
            WindowRole::Overlay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_the_default_key_window() {
        assert_eq!(KeyRouting::default().key_window(), WindowRole::Overlay);
    }

    #[test]
    fn hovered_open_panel_wins() {
        let routing = KeyRouting {
            color_panel_open: true,
            color_panel_hovered: true,
            editing_text: true,
            toolbar_hovered: true,
        };
        assert_eq!(routing.key_window(), WindowRole::ColorPanel);

        let closed = KeyRouting {
            color_panel_open: false,
            ..routing
        };
        assert_eq!(closed.key_window(), WindowRole::Overlay);
    }

    #[test]
    fn text_editing_beats_toolbar_hover() {
        let routing = KeyRouting {
            editing_text: true,
            toolbar_hovered: true,
            ..KeyRouting::default()
        };
        assert_eq!(routing.key_window(), WindowRole::Overlay);

        let hover_only = KeyRouting {
            toolbar_hovered: true,
            ..KeyRouting::default()
        };
        assert_eq!(hover_only.key_window(), WindowRole::Toolbar);
    }

    #[test]
    fn stacking_puts_panel_on_top() {
        assert_eq!(STACKING_ORDER.first(), Some(&WindowRole::Overlay));
        assert_eq!(STACKING_ORDER.last(), Some(&WindowRole::ColorPanel));
    }
}
