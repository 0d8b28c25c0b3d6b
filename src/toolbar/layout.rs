//! Toolbar geometry: a horizontal strip of hit-testable buttons.

use crate::input::Tool;
use crate::util::Rect;

/// Side length of a square toolbar button
pub const BUTTON_SIZE: i32 = 32;
/// Space around the button row
pub const PADDING: i32 = 6;
/// Space between neighbouring buttons
pub const GAP: i32 = 4;
/// Width of the drag grip at the left end
pub const GRIP_WIDTH: i32 = 14;
/// Extra space separating the tool group from the style controls
pub const GROUP_GAP: i32 = 10;

/// Something the user can press on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    /// Drag handle that moves the toolbar
    Grip,
    /// Tool selector
    Tool(Tool),
    /// Current color swatch; opens the color panel
    Color,
    /// Decrease stroke width
    WidthDown,
    /// Increase stroke width
    WidthUp,
}

/// Button rectangles in toolbar-local coordinates.
#[derive(Debug, Clone)]
pub struct ToolbarLayout {
    buttons: Vec<(ToolbarButton, Rect)>,
    width: i32,
    height: i32,
}

impl Default for ToolbarLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolbarLayout {
    pub fn new() -> Self {
        let height = BUTTON_SIZE + PADDING * 2;
        let mut buttons = Vec::with_capacity(Tool::ALL.len() + 4);
        let mut x = PADDING;

        buttons.push((
            ToolbarButton::Grip,
            Rect {
                x,
                y: PADDING,
                width: GRIP_WIDTH,
                height: BUTTON_SIZE,
            },
        ));
        x += GRIP_WIDTH + GAP;

        let mut push_button = |button: ToolbarButton, x: &mut i32| {
            buttons.push((
                button,
                Rect {
                    x: *x,
                    y: PADDING,
                    width: BUTTON_SIZE,
                    height: BUTTON_SIZE,
                },
            ));
            *x += BUTTON_SIZE + GAP;
        };

        for tool in Tool::ALL {
            push_button(ToolbarButton::Tool(tool), &mut x);
        }
        x += GROUP_GAP;
        push_button(ToolbarButton::Color, &mut x);
        push_button(ToolbarButton::WidthDown, &mut x);
        push_button(ToolbarButton::WidthUp, &mut x);

        let width = x - GAP + PADDING;
        Self {
            buttons,
            width,
            height,
        }
    }

    /// Toolbar size in pixels.
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn buttons(&self) -> &[(ToolbarButton, Rect)] {
        &self.buttons
    }

    /// Maps a toolbar-local point to the button under it.
    pub fn button_at(&self, x: i32, y: i32) -> Option<ToolbarButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(button, _)| *button)
    }

    pub fn button_rect(&self, button: ToolbarButton) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(candidate, _)| *candidate == button)
            .map(|(_, rect)| *rect)
    }
}
