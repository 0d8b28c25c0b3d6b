//! Drawing tool selection.

use std::fmt;
use std::str::FromStr;

/// Drawing tool selection.
///
/// The active tool determines how pointer drags on the overlay are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Pass-through: the overlay ignores the pointer and clicks reach the
    /// applications underneath
    Cursor,
    /// Freehand stroke
    Pen,
    /// Wide translucent freehand stroke
    Highlighter,
    /// Rectangle outline from corner to corner
    Rectangle,
    /// Ellipse outline inscribed in the drag rectangle
    Circle,
    /// Text label placed where the drag ends
    Text,
    /// Removes every annotation touched by the drag rectangle
    Eraser,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Tool; 7] = [
        Tool::Cursor,
        Tool::Pen,
        Tool::Highlighter,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Text,
        Tool::Eraser,
    ];

    /// Stable lowercase name used in preferences and scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Cursor => "cursor",
            Tool::Pen => "pen",
            Tool::Highlighter => "highlighter",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Text => "text",
            Tool::Eraser => "eraser",
        }
    }

    /// Whether the overlay should let pointer input through to other applications.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Tool::Cursor)
    }

    /// Whether a drag with this tool accumulates a raw point list.
    pub fn collects_points(&self) -> bool {
        matches!(self, Tool::Pen | Tool::Highlighter)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tool '{s}'"))
    }
}
