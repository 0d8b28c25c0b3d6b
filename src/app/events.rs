//! Events the application consumes and the change notifications it emits.

use crate::draw::Color;
use crate::input::{Key, MouseButton, Tool};
use crate::util::Rect;
use log::debug;

/// Everything that can happen to the application.
///
/// Overlay pointer coordinates are screen coordinates; toolbar pointer
/// coordinates are local to the toolbar frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The global toggle hotkey fired
    Hotkey,
    PointerDown { button: MouseButton, x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp { button: MouseButton, x: i32, y: i32 },
    KeyDown(Key),
    KeyUp(Key),
    ToolbarDown { x: i32, y: i32 },
    ToolbarMove { x: i32, y: i32 },
    ToolbarUp { x: i32, y: i32 },
    /// Pointer entered (true) or left (false) the toolbar
    ToolbarHover(bool),
    /// Pointer entered or left the color panel
    ColorPanelHover(bool),
    /// The user closed the color panel
    ColorPanelClosed,
    /// The color panel reported a new color
    ColorPicked(Color),
    SetLaunchAtLogin(bool),
    SetAutoHide(bool),
    /// Timer heartbeat for the toolbar fade
    Tick,
}

/// Notifications delivered to [`AppObserver`]s after each event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppChange {
    DrawingMode(bool),
    Annotations,
    Selection,
    Tool(Tool),
    Style { color: Color, width: f64 },
    ToolbarOpacity(f64),
    ToolbarFrame(Rect),
    ColorPanel(bool),
    /// Current launch-at-login state; also sent when a toggle was reverted
    LaunchAtLogin(bool),
    AutoHide(bool),
}

/// Subscriber for application state changes.
pub trait AppObserver {
    fn on_change(&mut self, change: &AppChange);
}

/// Observer that writes every change to the debug log.
#[derive(Debug, Default)]
pub struct LogObserver;

impl AppObserver for LogObserver {
    fn on_change(&mut self, change: &AppChange) {
        debug!("App change: {:?}", change);
    }
}
