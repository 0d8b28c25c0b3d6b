//! Contracts with the outside world.
//!
//! The window server, the global hotkey, the color picker and the login-item
//! registry are reached only through the traits below. The crate ships
//! headless implementations (used by the daemon, replays and tests), a
//! signal-driven hotkey, an XDG autostart login item and a JSON preference
//! store.

pub mod autostart;
pub mod headless;
pub mod hotkey;
pub mod prefs;

pub use autostart::XdgAutostart;
pub use headless::{HeadlessColorPicker, HeadlessLoginItem, HeadlessWindowState, HeadlessWindows};
pub use hotkey::{ManualHotkey, SignalHotkey};
pub use prefs::{
    JsonPreferenceStore, MemoryPreferenceStore, PrefValue, PreferenceStore,
};

use crate::config::KeyBinding;
use crate::draw::Color;
use crate::toolbar::WindowRole;
use crate::util::Rect;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by platform collaborators.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to register hotkey {binding}: {reason}")]
    Hotkey { binding: String, reason: String },

    #[error("failed to update login item at {path}: {source}")]
    LoginItem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("login items are unavailable: {0}")]
    LoginItemUnavailable(String),

    #[error("color picker unavailable: {0}")]
    ColorPicker(String),
}

/// Window-server surface management for the overlay, toolbar and color panel.
pub trait WindowSystem {
    /// Frame of the screen the overlay covers, if one is found.
    fn screen_frame(&self) -> Option<Rect>;
    fn show(&mut self, role: WindowRole);
    fn hide(&mut self, role: WindowRole);
    /// Lets pointer input on the overlay pass through to other applications.
    fn set_click_through(&mut self, enabled: bool);
    fn set_frame(&mut self, role: WindowRole, frame: Rect);
    fn set_opacity(&mut self, role: WindowRole, opacity: f64);
    /// Restacks the given windows, bottom to top.
    fn order(&mut self, bottom_to_top: &[WindowRole]);
    /// Routes keyboard input to `role`.
    fn make_key(&mut self, role: WindowRole);
    /// Hides the window from screen recordings and screenshots.
    fn exclude_from_capture(&mut self, role: WindowRole);
    /// Repaints the damaged parts of `role`. An empty `damage` slice means
    /// the whole window.
    fn request_redraw(&mut self, role: WindowRole, damage: &[Rect]);
}

/// Global hotkey delivery, independent of the focused application.
pub trait HotkeySource {
    fn register(&mut self, binding: &KeyBinding) -> Result<(), PlatformError>;
    /// Returns true once per hotkey press received since the last call.
    fn take_pending(&mut self) -> bool;
}

/// Modeless color picker panel. Picked colors come back as application events.
pub trait ColorPicker {
    fn open(&mut self, initial: Color) -> Result<(), PlatformError>;
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Launch-at-login registration.
pub trait LoginItem {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError>;
    fn is_enabled(&self) -> bool;
}

/// The collaborators an [`App`](crate::app::App) talks to.
pub struct Platform {
    pub windows: Box<dyn WindowSystem>,
    pub hotkey: Box<dyn HotkeySource>,
    pub color_picker: Box<dyn ColorPicker>,
    pub login_item: Box<dyn LoginItem>,
    pub preferences: Box<dyn PreferenceStore>,
}

impl Platform {
    /// Fully in-memory collaborators. The returned windows handle shares
    /// state with the boxed one.
    pub fn headless(screen: Option<Rect>) -> (Self, HeadlessWindows) {
        let windows = HeadlessWindows::new(screen);
        let platform = Self {
            windows: Box::new(windows.clone()),
            hotkey: Box::new(ManualHotkey::new()),
            color_picker: Box::new(HeadlessColorPicker::new()),
            login_item: Box::new(HeadlessLoginItem::new()),
            preferences: Box::new(MemoryPreferenceStore::new()),
        };
        (platform, windows)
    }
}
