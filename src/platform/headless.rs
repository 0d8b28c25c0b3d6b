//! In-process window system, color picker and login item that only record
//! requests.

use super::{ColorPicker, LoginItem, PlatformError, WindowSystem};
use crate::draw::Color;
use crate::toolbar::WindowRole;
use crate::util::Rect;
use log::debug;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Everything a [`HeadlessWindows`] has been asked to do.
#[derive(Debug, Default, Clone)]
pub struct HeadlessWindowState {
    pub screen: Option<Rect>,
    pub visible: HashSet<WindowRole>,
    pub click_through: bool,
    pub frames: HashMap<WindowRole, Rect>,
    pub opacity: HashMap<WindowRole, f64>,
    pub order: Vec<WindowRole>,
    pub key_window: Option<WindowRole>,
    pub capture_excluded: HashSet<WindowRole>,
    pub redraws: usize,
    /// Damage passed with each redraw, oldest first. Empty means full.
    pub damage: Vec<(WindowRole, Vec<Rect>)>,
}

impl HeadlessWindowState {
    pub fn is_visible(&self, role: WindowRole) -> bool {
        self.visible.contains(&role)
    }
}

/// Window system without a display. State is shared so callers can inspect
/// it after handing the windows to the application.
#[derive(Debug, Clone)]
pub struct HeadlessWindows {
    state: Rc<RefCell<HeadlessWindowState>>,
}

impl HeadlessWindows {
    pub fn new(screen: Option<Rect>) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessWindowState {
                screen,
                ..HeadlessWindowState::default()
            })),
        }
    }

    /// Shared handle to the recorded state.
    pub fn state(&self) -> Rc<RefCell<HeadlessWindowState>> {
        Rc::clone(&self.state)
    }
}

impl WindowSystem for HeadlessWindows {
    fn screen_frame(&self) -> Option<Rect> {
        self.state.borrow().screen
    }

    fn show(&mut self, role: WindowRole) {
        debug!("show {}", role);
        self.state.borrow_mut().visible.insert(role);
    }

    fn hide(&mut self, role: WindowRole) {
        debug!("hide {}", role);
        self.state.borrow_mut().visible.remove(&role);
    }

    fn set_click_through(&mut self, enabled: bool) {
        debug!("overlay click-through: {}", enabled);
        self.state.borrow_mut().click_through = enabled;
    }

    fn set_frame(&mut self, role: WindowRole, frame: Rect) {
        self.state.borrow_mut().frames.insert(role, frame);
    }

    fn set_opacity(&mut self, role: WindowRole, opacity: f64) {
        debug!("{} opacity {:.2}", role, opacity);
        self.state.borrow_mut().opacity.insert(role, opacity);
    }

    fn order(&mut self, bottom_to_top: &[WindowRole]) {
        self.state.borrow_mut().order = bottom_to_top.to_vec();
    }

    fn make_key(&mut self, role: WindowRole) {
        debug!("key window: {}", role);
        self.state.borrow_mut().key_window = Some(role);
    }

    fn exclude_from_capture(&mut self, role: WindowRole) {
        self.state.borrow_mut().capture_excluded.insert(role);
    }

    fn request_redraw(&mut self, role: WindowRole, damage: &[Rect]) {
        let mut state = self.state.borrow_mut();
        state.redraws += 1;
        state.damage.push((role, damage.to_vec()));
    }
}

/// Color picker that tracks its open state only.
#[derive(Debug, Default, Clone)]
pub struct HeadlessColorPicker {
    open: bool,
    initial: Option<Color>,
}

impl HeadlessColorPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color the panel was last opened with.
    pub fn initial(&self) -> Option<Color> {
        self.initial
    }
}

impl ColorPicker for HeadlessColorPicker {
    fn open(&mut self, initial: Color) -> Result<(), PlatformError> {
        self.open = true;
        self.initial = Some(initial);
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Login item kept in memory. Can be told to refuse changes.
#[derive(Debug, Default, Clone)]
pub struct HeadlessLoginItem {
    enabled: bool,
    refuse: bool,
}

impl HeadlessLoginItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A login item whose registration always fails.
    pub fn refusing() -> Self {
        Self {
            enabled: false,
            refuse: true,
        }
    }
}

impl LoginItem for HeadlessLoginItem {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        if self.refuse {
            return Err(PlatformError::LoginItemUnavailable(
                "registration refused".to_string(),
            ));
        }
        self.enabled = enabled;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_share_recorded_state() {
        let mut windows = HeadlessWindows::new(Rect::new(0, 0, 800, 600));
        let state = windows.state();

        windows.show(WindowRole::Overlay);
        windows.set_click_through(true);
        windows.make_key(WindowRole::Toolbar);
        windows.hide(WindowRole::Overlay);

        let state = state.borrow();
        assert!(!state.is_visible(WindowRole::Overlay));
        assert!(state.click_through);
        assert_eq!(state.key_window, Some(WindowRole::Toolbar));
        assert_eq!(state.screen, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn refusing_login_item_keeps_state() {
        let mut item = HeadlessLoginItem::refusing();
        assert!(item.set_enabled(true).is_err());
        assert!(!item.is_enabled());
    }
}
