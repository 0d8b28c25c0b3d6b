//! The application context.
//!
//! [`App`] owns the annotation session, the toolbar controllers and the
//! platform collaborators. Every mutation runs synchronously through
//! [`App::dispatch`]; afterwards the accumulated changes are pushed to the
//! window system and to registered [`AppObserver`]s.

mod events;
#[cfg(test)]
mod tests;

pub use events::{AppChange, AppEvent, AppObserver, LogObserver};

use crate::config::{Config, KeyBinding, KeybindingsConfig};
use crate::input::{InputState, Tool};
use crate::platform::prefs::{
    KEY_AUTO_HIDE, KEY_COLOR, KEY_LAUNCH_AT_LOGIN, KEY_TOOL, KEY_TOOLBAR_X, KEY_TOOLBAR_Y,
    KEY_WIDTH,
};
use crate::platform::{Platform, PrefValue, PreferenceStore};
use crate::toolbar::layout::GAP;
use crate::toolbar::snap::clamp_to_screen;
use crate::toolbar::{
    FadeController, KeyRouting, STACKING_ORDER, SnapSettings, ToolbarButton, ToolbarLayout,
    ToolbarPlacement, ToolbarView, WindowRole, screen_or_default,
};
use crate::util::Rect;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Size of the color panel opened under the toolbar.
pub const COLOR_PANEL_SIZE: (i32, i32) = (240, 200);

/// Single owner of all application state.
pub struct App {
    input: InputState,
    layout: ToolbarLayout,
    placement: ToolbarPlacement,
    fade: FadeController,
    snap: SnapSettings,
    screen: Rect,
    routing: KeyRouting,
    key_window: Option<WindowRole>,
    drawing_mode: bool,
    launch_at_login: bool,
    platform: Platform,
    observers: Vec<Box<dyn AppObserver>>,
    pending: Vec<AppChange>,
}

impl App {
    /// Builds the application from config, restoring saved preferences.
    ///
    /// Starts outside drawing mode with every window hidden.
    pub fn new(config: &Config, mut platform: Platform, now: Instant) -> Self {
        let screen = screen_or_default(platform.windows.screen_frame());

        let action_map = match config.keybindings.build_action_map() {
            Ok(map) => map,
            Err(err) => {
                warn!("Invalid keybindings ({}); using defaults", err);
                KeybindingsConfig::default()
                    .build_action_map()
                    .unwrap_or_default()
            }
        };

        let drawing = &config.drawing;
        let mut input = InputState::with_defaults(
            drawing.default_color.to_color(),
            drawing.default_width,
            drawing.font_size,
            drawing.font_family.clone(),
            action_map,
            drawing.max_annotations,
        );
        input.update_screen_dimensions(screen.width as u32, screen.height as u32);

        let prefs = platform.preferences.as_ref();
        if let Some(tool) = restore(prefs, KEY_TOOL, |v| v.as_text()?.parse::<Tool>().ok()) {
            input.set_tool(tool);
        }
        if let Some(color) = restore(prefs, KEY_COLOR, PrefValue::as_color) {
            input.set_color(color);
        }
        if let Some(width) = restore(prefs, KEY_WIDTH, PrefValue::as_f64) {
            input.set_width(width);
        }
        let origin = restore(prefs, KEY_TOOLBAR_X, PrefValue::as_f64)
            .zip(restore(prefs, KEY_TOOLBAR_Y, PrefValue::as_f64))
            .map(|(x, y)| (x.round() as i32, y.round() as i32));
        let auto_hide =
            restore(prefs, KEY_AUTO_HIDE, PrefValue::as_bool).unwrap_or(config.toolbar.auto_hide);
        let launch_at_login = restore(prefs, KEY_LAUNCH_AT_LOGIN, PrefValue::as_bool)
            .unwrap_or_else(|| platform.login_item.is_enabled());
        input.take_changes();

        let layout = ToolbarLayout::new();
        let snap = SnapSettings::from(&config.toolbar);
        let placement = ToolbarPlacement::new(layout.size(), origin, screen, snap);
        let mut fade = FadeController::from_config(&config.toolbar, now);
        fade.set_enabled(auto_hide, now);

        let binding = KeyBinding::parse(&config.hotkey.toggle).unwrap_or_else(|err| {
            warn!("Invalid toggle hotkey ({}); using default", err);
            KeyBinding {
                key: "D".to_string(),
                ctrl: false,
                shift: true,
                alt: false,
                logo: true,
            }
        });
        match platform.hotkey.register(&binding) {
            Ok(()) => info!("Toggle hotkey: {}", binding),
            Err(err) => warn!("{}", err),
        }

        let windows = platform.windows.as_mut();
        windows.set_frame(WindowRole::Overlay, screen);
        windows.set_frame(WindowRole::Toolbar, placement.frame());
        windows.set_opacity(WindowRole::Toolbar, fade.opacity());
        windows.exclude_from_capture(WindowRole::Toolbar);
        windows.exclude_from_capture(WindowRole::ColorPanel);
        windows.order(&STACKING_ORDER);

        Self {
            input,
            layout,
            placement,
            fade,
            snap,
            screen,
            routing: KeyRouting::default(),
            key_window: None,
            drawing_mode: false,
            launch_at_login,
            platform,
            observers: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn AppObserver>) {
        self.observers.push(observer);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn toolbar_layout(&self) -> &ToolbarLayout {
        &self.layout
    }

    pub fn toolbar_frame(&self) -> Rect {
        self.placement.frame()
    }

    pub fn toolbar_opacity(&self) -> f64 {
        self.fade.opacity()
    }

    pub fn toolbar_view(&self) -> ToolbarView {
        ToolbarView {
            tool: self.input.tool(),
            color: self.input.current_color,
            width: self.input.current_width,
        }
    }

    pub fn auto_hide(&self) -> bool {
        self.fade.is_enabled()
    }

    pub fn launch_at_login(&self) -> bool {
        self.launch_at_login
    }

    pub fn is_color_panel_open(&self) -> bool {
        self.platform.color_picker.is_open()
    }

    /// Window currently receiving keyboard input, while in drawing mode.
    pub fn key_window(&self) -> Option<WindowRole> {
        self.key_window
    }

    /// Delivers pending hotkey presses, then advances the fade timer.
    pub fn pump(&mut self, now: Instant) {
        while self.platform.hotkey.take_pending() {
            self.dispatch_at(AppEvent::Hotkey, now);
        }
        self.dispatch_at(AppEvent::Tick, now);
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        self.dispatch_at(event, Instant::now());
    }

    /// Handles one event at time `now` and publishes the resulting changes.
    pub fn dispatch_at(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Hotkey => {
                if self.drawing_mode {
                    self.exit_drawing_mode();
                } else {
                    self.enter_drawing_mode(now);
                }
            }
            AppEvent::Tick => {
                let changed = self.fade.tick(now);
                self.apply_opacity(changed);
            }
            AppEvent::ColorPicked(color) => {
                self.touch(now);
                self.input.set_color(color);
            }
            AppEvent::SetLaunchAtLogin(enabled) => self.set_launch_at_login(enabled),
            AppEvent::SetAutoHide(enabled) => {
                let changed = self.fade.set_enabled(enabled, now);
                self.apply_opacity(changed);
                self.persist(KEY_AUTO_HIDE, PrefValue::Bool(enabled));
                self.pending.push(AppChange::AutoHide(enabled));
            }
            _ if !self.drawing_mode => {
                debug!("Ignoring {:?} outside drawing mode", event);
            }
            AppEvent::PointerDown { button, x, y } => {
                self.touch(now);
                self.input.on_mouse_press(button, x, y);
            }
            AppEvent::PointerMove { x, y } => self.input.on_mouse_motion(x, y),
            AppEvent::PointerUp { button, x, y } => {
                self.touch(now);
                self.input.on_mouse_release(button, x, y);
            }
            AppEvent::KeyDown(key) => {
                self.touch(now);
                self.input.on_key_press(key);
            }
            AppEvent::KeyUp(key) => self.input.on_key_release(key),
            AppEvent::ToolbarDown { x, y } => {
                self.touch(now);
                self.toolbar_press(x, y);
            }
            AppEvent::ToolbarMove { x, y } => {
                let (sx, sy) = self.toolbar_to_screen(x, y);
                if self.placement.drag_to(sx, sy, self.screen) {
                    self.touch(now);
                    self.publish_toolbar_frame();
                }
            }
            AppEvent::ToolbarUp { .. } => {
                if let Some((x, y)) = self.placement.end_drag(self.screen, self.snap) {
                    self.touch(now);
                    self.publish_toolbar_frame();
                    self.persist(KEY_TOOLBAR_X, PrefValue::Double(x as f64));
                    self.persist(KEY_TOOLBAR_Y, PrefValue::Double(y as f64));
                }
            }
            AppEvent::ToolbarHover(hovered) => {
                self.routing.toolbar_hovered = hovered;
                let changed = self.fade.set_hovered(hovered, now);
                self.apply_opacity(changed);
            }
            AppEvent::ColorPanelHover(hovered) => {
                self.routing.color_panel_hovered = hovered;
                self.touch(now);
            }
            AppEvent::ColorPanelClosed => self.close_color_panel(),
        }

        self.flush();
    }

    /// Shows the overlay and toolbar and starts capturing input.
    fn enter_drawing_mode(&mut self, now: Instant) {
        info!("Entering drawing mode");
        self.drawing_mode = true;
        self.input.request_full_redraw();

        let click_through = self.input.tool().is_passthrough();
        let windows = self.platform.windows.as_mut();
        windows.set_frame(WindowRole::Overlay, self.screen);
        windows.set_frame(WindowRole::Toolbar, self.placement.frame());
        windows.set_click_through(click_through);
        windows.exclude_from_capture(WindowRole::Toolbar);
        windows.exclude_from_capture(WindowRole::ColorPanel);
        windows.show(WindowRole::Overlay);
        windows.show(WindowRole::Toolbar);
        windows.order(&STACKING_ORDER);

        self.touch(now);
        self.key_window = None;
        self.pending.push(AppChange::DrawingMode(true));
    }

    /// Drops transient state and hides every window. Annotations are kept.
    fn exit_drawing_mode(&mut self) {
        info!("Leaving drawing mode");
        self.input.prepare_for_hide();
        self.close_color_panel();

        let windows = self.platform.windows.as_mut();
        windows.hide(WindowRole::Toolbar);
        windows.hide(WindowRole::Overlay);

        self.drawing_mode = false;
        self.routing = KeyRouting::default();
        self.key_window = None;
        self.pending.push(AppChange::DrawingMode(false));
    }

    fn toolbar_to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        let frame = self.placement.frame();
        (frame.x + x, frame.y + y)
    }

    fn toolbar_press(&mut self, x: i32, y: i32) {
        let Some(button) = self.layout.button_at(x, y) else {
            return;
        };
        debug!("Toolbar button {:?}", button);
        match button {
            ToolbarButton::Grip => {
                let (sx, sy) = self.toolbar_to_screen(x, y);
                self.placement.begin_drag(sx, sy);
            }
            ToolbarButton::Tool(tool) => self.input.set_tool(tool),
            ToolbarButton::Color => {
                if self.platform.color_picker.is_open() {
                    self.close_color_panel();
                } else {
                    self.open_color_panel();
                }
            }
            ToolbarButton::WidthDown => self.input.adjust_width(-1.0),
            ToolbarButton::WidthUp => self.input.adjust_width(1.0),
        }
    }

    fn open_color_panel(&mut self) {
        if let Err(err) = self.platform.color_picker.open(self.input.current_color) {
            warn!("{}", err);
            return;
        }
        let toolbar = self.placement.frame();
        let frame = clamp_to_screen(
            Rect {
                x: toolbar.x,
                y: toolbar.max_y() + GAP,
                width: COLOR_PANEL_SIZE.0,
                height: COLOR_PANEL_SIZE.1,
            },
            self.screen,
        );
        let windows = self.platform.windows.as_mut();
        windows.set_frame(WindowRole::ColorPanel, frame);
        windows.show(WindowRole::ColorPanel);
        windows.order(&STACKING_ORDER);
        self.pending.push(AppChange::ColorPanel(true));
    }

    fn close_color_panel(&mut self) {
        self.routing.color_panel_hovered = false;
        if !self.platform.color_picker.is_open() {
            return;
        }
        self.platform.color_picker.close();
        self.platform.windows.hide(WindowRole::ColorPanel);
        self.pending.push(AppChange::ColorPanel(false));
    }

    fn set_launch_at_login(&mut self, enabled: bool) {
        if enabled == self.launch_at_login {
            return;
        }
        match self.platform.login_item.set_enabled(enabled) {
            Ok(()) => {
                self.launch_at_login = enabled;
                self.persist(KEY_LAUNCH_AT_LOGIN, PrefValue::Bool(enabled));
            }
            Err(err) => error!("Launch at login not changed: {}", err),
        }
        // Observers see the effective state, so a failed toggle snaps back
        self.pending.push(AppChange::LaunchAtLogin(self.launch_at_login));
    }

    /// Records toolbar activity, restoring full opacity.
    fn touch(&mut self, now: Instant) {
        let changed = self.fade.record_activity(now);
        self.apply_opacity(changed);
    }

    fn apply_opacity(&mut self, changed: bool) {
        if !changed {
            return;
        }
        let opacity = self.fade.opacity();
        self.platform
            .windows
            .set_opacity(WindowRole::Toolbar, opacity);
        self.pending.push(AppChange::ToolbarOpacity(opacity));
    }

    fn publish_toolbar_frame(&mut self) {
        let frame = self.placement.frame();
        self.platform.windows.set_frame(WindowRole::Toolbar, frame);
        self.pending.push(AppChange::ToolbarFrame(frame));
    }

    fn persist(&mut self, key: &str, value: PrefValue) {
        if let Err(err) = self.platform.preferences.set(key, value) {
            warn!("Failed to save preference {}: {:#}", key, err);
        }
    }

    /// Turns input-state changes into window updates, persisted preferences
    /// and observer notifications.
    fn flush(&mut self) {
        if self.publish_input_changes() && self.drawing_mode {
            self.exit_drawing_mode();
            self.publish_input_changes();
        }

        if self.drawing_mode {
            self.update_key_window();
            if self.input.needs_redraw {
                let regions = self.input.take_dirty_regions();
                debug!("Overlay redraw ({} dirty region(s))", regions.len());
                self.platform
                    .windows
                    .request_redraw(WindowRole::Overlay, &regions);
                self.input.needs_redraw = false;
            }
        }

        let pending = std::mem::take(&mut self.pending);
        for change in &pending {
            for observer in &mut self.observers {
                observer.on_change(change);
            }
        }
    }

    /// Queues notifications for drained input changes. Returns whether the
    /// last Escape step asked to leave drawing mode.
    fn publish_input_changes(&mut self) -> bool {
        let changes = self.input.take_changes();
        if changes.annotations {
            self.pending.push(AppChange::Annotations);
        }
        if changes.selection {
            self.pending.push(AppChange::Selection);
        }
        if changes.tool {
            let tool = self.input.tool();
            if self.drawing_mode {
                self.platform
                    .windows
                    .set_click_through(tool.is_passthrough());
            }
            self.persist(KEY_TOOL, PrefValue::Text(tool.to_string()));
            self.pending.push(AppChange::Tool(tool));
        }
        if changes.style {
            let color = self.input.current_color;
            let width = self.input.current_width;
            self.persist(KEY_COLOR, PrefValue::Color(color));
            self.persist(KEY_WIDTH, PrefValue::Double(width));
            self.pending.push(AppChange::Style { color, width });
        }
        if (changes.tool || changes.style) && self.drawing_mode {
            self.platform.windows.request_redraw(WindowRole::Toolbar, &[]);
        }
        changes.exit
    }

    fn update_key_window(&mut self) {
        self.routing.color_panel_open = self.platform.color_picker.is_open();
        self.routing.editing_text = self.input.selection().is_editing();
        let role = self.routing.key_window();
        if self.key_window != Some(role) {
            self.platform.windows.make_key(role);
            self.key_window = Some(role);
        }
    }

    /// Whether a drag is in progress on the overlay or the toolbar grip.
    pub fn is_dragging(&self) -> bool {
        self.input.is_drawing() || self.placement.is_dragging()
    }
}

/// Reads a preference, warning when it exists but cannot be used.
fn restore<T>(
    prefs: &dyn PreferenceStore,
    key: &str,
    read: impl FnOnce(&PrefValue) -> Option<T>,
) -> Option<T> {
    let value = prefs.get(key)?;
    let restored = read(&value);
    if restored.is_none() {
        warn!("Ignoring unusable preference {} = {:?}", key, value);
    }
    restored
}
