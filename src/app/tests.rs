use super::*;
use crate::draw::{BLUE, RED};
use crate::input::{Key, MouseButton};
use crate::platform::{
    HeadlessColorPicker, HeadlessLoginItem, HeadlessWindowState, HeadlessWindows,
    JsonPreferenceStore, ManualHotkey, MemoryPreferenceStore,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

#[derive(Clone, Default)]
struct Recorder {
    changes: Rc<RefCell<Vec<AppChange>>>,
}

impl AppObserver for Recorder {
    fn on_change(&mut self, change: &AppChange) {
        self.changes.borrow_mut().push(*change);
    }
}

impl Recorder {
    fn saw(&self, change: AppChange) -> bool {
        self.changes.borrow().contains(&change)
    }
}

struct Harness {
    app: App,
    windows: Rc<RefCell<HeadlessWindowState>>,
    recorder: Recorder,
    t0: Instant,
}

impl Harness {
    fn with_platform(config: &Config, platform: Platform, windows: HeadlessWindows) -> Self {
        let t0 = Instant::now();
        let mut app = App::new(config, platform, t0);
        let recorder = Recorder::default();
        app.add_observer(Box::new(recorder.clone()));
        Self {
            app,
            windows: windows.state(),
            recorder,
            t0,
        }
    }

    fn new() -> Self {
        let (platform, windows) = Platform::headless(Some(SCREEN));
        Self::with_platform(&Config::default(), platform, windows)
    }

    fn send(&mut self, event: AppEvent) {
        self.app.dispatch_at(event, self.t0);
    }

    fn send_at(&mut self, event: AppEvent, after_ms: u64) {
        self.app
            .dispatch_at(event, self.t0 + Duration::from_millis(after_ms));
    }

    fn drag(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.send(AppEvent::PointerDown {
            button: MouseButton::Left,
            x: x1,
            y: y1,
        });
        self.send(AppEvent::PointerMove { x: x2, y: y2 });
        self.send(AppEvent::PointerUp {
            button: MouseButton::Left,
            x: x2,
            y: y2,
        });
    }

    fn key(&mut self, key: Key) {
        self.send(AppEvent::KeyDown(key));
        self.send(AppEvent::KeyUp(key));
    }

    fn press_toolbar(&mut self, button: ToolbarButton) {
        let rect = self.app.toolbar_layout().button_rect(button).unwrap();
        let (x, y) = (rect.x + rect.width / 2, rect.y + rect.height / 2);
        self.send(AppEvent::ToolbarDown { x, y });
        self.send(AppEvent::ToolbarUp { x, y });
    }
}

fn platform_with(
    login_item: HeadlessLoginItem,
    preferences: Box<dyn PreferenceStore>,
) -> (Platform, HeadlessWindows) {
    let windows = HeadlessWindows::new(Some(SCREEN));
    let platform = Platform {
        windows: Box::new(windows.clone()),
        hotkey: Box::new(ManualHotkey::new()),
        color_picker: Box::new(HeadlessColorPicker::new()),
        login_item: Box::new(login_item),
        preferences,
    };
    (platform, windows)
}

#[test]
fn starts_hidden_with_windows_configured() {
    let h = Harness::new();
    assert!(!h.app.is_drawing_mode());

    let state = h.windows.borrow();
    assert!(state.visible.is_empty());
    assert_eq!(state.order, STACKING_ORDER.to_vec());
    assert!(state.capture_excluded.contains(&WindowRole::Toolbar));
    assert!(state.capture_excluded.contains(&WindowRole::ColorPanel));
    assert!(!state.capture_excluded.contains(&WindowRole::Overlay));
    assert_eq!(state.frames.get(&WindowRole::Overlay), Some(&SCREEN));
}

#[test]
fn hotkey_shows_overlay_and_toolbar() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);

    assert!(h.app.is_drawing_mode());
    assert!(h.recorder.saw(AppChange::DrawingMode(true)));
    let state = h.windows.borrow();
    assert!(state.is_visible(WindowRole::Overlay));
    assert!(state.is_visible(WindowRole::Toolbar));
    assert!(!state.is_visible(WindowRole::ColorPanel));
    assert!(!state.click_through);
    assert_eq!(state.key_window, Some(WindowRole::Overlay));
    assert_eq!(
        state.frames.get(&WindowRole::Toolbar),
        Some(&h.app.toolbar_frame())
    );
}

#[test]
fn hotkey_again_hides_and_drops_blank_text() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.key(Key::Char('t'));
    h.drag(100, 100, 100, 100);
    assert!(h.app.input().selection().is_editing());
    assert_eq!(h.app.input().annotations.len(), 1);

    h.send(AppEvent::Hotkey);

    assert!(!h.app.is_drawing_mode());
    assert!(h.app.input().annotations.is_empty());
    assert!(h.app.input().selection().selected().is_none());
    assert!(h.recorder.saw(AppChange::DrawingMode(false)));
    let state = h.windows.borrow();
    assert!(!state.is_visible(WindowRole::Overlay));
    assert!(!state.is_visible(WindowRole::Toolbar));
}

#[test]
fn annotations_survive_hiding() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.key(Key::Char('r'));
    h.drag(10, 10, 50, 40);
    h.send(AppEvent::Hotkey);
    h.send(AppEvent::Hotkey);

    assert_eq!(h.app.input().annotations.len(), 1);
}

#[test]
fn overlay_events_are_ignored_outside_drawing_mode() {
    let mut h = Harness::new();
    h.drag(10, 10, 50, 40);
    h.key(Key::Char('r'));

    assert!(h.app.input().annotations.is_empty());
    assert_eq!(h.app.input().tool(), Tool::Pen);
}

#[test]
fn cursor_tool_turns_on_click_through() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);

    h.press_toolbar(ToolbarButton::Tool(Tool::Cursor));
    assert_eq!(h.app.input().tool(), Tool::Cursor);
    assert!(h.windows.borrow().click_through);
    assert!(h.recorder.saw(AppChange::Tool(Tool::Cursor)));

    h.press_toolbar(ToolbarButton::Tool(Tool::Rectangle));
    assert!(!h.windows.borrow().click_through);
}

#[test]
fn overlay_redraws_carry_damage() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    {
        let state = h.windows.borrow();
        let (role, damage) = state.damage.last().unwrap();
        assert_eq!(*role, WindowRole::Overlay);
        assert_eq!(damage, &vec![SCREEN]);
    }

    h.press_toolbar(ToolbarButton::Tool(Tool::Rectangle));
    h.windows.borrow_mut().damage.clear();
    h.drag(100, 100, 200, 150);

    let state = h.windows.borrow();
    let (_, damage) = state
        .damage
        .iter()
        .rev()
        .find(|(role, _)| *role == WindowRole::Overlay)
        .unwrap();
    assert!(!damage.is_empty());
    assert!(!damage.contains(&SCREEN));
    assert!(damage.iter().any(|r| r.contains(100, 100) && r.contains(199, 149)));
}

#[test]
fn toolbar_tool_switch_removes_blank_text() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.key(Key::Char('t'));
    h.drag(300, 300, 300, 300);
    assert_eq!(h.app.input().annotations.len(), 1);

    h.press_toolbar(ToolbarButton::Tool(Tool::Pen));

    assert!(h.app.input().annotations.is_empty());
    assert!(h.recorder.saw(AppChange::Annotations));
}

#[test]
fn final_escape_leaves_drawing_mode() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.key(Key::Char('r'));
    h.drag(10, 10, 50, 40);
    // Click on the edge selects it
    h.drag(10, 20, 10, 20);
    assert!(h.app.input().selection().selected().is_some());

    h.key(Key::Escape);
    assert!(h.app.is_drawing_mode());
    assert!(h.app.input().selection().selected().is_none());

    h.key(Key::Escape);
    assert!(!h.app.is_drawing_mode());
    assert!(!h.windows.borrow().is_visible(WindowRole::Overlay));
    assert!(h.recorder.saw(AppChange::DrawingMode(false)));

    h.send(AppEvent::Hotkey);
    assert!(h.app.is_drawing_mode());
}

#[test]
fn width_buttons_adjust_and_clamp() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    let start = h.app.input().current_width;

    h.press_toolbar(ToolbarButton::WidthUp);
    assert_eq!(h.app.input().current_width, start + 1.0);

    for _ in 0..40 {
        h.press_toolbar(ToolbarButton::WidthDown);
    }
    assert_eq!(h.app.input().current_width, 1.0);
    assert!(h.recorder.saw(AppChange::Style {
        color: h.app.input().current_color,
        width: 1.0,
    }));
}

#[test]
fn color_swatch_opens_panel_and_routes_keys() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);

    h.press_toolbar(ToolbarButton::Color);
    assert!(h.app.is_color_panel_open());
    assert!(h.windows.borrow().is_visible(WindowRole::ColorPanel));
    assert!(h.recorder.saw(AppChange::ColorPanel(true)));

    let panel = h.windows.borrow().frames[&WindowRole::ColorPanel];
    assert!(panel.y >= h.app.toolbar_frame().max_y());

    h.send(AppEvent::ColorPanelHover(true));
    assert_eq!(h.app.key_window(), Some(WindowRole::ColorPanel));
    h.send(AppEvent::ColorPanelHover(false));
    assert_eq!(h.app.key_window(), Some(WindowRole::Overlay));

    h.send(AppEvent::ColorPicked(BLUE));
    assert_eq!(h.app.input().current_color, BLUE);

    h.send(AppEvent::ColorPanelClosed);
    assert!(!h.app.is_color_panel_open());
    assert!(!h.windows.borrow().is_visible(WindowRole::ColorPanel));
}

#[test]
fn leaving_drawing_mode_closes_color_panel() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.press_toolbar(ToolbarButton::Color);
    h.send(AppEvent::Hotkey);

    assert!(!h.app.is_color_panel_open());
    assert!(!h.windows.borrow().is_visible(WindowRole::ColorPanel));
}

#[test]
fn editing_text_keeps_overlay_key_over_toolbar() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.key(Key::Char('t'));
    h.drag(400, 400, 400, 400);
    h.key(Key::Char('h'));

    h.send(AppEvent::ToolbarHover(true));
    assert_eq!(h.app.key_window(), Some(WindowRole::Overlay));

    h.key(Key::Return);
    assert!(!h.app.input().selection().is_editing());
    assert_eq!(h.app.key_window(), Some(WindowRole::Toolbar));

    h.send(AppEvent::ToolbarHover(false));
    assert_eq!(h.app.key_window(), Some(WindowRole::Overlay));
}

#[test]
fn toolbar_fades_when_idle_and_recovers_on_activity() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    assert_eq!(h.app.toolbar_opacity(), 1.0);

    h.send_at(AppEvent::Tick, 4_000);
    assert_eq!(h.app.toolbar_opacity(), 0.25);
    assert!(h.recorder.saw(AppChange::ToolbarOpacity(0.25)));
    assert_eq!(
        h.windows.borrow().opacity.get(&WindowRole::Toolbar),
        Some(&0.25)
    );

    h.send_at(AppEvent::KeyDown(Key::Char('r')), 5_000);
    assert_eq!(h.app.toolbar_opacity(), 1.0);

    h.send_at(AppEvent::Tick, 7_000);
    assert_eq!(h.app.toolbar_opacity(), 1.0);
    h.send_at(AppEvent::Tick, 8_500);
    assert_eq!(h.app.toolbar_opacity(), 0.25);
}

#[test]
fn hovering_suspends_fade() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.send(AppEvent::ToolbarHover(true));

    h.send_at(AppEvent::Tick, 10_000);
    assert_eq!(h.app.toolbar_opacity(), 1.0);

    h.send_at(AppEvent::ToolbarHover(false), 10_000);
    h.send_at(AppEvent::Tick, 14_000);
    assert_eq!(h.app.toolbar_opacity(), 0.25);
}

#[test]
fn disabling_auto_hide_keeps_toolbar_opaque() {
    let mut h = Harness::new();
    h.send(AppEvent::Hotkey);
    h.send(AppEvent::SetAutoHide(false));
    assert!(!h.app.auto_hide());
    assert!(h.recorder.saw(AppChange::AutoHide(false)));

    h.send_at(AppEvent::Tick, 60_000);
    assert_eq!(h.app.toolbar_opacity(), 1.0);
}

#[test]
fn failed_launch_at_login_reverts() {
    let (platform, windows) = platform_with(
        HeadlessLoginItem::refusing(),
        Box::new(MemoryPreferenceStore::new()),
    );
    let mut h = Harness::with_platform(&Config::default(), platform, windows);

    h.send(AppEvent::SetLaunchAtLogin(true));

    assert!(!h.app.launch_at_login());
    assert!(h.recorder.saw(AppChange::LaunchAtLogin(false)));
    assert!(!h.recorder.saw(AppChange::LaunchAtLogin(true)));
}

#[test]
fn launch_at_login_toggles() {
    let mut h = Harness::new();
    h.send(AppEvent::SetLaunchAtLogin(true));
    assert!(h.app.launch_at_login());
    assert!(h.recorder.saw(AppChange::LaunchAtLogin(true)));
}

#[test]
fn grip_drag_snaps_and_position_is_restored() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("preferences.json");

    {
        let (platform, windows) = platform_with(
            HeadlessLoginItem::new(),
            Box::new(JsonPreferenceStore::open(prefs_path.clone())),
        );
        let mut h = Harness::with_platform(&Config::default(), platform, windows);
        h.send(AppEvent::Hotkey);

        let grip = h
            .app
            .toolbar_layout()
            .button_rect(ToolbarButton::Grip)
            .unwrap();
        let (gx, gy) = (grip.x + grip.width / 2, grip.y + grip.height / 2);
        let start = h.app.toolbar_frame();

        h.send(AppEvent::ToolbarDown { x: gx, y: gy });
        assert!(h.app.is_dragging());

        // Pointer moves so the frame lands at (15, 300)
        let local = (15 + gx - start.x, 300 + gy - start.y);
        h.send(AppEvent::ToolbarMove {
            x: local.0,
            y: local.1,
        });
        assert_eq!(
            (h.app.toolbar_frame().x, h.app.toolbar_frame().y),
            (15, 300)
        );

        h.send(AppEvent::ToolbarUp { x: gx, y: gy });
        let frame = h.app.toolbar_frame();
        assert_eq!((frame.x, frame.y), (8, 300));
        assert!(!h.app.is_dragging());
        assert!(h.recorder.saw(AppChange::ToolbarFrame(frame)));
        assert_eq!(h.windows.borrow().frames[&WindowRole::Toolbar], frame);
    }

    let (platform, windows) = platform_with(
        HeadlessLoginItem::new(),
        Box::new(JsonPreferenceStore::open(prefs_path)),
    );
    let h = Harness::with_platform(&Config::default(), platform, windows);
    let frame = h.app.toolbar_frame();
    assert_eq!((frame.x, frame.y), (8, 300));
}

#[test]
fn tool_and_style_are_restored() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("preferences.json");

    {
        let (platform, windows) = platform_with(
            HeadlessLoginItem::new(),
            Box::new(JsonPreferenceStore::open(prefs_path.clone())),
        );
        let mut h = Harness::with_platform(&Config::default(), platform, windows);
        h.send(AppEvent::Hotkey);
        h.key(Key::Char('o'));
        h.key(Key::Char('5'));
        h.press_toolbar(ToolbarButton::WidthUp);
        h.send(AppEvent::SetAutoHide(false));
    }

    let (platform, windows) = platform_with(
        HeadlessLoginItem::new(),
        Box::new(JsonPreferenceStore::open(prefs_path)),
    );
    let h = Harness::with_platform(&Config::default(), platform, windows);
    assert_eq!(h.app.input().tool(), Tool::Circle);
    assert_eq!(h.app.input().current_color, BLUE);
    assert_eq!(h.app.input().current_width, 4.0);
    assert!(!h.app.auto_hide());
}

#[test]
fn unusable_preferences_fall_back_to_config() {
    let mut prefs = MemoryPreferenceStore::new();
    prefs
        .set(KEY_TOOL, PrefValue::Text("lasso".to_string()))
        .unwrap();
    prefs.set(KEY_WIDTH, PrefValue::Bool(true)).unwrap();
    let (platform, windows) = platform_with(HeadlessLoginItem::new(), Box::new(prefs));

    let h = Harness::with_platform(&Config::default(), platform, windows);
    assert_eq!(h.app.input().tool(), Tool::Pen);
    assert_eq!(h.app.input().current_width, 3.0);
    assert_eq!(h.app.input().current_color, RED);
}

#[test]
fn missing_screen_uses_fallback() {
    let (platform, windows) = Platform::headless(None);
    let h = Harness::with_platform(&Config::default(), platform, windows);
    assert_eq!(h.app.screen(), crate::toolbar::FALLBACK_SCREEN);
}

#[test]
fn pump_delivers_hotkey_presses() {
    let mut hotkey = ManualHotkey::new();
    hotkey.press();
    let windows = HeadlessWindows::new(Some(SCREEN));
    let platform = Platform {
        windows: Box::new(windows.clone()),
        hotkey: Box::new(hotkey),
        color_picker: Box::new(HeadlessColorPicker::new()),
        login_item: Box::new(HeadlessLoginItem::new()),
        preferences: Box::new(MemoryPreferenceStore::new()),
    };
    let mut h = Harness::with_platform(&Config::default(), platform, windows);

    h.app.pump(h.t0);
    assert!(h.app.is_drawing_mode());
    h.app.pump(h.t0);
    assert!(h.app.is_drawing_mode());
}

#[test]
fn invalid_keybindings_fall_back_to_defaults() {
    let mut config = Config::default();
    config.keybindings.undo = vec!["P".to_string()];
    let (platform, windows) = Platform::headless(Some(SCREEN));
    let mut h = Harness::with_platform(&config, platform, windows);

    h.send(AppEvent::Hotkey);
    h.key(Key::Char('r'));
    assert_eq!(h.app.input().tool(), Tool::Rectangle);
}
