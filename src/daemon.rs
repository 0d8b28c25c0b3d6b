/// Daemon mode implementation: background service with hotkey activation
use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::app::{App, LogObserver};
use crate::config::Config;
use crate::platform::{
    HeadlessColorPicker, HeadlessLoginItem, HeadlessWindows, JsonPreferenceStore, LoginItem,
    MemoryPreferenceStore, Platform, PreferenceStore, SignalHotkey, XdgAutostart,
};

/// How often the loop checks for hotkey presses and fade deadlines.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Long-running host for the [`App`].
pub struct Daemon {
    app: App,
    should_quit: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl Daemon {
    /// Wires the app to the signal hotkey, XDG autostart and the on-disk
    /// preference store. Unavailable collaborators fall back to in-memory
    /// ones with a warning.
    pub fn new(config: &Config) -> Self {
        let hotkey = SignalHotkey::new();
        let should_quit = hotkey.quit_flag();

        let login_item: Box<dyn LoginItem> = match XdgAutostart::new() {
            Ok(item) => Box::new(item),
            Err(err) => {
                warn!("{}; launch at login will not persist", err);
                Box::new(HeadlessLoginItem::new())
            }
        };
        let preferences: Box<dyn PreferenceStore> = match JsonPreferenceStore::open_default() {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!("Preferences unavailable ({:#}); using in-memory defaults", err);
                Box::new(MemoryPreferenceStore::new())
            }
        };

        let platform = Platform {
            windows: Box::new(HeadlessWindows::new(None)),
            hotkey: Box::new(hotkey),
            color_picker: Box::new(HeadlessColorPicker::new()),
            login_item,
            preferences,
        };
        Self::with_app(App::new(config, platform, Instant::now()), should_quit)
    }

    /// Hosts an already built app; `should_quit` stops the loop.
    pub fn with_app(mut app: App, should_quit: Arc<AtomicBool>) -> Self {
        app.add_observer(Box::new(LogObserver));
        Self {
            app,
            should_quit,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run the event loop until a quit signal arrives
    pub fn run(&mut self) -> Result<()> {
        info!("Starting overmark daemon");
        info!("Send SIGUSR1 to toggle drawing mode (e.g., pkill -SIGUSR1 overmark)");
        info!("Daemon ready - waiting for toggle hotkey");

        loop {
            self.app.pump(Instant::now());

            if self.should_quit.load(Ordering::Acquire) {
                info!("Quit signal received - exiting daemon");
                break;
            }

            thread::sleep(self.poll_interval);
        }

        self.shutdown();
        Ok(())
    }

    /// Leaves drawing mode so windows are hidden and blank text is dropped.
    fn shutdown(&mut self) {
        if self.app.is_drawing_mode() {
            self.app.dispatch(crate::app::AppEvent::Hotkey);
        }
        info!("Daemon shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppChange, AppObserver};
    use crate::platform::ManualHotkey;
    use crate::toolbar::WindowRole;
    use crate::util::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct ModeLog(Rc<RefCell<Vec<bool>>>);

    impl AppObserver for ModeLog {
        fn on_change(&mut self, change: &AppChange) {
            if let AppChange::DrawingMode(on) = change {
                self.0.borrow_mut().push(*on);
            }
        }
    }

    fn test_daemon(hotkey: ManualHotkey, quit: Arc<AtomicBool>) -> (Daemon, HeadlessWindows) {
        let windows = HeadlessWindows::new(Rect::new(0, 0, 1280, 720));
        let platform = Platform {
            windows: Box::new(windows.clone()),
            hotkey: Box::new(hotkey),
            color_picker: Box::new(HeadlessColorPicker::new()),
            login_item: Box::new(HeadlessLoginItem::new()),
            preferences: Box::new(MemoryPreferenceStore::new()),
        };
        let app = App::new(&Config::default(), platform, Instant::now());
        let mut daemon = Daemon::with_app(app, quit);
        daemon.poll_interval = Duration::from_millis(1);
        (daemon, windows)
    }

    #[test]
    fn pending_hotkey_is_handled_before_quitting() {
        let mut hotkey = ManualHotkey::new();
        hotkey.press();
        let quit = Arc::new(AtomicBool::new(true));
        let (mut daemon, windows) = test_daemon(hotkey, quit);
        let log = ModeLog::default();
        daemon.app.add_observer(Box::new(log.clone()));

        daemon.run().unwrap();

        assert_eq!(*log.0.borrow(), vec![true, false]);
        assert!(!daemon.app().is_drawing_mode());
        assert!(!windows.state().borrow().is_visible(WindowRole::Overlay));
    }

    #[test]
    fn quits_without_showing_when_idle() {
        let quit = Arc::new(AtomicBool::new(true));
        let (mut daemon, windows) = test_daemon(ManualHotkey::new(), quit);

        daemon.run().unwrap();

        assert!(!daemon.app().is_drawing_mode());
        assert!(windows.state().borrow().visible.is_empty());
    }
}
