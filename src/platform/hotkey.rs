//! Hotkey sources.
//!
//! A Unix daemon cannot grab keys globally without a compositor protocol, so
//! the shipped source maps the configured chord onto `SIGUSR1`: bind the chord
//! in the compositor to `pkill -SIGUSR1 overmark`.

use super::{HotkeySource, PlatformError};
use crate::config::KeyBinding;
use log::{info, warn};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1};
use signal_hook::iterator::Signals;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Hotkey delivered as `SIGUSR1`. `SIGTERM` and `SIGINT` request shutdown.
#[derive(Debug)]
pub struct SignalHotkey {
    toggle: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
    installed: bool,
}

impl SignalHotkey {
    pub fn new() -> Self {
        Self {
            toggle: Arc::new(AtomicBool::new(false)),
            quit: Arc::new(AtomicBool::new(false)),
            installed: false,
        }
    }

    /// True once `SIGTERM` or `SIGINT` has been received.
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    /// Flag set by `SIGTERM` or `SIGINT`, shared with the event loop.
    pub fn quit_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }

    fn install(&mut self) -> Result<(), PlatformError> {
        let mut signals =
            Signals::new([SIGUSR1, SIGTERM, SIGINT]).map_err(|err| PlatformError::Hotkey {
                binding: "SIGUSR1".to_string(),
                reason: err.to_string(),
            })?;

        let toggle = Arc::clone(&self.toggle);
        let quit = Arc::clone(&self.quit);

        // Runs until process exit; the iterator has no shutdown hook
        thread::spawn(move || {
            for sig in signals.forever() {
                match sig {
                    SIGUSR1 => {
                        info!("Received SIGUSR1 - toggling drawing mode");
                        toggle.store(true, Ordering::Release);
                    }
                    SIGTERM | SIGINT => {
                        info!(
                            "Received {} - initiating graceful shutdown",
                            if sig == SIGTERM { "SIGTERM" } else { "SIGINT" }
                        );
                        quit.store(true, Ordering::Release);
                    }
                    _ => warn!("Received unexpected signal: {}", sig),
                }
            }
        });

        self.installed = true;
        Ok(())
    }
}

impl Default for SignalHotkey {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeySource for SignalHotkey {
    fn register(&mut self, binding: &KeyBinding) -> Result<(), PlatformError> {
        if !self.installed {
            self.install()?;
        }
        info!(
            "Hotkey {} is delivered as SIGUSR1 (e.g. bind it to `pkill -SIGUSR1 overmark`)",
            binding
        );
        Ok(())
    }

    fn take_pending(&mut self) -> bool {
        self.toggle.swap(false, Ordering::Acquire)
    }
}

/// Hotkey pressed programmatically, for replays and tests.
#[derive(Debug, Default, Clone)]
pub struct ManualHotkey {
    pending: usize,
    registered: Option<KeyBinding>,
    fail_registration: bool,
}

impl ManualHotkey {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose registration always fails.
    pub fn failing() -> Self {
        Self {
            fail_registration: true,
            ..Self::default()
        }
    }

    pub fn press(&mut self) {
        self.pending += 1;
    }

    pub fn registered(&self) -> Option<&KeyBinding> {
        self.registered.as_ref()
    }
}

impl HotkeySource for ManualHotkey {
    fn register(&mut self, binding: &KeyBinding) -> Result<(), PlatformError> {
        if self.fail_registration {
            return Err(PlatformError::Hotkey {
                binding: binding.to_string(),
                reason: "registration refused".to_string(),
            });
        }
        self.registered = Some(binding.clone());
        Ok(())
    }

    fn take_pending(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}
