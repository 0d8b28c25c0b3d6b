//! Idle fade for the floating toolbar.
//!
//! The toolbar drops to a faded opacity after a period without interaction.
//! Every interaction restores full opacity and rearms the deadline. Hovering
//! suspends the timer entirely; leaving rearms it.

use std::time::{Duration, Instant};

use crate::config::ToolbarConfig;

/// Debounced fade timer driven by explicit timestamps.
#[derive(Debug, Clone)]
pub struct FadeController {
    enabled: bool,
    delay: Duration,
    faded_opacity: f64,
    opacity: f64,
    hovered: bool,
    deadline: Option<Instant>,
}

impl FadeController {
    /// Creates a controller at full opacity, armed from `now` when enabled.
    pub fn new(enabled: bool, delay: Duration, faded_opacity: f64, now: Instant) -> Self {
        let mut controller = Self {
            enabled,
            delay,
            faded_opacity: faded_opacity.clamp(0.0, 1.0),
            opacity: 1.0,
            hovered: false,
            deadline: None,
        };
        controller.rearm(now);
        controller
    }

    pub fn from_config(config: &ToolbarConfig, now: Instant) -> Self {
        Self::new(
            config.auto_hide,
            Duration::from_millis(config.fade_delay_ms),
            config.faded_opacity,
            now,
        )
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_faded(&self) -> bool {
        self.opacity < 1.0
    }

    /// When the next fade is due, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn rearm(&mut self, now: Instant) {
        self.deadline = if self.enabled && !self.hovered {
            Some(now + self.delay)
        } else {
            None
        };
    }

    fn set_opacity(&mut self, opacity: f64) -> bool {
        let changed = (self.opacity - opacity).abs() > f64::EPSILON;
        self.opacity = opacity;
        changed
    }

    /// Restores full opacity and reschedules the fade. Returns true if the
    /// opacity changed.
    pub fn record_activity(&mut self, now: Instant) -> bool {
        self.rearm(now);
        self.set_opacity(1.0)
    }

    /// Pointer entered or left the toolbar.
    pub fn set_hovered(&mut self, hovered: bool, now: Instant) -> bool {
        self.hovered = hovered;
        self.record_activity(now)
    }

    /// Turns auto-hide on or off. Disabled means always opaque.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) -> bool {
        self.enabled = enabled;
        self.record_activity(now)
    }

    /// Fades the toolbar once the deadline has passed. Returns true if the
    /// opacity changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.set_opacity(self.faded_opacity)
            }
            _ => false,
        }
    }
}
