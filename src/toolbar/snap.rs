//! Toolbar placement: dragging by the grip, edge snapping and clamping.

use crate::config::ToolbarConfig;
use crate::util::Rect;
use log::{debug, warn};

/// Screen assumed when the window system reports none.
pub const FALLBACK_SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

/// Returns the reported screen frame, or [`FALLBACK_SCREEN`] with a warning.
pub fn screen_or_default(screen: Option<Rect>) -> Rect {
    screen.unwrap_or_else(|| {
        warn!(
            "No screen found, assuming {}x{}",
            FALLBACK_SCREEN.width, FALLBACK_SCREEN.height
        );
        FALLBACK_SCREEN
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSettings {
    /// Snap when a dropped edge is at most this far from its target
    pub threshold: i32,
    /// Gap kept between a snapped toolbar and the screen edge
    pub margin: i32,
}

impl From<&ToolbarConfig> for SnapSettings {
    fn from(config: &ToolbarConfig) -> Self {
        Self {
            threshold: config.snap_threshold,
            margin: config.edge_margin,
        }
    }
}

fn clamp_axis(pos: i32, len: i32, min: i32, max: i32) -> i32 {
    if len >= max - min {
        min
    } else {
        pos.clamp(min, max - len)
    }
}

/// Moves `frame` so it lies fully on `screen`.
pub fn clamp_to_screen(frame: Rect, screen: Rect) -> Rect {
    Rect {
        x: clamp_axis(frame.x, frame.width, screen.x, screen.max_x()),
        y: clamp_axis(frame.y, frame.height, screen.y, screen.max_y()),
        ..frame
    }
}

fn snap_axis(pos: i32, len: i32, min: i32, max: i32, settings: SnapSettings) -> i32 {
    let near = min + settings.margin;
    let far = max - settings.margin - len;
    let to_near = (pos - near).abs();
    let to_far = (pos - far).abs();

    if to_near <= settings.threshold && to_near <= to_far {
        near
    } else if to_far <= settings.threshold {
        far
    } else {
        pos
    }
}

/// Snaps each axis to the nearest screen edge when within the threshold,
/// then clamps the frame on screen.
pub fn snap_to_edges(frame: Rect, screen: Rect, settings: SnapSettings) -> Rect {
    let snapped = Rect {
        x: snap_axis(frame.x, frame.width, screen.x, screen.max_x(), settings),
        y: snap_axis(frame.y, frame.height, screen.y, screen.max_y(), settings),
        ..frame
    };
    clamp_to_screen(snapped, screen)
}

/// Default origin: horizontally centred, snapped to the top edge.
pub fn default_origin(size: (i32, i32), screen: Rect, settings: SnapSettings) -> (i32, i32) {
    (
        screen.x + (screen.width - size.0) / 2,
        screen.y + settings.margin,
    )
}

/// Current toolbar frame plus the grab offset of an in-progress drag.
#[derive(Debug, Clone)]
pub struct ToolbarPlacement {
    frame: Rect,
    grab: Option<(i32, i32)>,
}

impl ToolbarPlacement {
    /// Places a toolbar of `size` at `origin` (or the default origin), clamped
    /// on screen.
    pub fn new(
        size: (i32, i32),
        origin: Option<(i32, i32)>,
        screen: Rect,
        settings: SnapSettings,
    ) -> Self {
        let (x, y) = origin.unwrap_or_else(|| default_origin(size, screen, settings));
        let frame = Rect {
            x,
            y,
            width: size.0,
            height: size.1,
        };
        Self {
            frame: clamp_to_screen(frame, screen),
            grab: None,
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.frame.x, self.frame.y)
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Starts a drag grabbed at the given screen point.
    pub fn begin_drag(&mut self, screen_x: i32, screen_y: i32) {
        self.grab = Some((screen_x - self.frame.x, screen_y - self.frame.y));
    }

    /// Moves the toolbar so the grab point follows the pointer. Returns true
    /// when the frame moved.
    pub fn drag_to(&mut self, screen_x: i32, screen_y: i32, screen: Rect) -> bool {
        let Some((dx, dy)) = self.grab else {
            return false;
        };
        let moved = clamp_to_screen(
            Rect {
                x: screen_x - dx,
                y: screen_y - dy,
                ..self.frame
            },
            screen,
        );
        let changed = moved != self.frame;
        self.frame = moved;
        changed
    }

    /// Ends the drag, snapping to nearby edges. Returns the final origin, or
    /// `None` when no drag was in progress.
    pub fn end_drag(&mut self, screen: Rect, settings: SnapSettings) -> Option<(i32, i32)> {
        self.grab.take()?;
        self.frame = snap_to_edges(self.frame, screen, settings);
        debug!("Toolbar dropped at ({}, {})", self.frame.x, self.frame.y);
        Some(self.origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: SnapSettings = SnapSettings {
        threshold: 24,
        margin: 8,
    };

    fn frame(x: i32, y: i32) -> Rect {
        Rect::new(x, y, 400, 44).unwrap()
    }

    #[test]
    fn snaps_to_near_edges() {
        let snapped = snap_to_edges(frame(20, 15), FALLBACK_SCREEN, SETTINGS);
        assert_eq!((snapped.x, snapped.y), (8, 8));

        let snapped = snap_to_edges(frame(1500, 1020), FALLBACK_SCREEN, SETTINGS);
        assert_eq!((snapped.x, snapped.y), (1920 - 8 - 400, 1080 - 8 - 44));
    }

    #[test]
    fn leaves_distant_positions_alone() {
        let snapped = snap_to_edges(frame(600, 500), FALLBACK_SCREEN, SETTINGS);
        assert_eq!((snapped.x, snapped.y), (600, 500));
    }

    #[test]
    fn clamps_offscreen_frames() {
        let clamped = clamp_to_screen(frame(-300, 2000), FALLBACK_SCREEN);
        assert_eq!((clamped.x, clamped.y), (0, 1080 - 44));

        let tiny = Rect::new(0, 0, 200, 30).unwrap();
        let clamped = clamp_to_screen(frame(50, 5), tiny);
        assert_eq!((clamped.x, clamped.y), (0, 0));
    }

    #[test]
    fn drag_preserves_grab_offset_and_snaps_on_drop() {
        let mut placement = ToolbarPlacement::new((400, 44), Some((700, 300)), FALLBACK_SCREEN, SETTINGS);
        placement.begin_drag(710, 320);
        assert!(placement.is_dragging());

        assert!(placement.drag_to(30, 40, FALLBACK_SCREEN));
        assert_eq!(placement.origin(), (20, 20));

        assert_eq!(placement.end_drag(FALLBACK_SCREEN, SETTINGS), Some((8, 8)));
        assert!(!placement.is_dragging());
        assert_eq!(placement.end_drag(FALLBACK_SCREEN, SETTINGS), None);
    }

    #[test]
    fn default_origin_is_top_centre() {
        let placement = ToolbarPlacement::new((400, 44), None, FALLBACK_SCREEN, SETTINGS);
        assert_eq!(placement.origin(), (760, 8));
    }

    #[test]
    fn missing_screen_falls_back() {
        assert_eq!(screen_or_default(None), FALLBACK_SCREEN);
        let screen = Rect::new(0, 0, 2560, 1440).unwrap();
        assert_eq!(screen_or_default(Some(screen)), screen);
    }
}
