//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the default appearance of drawing tools the first time the overlay
/// opens. Values restored from preferences take precedence afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - either a named color (red, orange, yellow, green, blue,
    /// pink, white, black) or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_width")]
    pub default_width: f64,

    /// Font size for new text labels in pixels (valid range: 8.0 - 72.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Font family used for text labels (e.g., "Sans", "Monospace")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Maximum number of annotations kept on the overlay (0 = unlimited)
    #[serde(default = "default_max_annotations")]
    pub max_annotations: usize,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_width: default_width(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            max_annotations: default_max_annotations(),
        }
    }
}

/// Floating toolbar behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolbarConfig {
    /// Fade the toolbar after a period without interaction
    #[serde(default = "default_auto_hide")]
    pub auto_hide: bool,

    /// Idle time before fading, in milliseconds (valid range: 250 - 60000)
    #[serde(default = "default_fade_delay_ms")]
    pub fade_delay_ms: u64,

    /// Opacity of the faded toolbar (valid range: 0.0 - 1.0)
    #[serde(default = "default_faded_opacity")]
    pub faded_opacity: f64,

    /// Distance in pixels within which a dropped toolbar snaps to a screen edge
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: i32,

    /// Gap kept between a snapped toolbar and the screen edge
    #[serde(default = "default_edge_margin")]
    pub edge_margin: i32,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            auto_hide: default_auto_hide(),
            fade_delay_ms: default_fade_delay_ms(),
            faded_opacity: default_faded_opacity(),
            snap_threshold: default_snap_threshold(),
            edge_margin: default_edge_margin(),
        }
    }
}

/// Global toggle hotkey.
///
/// Wayland compositors do not let clients grab keys, so the daemon also
/// toggles on SIGUSR1; bind this combination to `pkill -SIGUSR1 overmark`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HotkeyConfig {
    /// Key combination that toggles drawing mode (e.g., "Super+Shift+D")
    #[serde(default = "default_toggle")]
    pub toggle: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_width() -> f64 {
    3.0
}

fn default_font_size() -> f64 {
    24.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_max_annotations() -> usize {
    10_000
}

fn default_auto_hide() -> bool {
    true
}

fn default_fade_delay_ms() -> u64 {
    3000
}

fn default_faded_opacity() -> f64 {
    0.25
}

fn default_snap_threshold() -> i32 {
    24
}

fn default_edge_margin() -> i32 {
    8
}

fn default_toggle() -> String {
    "Super+Shift+D".to_string()
}
