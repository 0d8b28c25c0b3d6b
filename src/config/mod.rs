//! Configuration file support for overmark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/overmark/config.toml`. Settings include drawing defaults,
//! toolbar fade/snap behaviour, the toggle hotkey and the overlay keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

pub use enums::ColorSpec;
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{DrawingConfig, HotkeyConfig, ToolbarConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Smallest stroke width the tools accept.
pub const MIN_WIDTH: f64 = 1.0;
/// Largest stroke width the tools accept.
pub const MAX_WIDTH: f64 = 20.0;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_width = 3.0
/// font_size = 24.0
///
/// [toolbar]
/// auto_hide = true
/// fade_delay_ms = 3000
///
/// [hotkey]
/// toggle = "Super+Shift+D"
///
/// [keybindings]
/// undo = ["Ctrl+Z"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Drawing tool defaults (color, width, font size)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Floating toolbar fade and snapping
    #[serde(default)]
    pub toolbar: ToolbarConfig,

    /// Global toggle hotkey
    #[serde(default)]
    pub hotkey: HotkeyConfig,

    /// Overlay keybindings
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_width`: 1.0 - 20.0
    /// - `font_size`: 8.0 - 72.0
    /// - `fade_delay_ms`: 250 - 60000
    /// - `faded_opacity`: 0.0 - 1.0
    /// - `snap_threshold`, `edge_margin`: 0 - 200
    pub fn validate_and_clamp(&mut self) {
        let drawing = DrawingConfig::default();
        clamp_float(
            "default_width",
            &mut self.drawing.default_width,
            MIN_WIDTH..=MAX_WIDTH,
            drawing.default_width,
        );
        clamp_float(
            "font_size",
            &mut self.drawing.font_size,
            8.0..=72.0,
            drawing.font_size,
        );

        if self.drawing.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Sans'");
            self.drawing.font_family = "Sans".to_string();
        }

        if !(250..=60_000).contains(&self.toolbar.fade_delay_ms) {
            warn!(
                "Invalid fade_delay_ms {}, clamping to 250-60000 range",
                self.toolbar.fade_delay_ms
            );
            self.toolbar.fade_delay_ms = self.toolbar.fade_delay_ms.clamp(250, 60_000);
        }

        clamp_float(
            "faded_opacity",
            &mut self.toolbar.faded_opacity,
            0.0..=1.0,
            ToolbarConfig::default().faded_opacity,
        );

        if !(0..=200).contains(&self.toolbar.snap_threshold) {
            warn!(
                "Invalid snap_threshold {}, clamping to 0-200 range",
                self.toolbar.snap_threshold
            );
            self.toolbar.snap_threshold = self.toolbar.snap_threshold.clamp(0, 200);
        }

        if !(0..=200).contains(&self.toolbar.edge_margin) {
            warn!(
                "Invalid edge_margin {}, clamping to 0-200 range",
                self.toolbar.edge_margin
            );
            self.toolbar.edge_margin = self.toolbar.edge_margin.clamp(0, 200);
        }

        if let Err(err) = KeyBinding::parse(&self.hotkey.toggle) {
            warn!(
                "Invalid toggle hotkey '{}' ({}), falling back to 'Super+Shift+D'",
                self.hotkey.toggle, err
            );
            self.hotkey.toggle = HotkeyConfig::default().toggle;
        }
    }

    /// Returns the overmark configuration directory (`~/.config/overmark`).
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not find config directory")?
            .join("overmark"))
    }

    /// Returns the path to the configuration file.
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`.
    ///
    /// A missing file yields the defaults. All loaded values are validated and
    /// clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Returns the JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Clamps `value` into `range`; NaN and infinities take `default` instead.
fn clamp_float(name: &str, value: &mut f64, range: RangeInclusive<f64>, default: f64) {
    if !value.is_finite() {
        warn!("Invalid {} {}, using default {}", name, value, default);
        *value = default;
    } else if !range.contains(value) {
        warn!(
            "Invalid {} {:.2}, clamping to {}-{} range",
            name,
            value,
            range.start(),
            range.end()
        );
        *value = value.clamp(*range.start(), *range.end());
    }
}
