//! Keybinding configuration types and parsing.
//!
//! This module defines the configurable keybinding system that allows users
//! to customize keyboard shortcuts for all overlay actions, plus the parser
//! shared with the global toggle hotkey.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// All possible actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Escape ladder: cancel drag, stop editing, deselect, leave drawing mode
    Exit,

    // Tool selection
    SelectCursor,
    SelectPen,
    SelectHighlighter,
    SelectRectangle,
    SelectCircle,
    SelectText,
    SelectEraser,

    // Editing
    Undo,
    ClearCanvas,
    DeleteSelection,

    // Width controls
    IncreaseWidth,
    DecreaseWidth,

    // Color selections
    SetColorRed,
    SetColorOrange,
    SetColorYellow,
    SetColorGreen,
    SetColorBlue,
    SetColorPink,
    SetColorWhite,
    SetColorBlack,
}

/// A single keybinding: a key with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Super/Logo modifier; only meaningful for global hotkeys
    pub logo: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+W" or "Escape".
    /// Modifiers can appear in any order: "Shift+Ctrl+W", "Alt+Shift+Ctrl+W", etc.
    /// Supports spaces around '+' (e.g., "Ctrl + Shift + W")
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut logo = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                "super" | "logo" | "meta" | "cmd" => logo = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into ["Ctrl", "", ""]: the key itself is '+'
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
            logo,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        !self.logo
            && self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.logo {
            f.write_str("Super+")?;
        }
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings. Users specify them in config.toml as:
/// ```toml
/// [keybindings]
/// exit = ["Escape"]
/// undo = ["Ctrl+Z"]
/// select_pen = ["P"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_exit")]
    pub exit: Vec<String>,

    #[serde(default = "default_select_cursor")]
    pub select_cursor: Vec<String>,

    #[serde(default = "default_select_pen")]
    pub select_pen: Vec<String>,

    #[serde(default = "default_select_highlighter")]
    pub select_highlighter: Vec<String>,

    #[serde(default = "default_select_rectangle")]
    pub select_rectangle: Vec<String>,

    #[serde(default = "default_select_circle")]
    pub select_circle: Vec<String>,

    #[serde(default = "default_select_text")]
    pub select_text: Vec<String>,

    #[serde(default = "default_select_eraser")]
    pub select_eraser: Vec<String>,

    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_delete_selection")]
    pub delete_selection: Vec<String>,

    #[serde(default = "default_increase_width")]
    pub increase_width: Vec<String>,

    #[serde(default = "default_decrease_width")]
    pub decrease_width: Vec<String>,

    #[serde(default = "default_set_color_red")]
    pub set_color_red: Vec<String>,

    #[serde(default = "default_set_color_orange")]
    pub set_color_orange: Vec<String>,

    #[serde(default = "default_set_color_yellow")]
    pub set_color_yellow: Vec<String>,

    #[serde(default = "default_set_color_green")]
    pub set_color_green: Vec<String>,

    #[serde(default = "default_set_color_blue")]
    pub set_color_blue: Vec<String>,

    #[serde(default = "default_set_color_pink")]
    pub set_color_pink: Vec<String>,

    #[serde(default = "default_set_color_white")]
    pub set_color_white: Vec<String>,

    #[serde(default = "default_set_color_black")]
    pub set_color_black: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            exit: default_exit(),
            select_cursor: default_select_cursor(),
            select_pen: default_select_pen(),
            select_highlighter: default_select_highlighter(),
            select_rectangle: default_select_rectangle(),
            select_circle: default_select_circle(),
            select_text: default_select_text(),
            select_eraser: default_select_eraser(),
            undo: default_undo(),
            clear_canvas: default_clear_canvas(),
            delete_selection: default_delete_selection(),
            increase_width: default_increase_width(),
            decrease_width: default_decrease_width(),
            set_color_red: default_set_color_red(),
            set_color_orange: default_set_color_orange(),
            set_color_yellow: default_set_color_yellow(),
            set_color_green: default_set_color_green(),
            set_color_blue: default_set_color_blue(),
            set_color_pink: default_set_color_pink(),
            set_color_white: default_set_color_white(),
            set_color_black: default_set_color_black(),
        }
    }
}

impl KeybindingsConfig {
    fn entries(&self) -> [(&[String], Action); 21] {
        [
            (&self.exit, Action::Exit),
            (&self.select_cursor, Action::SelectCursor),
            (&self.select_pen, Action::SelectPen),
            (&self.select_highlighter, Action::SelectHighlighter),
            (&self.select_rectangle, Action::SelectRectangle),
            (&self.select_circle, Action::SelectCircle),
            (&self.select_text, Action::SelectText),
            (&self.select_eraser, Action::SelectEraser),
            (&self.undo, Action::Undo),
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.delete_selection, Action::DeleteSelection),
            (&self.increase_width, Action::IncreaseWidth),
            (&self.decrease_width, Action::DecreaseWidth),
            (&self.set_color_red, Action::SetColorRed),
            (&self.set_color_orange, Action::SetColorOrange),
            (&self.set_color_yellow, Action::SetColorYellow),
            (&self.set_color_green, Action::SetColorGreen),
            (&self.set_color_blue, Action::SetColorBlue),
            (&self.set_color_pink, Action::SetColorPink),
            (&self.set_color_white, Action::SetColorWhite),
            (&self.set_color_black, Action::SetColorBlack),
        ]
    }

    /// Build a lookup map from keybindings to actions.
    /// Returns an error if any keybinding string is invalid or duplicated.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        for (binding_strs, action) in self.entries() {
            for binding_str in binding_strs {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn default_exit() -> Vec<String> {
    vec!["Escape".to_string()]
}

fn default_select_cursor() -> Vec<String> {
    vec!["V".to_string()]
}

fn default_select_pen() -> Vec<String> {
    vec!["P".to_string()]
}

fn default_select_highlighter() -> Vec<String> {
    vec!["H".to_string()]
}

fn default_select_rectangle() -> Vec<String> {
    vec!["R".to_string()]
}

fn default_select_circle() -> Vec<String> {
    vec!["O".to_string()]
}

fn default_select_text() -> Vec<String> {
    vec!["T".to_string()]
}

fn default_select_eraser() -> Vec<String> {
    vec!["E".to_string()]
}

fn default_undo() -> Vec<String> {
    vec!["Ctrl+Z".to_string()]
}

fn default_clear_canvas() -> Vec<String> {
    vec!["Ctrl+Shift+E".to_string()]
}

fn default_delete_selection() -> Vec<String> {
    vec!["Delete".to_string(), "Backspace".to_string()]
}

fn default_increase_width() -> Vec<String> {
    vec!["+".to_string(), "=".to_string(), "Shift++".to_string()]
}

fn default_decrease_width() -> Vec<String> {
    vec!["-".to_string(), "Shift+_".to_string()]
}

fn default_set_color_red() -> Vec<String> {
    vec!["1".to_string()]
}

fn default_set_color_orange() -> Vec<String> {
    vec!["2".to_string()]
}

fn default_set_color_yellow() -> Vec<String> {
    vec!["3".to_string()]
}

fn default_set_color_green() -> Vec<String> {
    vec!["4".to_string()]
}

fn default_set_color_blue() -> Vec<String> {
    vec!["5".to_string()]
}

fn default_set_color_pink() -> Vec<String> {
    vec!["6".to_string()]
}

fn default_set_color_white() -> Vec<String> {
    vec!["7".to_string()]
}

fn default_set_color_black() -> Vec<String> {
    vec!["8".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert_eq!(binding.key, "Escape");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
        assert!(!binding.logo);
    }

    #[test]
    fn test_parse_ctrl_shift_key() {
        let binding = KeyBinding::parse("Ctrl+Shift+W").unwrap();
        assert_eq!(binding.key, "W");
        assert!(binding.ctrl);
        assert!(binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_with_spaces_and_any_order() {
        let spaced = KeyBinding::parse("Ctrl + Shift + W").unwrap();
        let reordered = KeyBinding::parse("Shift+Ctrl+W").unwrap();
        assert_eq!(spaced, reordered);
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = KeyBinding::parse("Shift++").unwrap();
        assert_eq!(binding.key, "+");
        assert!(binding.shift);
    }

    #[test]
    fn test_parse_super_hotkey_and_display() {
        let binding = KeyBinding::parse("Super+Shift+D").unwrap();
        assert!(binding.logo);
        assert_eq!(binding.to_string(), "Super+Shift+D");
        // Global hotkeys never fire from inside the overlay
        assert!(!binding.matches("D", false, true, false));
    }

    #[test]
    fn test_parse_rejects_modifier_only() {
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
        assert!(KeyBinding::parse("   ").is_err());
    }

    #[test]
    fn test_matches() {
        let binding = KeyBinding::parse("Ctrl+Z").unwrap();
        assert!(binding.matches("z", true, false, false));
        assert!(!binding.matches("Z", false, false, false));
        assert!(!binding.matches("Z", true, true, false));
    }

    #[test]
    fn test_build_action_map() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let escape = KeyBinding::parse("Escape").unwrap();
        assert_eq!(map.get(&escape), Some(&Action::Exit));

        let pen = KeyBinding::parse("P").unwrap();
        assert_eq!(map.get(&pen), Some(&Action::SelectPen));

        let delete = KeyBinding::parse("Backspace").unwrap();
        assert_eq!(map.get(&delete), Some(&Action::DeleteSelection));
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let mut config = KeybindingsConfig::default();
        config.select_pen = vec!["Ctrl+Z".to_string()];

        let err_msg = config.build_action_map().unwrap_err();
        assert!(err_msg.contains("Duplicate keybinding"));
        assert!(err_msg.contains("Ctrl+Z"));
    }

    #[test]
    fn test_duplicate_with_different_modifier_order() {
        let mut config = KeybindingsConfig::default();
        config.undo = vec!["Ctrl+Shift+W".to_string()];
        config.clear_canvas = vec!["Shift+Ctrl+W".to_string()];

        assert!(config.build_action_map().is_err());
    }
}
