use crate::config::Action;
use crate::draw::color;
use crate::input::{events::Key, tool::Tool};
use log::debug;

use super::InputState;

/// Which transition a single Escape press performed.
///
/// Escape walks down one step per press; every step consumes the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeStep {
    /// An in-progress drag was cancelled
    CancelDrag,
    /// Text editing ended; the label stays selected
    StopEditing,
    /// The selection was cleared
    Deselect,
    /// Nothing left to unwind: leave drawing mode
    Exit,
}

impl InputState {
    /// Processes a key press event.
    ///
    /// Handles all keyboard input including:
    /// - Modifier key tracking
    /// - Text editing of the focused label
    /// - Configurable actions (tools, colors, width, undo, clear, delete, exit)
    pub fn on_key_press(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                return;
            }
            Key::Alt => {
                self.modifiers.alt = true;
                return;
            }
            _ => {}
        }

        let Some(key_str) = key.binding_name() else {
            return;
        };

        if self.selection.is_editing() {
            // Plain keys type text; only Escape and Ctrl/Alt chords reach the bindings
            let should_check_actions =
                matches!(key, Key::Escape) || self.modifiers.command_held();

            if should_check_actions {
                if let Some(action) = self.find_action(&key_str) {
                    self.handle_action(action);
                    return;
                }
            }

            if key == Key::Escape {
                self.escape();
            } else {
                self.edit_focused_text(key);
            }
            return;
        }

        if let Some(action) = self.find_action(&key_str) {
            self.handle_action(action);
        } else if key == Key::Escape {
            // Escape always steps back, whatever `exit` is bound to.
            self.escape();
        }
    }

    /// Processes a key release event (modifier tracking only).
    pub fn on_key_release(&mut self, key: Key) {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Ctrl => self.modifiers.ctrl = false,
            Key::Alt => self.modifiers.alt = false,
            _ => {}
        }
    }

    fn edit_focused_text(&mut self, key: Key) {
        let Some(id) = self.selection.focused() else {
            return;
        };

        let newline = self.modifiers.shift;
        match key {
            Key::Return if !newline => {
                self.blur();
                return;
            }
            Key::Char(_) | Key::Space | Key::Backspace | Key::Return => {}
            _ => return,
        }

        // Old bounds first: deleting characters shrinks the label
        self.mark_annotation_dirty(id);
        let edited = self.annotations.edit_text(id, |text| match key {
            Key::Char(c) => text.push(c),
            Key::Space => text.push(' '),
            Key::Return => text.push('\n'),
            _ => {
                text.pop();
            }
        });
        if edited {
            self.mark_annotation_dirty(id);
            self.note_annotations_changed();
        }
    }

    /// Handle an action triggered by a keybinding.
    pub(super) fn handle_action(&mut self, action: Action) {
        match action {
            Action::Exit => {
                self.escape();
            }
            Action::SelectCursor => self.set_tool(Tool::Cursor),
            Action::SelectPen => self.set_tool(Tool::Pen),
            Action::SelectHighlighter => self.set_tool(Tool::Highlighter),
            Action::SelectRectangle => self.set_tool(Tool::Rectangle),
            Action::SelectCircle => self.set_tool(Tool::Circle),
            Action::SelectText => self.set_tool(Tool::Text),
            Action::SelectEraser => self.set_tool(Tool::Eraser),
            Action::Undo => {
                self.undo();
            }
            Action::ClearCanvas => self.clear_canvas(),
            Action::DeleteSelection => {
                self.delete_selection();
            }
            Action::IncreaseWidth => self.adjust_width(1.0),
            Action::DecreaseWidth => self.adjust_width(-1.0),
            Action::SetColorRed => self.set_color(color::RED),
            Action::SetColorOrange => self.set_color(color::ORANGE),
            Action::SetColorYellow => self.set_color(color::YELLOW),
            Action::SetColorGreen => self.set_color(color::GREEN),
            Action::SetColorBlue => self.set_color(color::BLUE),
            Action::SetColorPink => self.set_color(color::PINK),
            Action::SetColorWhite => self.set_color(color::WHITE),
            Action::SetColorBlack => self.set_color(color::BLACK),
        }
    }

    /// Performs one step of the Escape ladder.
    ///
    /// drag → cancelled; editing → selected; selected → nothing selected;
    /// nothing selected → exit requested.
    pub fn escape(&mut self) -> EscapeStep {
        let step = if self.cancel_drag() {
            EscapeStep::CancelDrag
        } else if self.selection.is_editing() {
            self.blur();
            EscapeStep::StopEditing
        } else if self.selection.selected().is_some() {
            self.clear_selection();
            EscapeStep::Deselect
        } else {
            self.request_exit();
            EscapeStep::Exit
        };
        debug!("Escape: {:?}", step);
        step
    }
}
