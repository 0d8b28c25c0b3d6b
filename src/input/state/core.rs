//! Drawing state machine and input state management.

use crate::config::{Action, KeyBinding, MAX_WIDTH, MIN_WIDTH};
use crate::draw::{
    AnnotationId, AnnotationStore, Color, DirtyTracker,
    annotation::{
        HIGHLIGHTER_WIDTH_SCALE, bounding_box_for_box, bounding_box_for_points,
        bounding_box_for_text,
    },
};
use crate::input::{modifiers::Modifiers, selection::Selection, tool::Tool};
use crate::util::Rect;
use log::debug;
use std::collections::HashMap;

/// Current drag state machine.
///
/// Tracks whether the user is idle or holding the primary button down with a
/// drawing tool. Text editing is not a drag: it lives in the [`Selection`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingState {
    /// Not dragging - waiting for user input
    Idle,
    /// Primary button held down with a drawing tool
    Drawing {
        /// Which tool started this drag
        tool: Tool,
        /// Starting X coordinate (where the button was pressed)
        start_x: i32,
        /// Starting Y coordinate (where the button was pressed)
        start_y: i32,
        /// Latest pointer X coordinate
        current_x: i32,
        /// Latest pointer Y coordinate
        current_y: i32,
        /// Raw points traced so far (pen and highlighter only)
        points: Vec<(i32, i32)>,
    },
}

/// Categories of state that changed since the last [`InputState::take_changes`].
///
/// The application turns these into observer notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateChanges {
    /// Annotations were added, removed or edited
    pub annotations: bool,
    /// Selection or edit focus moved
    pub selection: bool,
    /// Active tool changed
    pub tool: bool,
    /// Current color or width changed
    pub style: bool,
    /// The final Escape step asked to leave drawing mode
    pub exit: bool,
}

impl StateChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Main input state containing the annotation session.
///
/// This struct holds the annotation store, the selection, the active tool and
/// style, modifier keys and the drag state machine. It processes keyboard and
/// pointer events and records which parts of the state changed and which
/// screen regions need repainting.
pub struct InputState {
    /// All annotations on the overlay, in draw order
    pub annotations: AnnotationStore,
    /// Selected annotation and text-edit focus
    pub(crate) selection: Selection,
    /// Active tool (single writer: [`InputState::set_tool`])
    tool: Tool,
    /// Current drawing color
    pub current_color: Color,
    /// Current stroke width in pixels (1.0 - 20.0)
    pub current_width: f64,
    /// Font size for new text labels in pixels
    pub font_size: f64,
    /// Font family for text labels
    pub font_family: String,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Current drag state
    pub state: DrawingState,
    /// Set by the last Escape step; cleared by [`InputState::prepare_for_hide`]
    pub exit_requested: bool,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Screen width in pixels (set by the host)
    pub screen_width: u32,
    /// Screen height in pixels (set by the host)
    pub screen_height: u32,
    /// Tracks dirty regions between renders
    pub(crate) dirty_tracker: DirtyTracker,
    /// Cached bounds for the current provisional drag preview (if any)
    pub(crate) last_provisional_bounds: Option<Rect>,
    /// Keybinding action map
    action_map: HashMap<KeyBinding, Action>,
    /// Maximum number of annotations (0 = unlimited)
    pub max_annotations: usize,
    changes: StateChanges,
}

impl InputState {
    /// Creates a new InputState with the pen tool and the given style.
    ///
    /// Screen dimensions default to 0 and should be set by the host through
    /// [`update_screen_dimensions`](Self::update_screen_dimensions).
    pub fn with_defaults(
        color: Color,
        width: f64,
        font_size: f64,
        font_family: String,
        action_map: HashMap<KeyBinding, Action>,
        max_annotations: usize,
    ) -> Self {
        Self {
            annotations: AnnotationStore::new(),
            selection: Selection::new(),
            tool: Tool::Pen,
            current_color: color,
            current_width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            font_size,
            font_family,
            modifiers: Modifiers::new(),
            state: DrawingState::Idle,
            exit_requested: false,
            needs_redraw: true,
            screen_width: 0,
            screen_height: 0,
            dirty_tracker: DirtyTracker::new(),
            last_provisional_bounds: None,
            action_map,
            max_annotations,
            changes: StateChanges::default(),
        }
    }

    /// Updates screen dimensions after the host learns the surface size.
    pub fn update_screen_dimensions(&mut self, width: u32, height: u32) {
        self.screen_width = width;
        self.screen_height = height;
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing { .. })
    }

    /// Drains the accumulated change flags.
    pub fn take_changes(&mut self) -> StateChanges {
        std::mem::take(&mut self.changes)
    }

    /// Drains pending dirty rectangles for the current surface size.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        let width = self.screen_width.min(i32::MAX as u32) as i32;
        let height = self.screen_height.min(i32::MAX as u32) as i32;
        self.dirty_tracker.take_regions(width, height)
    }

    /// Makes the next redraw repaint the whole surface.
    pub fn request_full_redraw(&mut self) {
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
    }

    pub(crate) fn mark_annotation_dirty(&mut self, id: AnnotationId) {
        if let Some(annotation) = self.annotations.get(id) {
            self.dirty_tracker.mark_annotation(annotation);
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Tool and style
    // ------------------------------------------------------------------

    /// Switches the active tool.
    ///
    /// Every switch cancels the drag, drops blank text labels and clears the
    /// selection, even when the tool does not change.
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel_drag();
        self.clear_selection();
        self.remove_blank_text();

        if self.tool != tool {
            debug!("Tool changed: {} -> {}", self.tool, tool);
            self.tool = tool;
            self.changes.tool = true;
            self.needs_redraw = true;
        }
    }

    /// Sets the drawing color and restyles the selected annotation.
    pub fn set_color(&mut self, color: Color) {
        if self.current_color != color {
            self.current_color = color;
            self.changes.style = true;
        }

        if let Some(id) = self.selection.selected() {
            if let Some(annotation) = self.annotations.get_mut(id) {
                if annotation.color != color {
                    annotation.color = color;
                    self.changes.annotations = true;
                    self.mark_annotation_dirty(id);
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Sets the stroke width (clamped to 1.0 - 20.0) and restyles the selected
    /// non-text annotation.
    pub fn set_width(&mut self, width: f64) {
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        if (self.current_width - width).abs() > f64::EPSILON {
            self.current_width = width;
            self.changes.style = true;
            debug!("Width set to {:.0}px", width);
        }

        if let Some(id) = self.selection.selected() {
            let old_bounds = self.annotations.get(id).and_then(|a| a.bounding_box());
            if let Some(annotation) = self.annotations.get_mut(id) {
                if !annotation.is_text() && annotation.width != width {
                    annotation.width = width;
                    self.changes.annotations = true;
                    self.dirty_tracker.mark_optional_rect(old_bounds);
                    self.mark_annotation_dirty(id);
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Adjusts the stroke width by `delta`, clamping to the valid range.
    pub fn adjust_width(&mut self, delta: f64) {
        self.set_width(self.current_width + delta);
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects `id` without edit focus. Unknown ids are ignored.
    ///
    /// A different text annotation losing focus is blurred first, so a blank
    /// label disappears as soon as something else is selected.
    pub fn select(&mut self, id: AnnotationId) -> bool {
        if !self.annotations.contains(id) {
            return false;
        }
        if self.selection.focused().is_some_and(|focused| focused != id) {
            self.blur();
        }
        if let Some(previous) = self.selection.selected() {
            self.mark_annotation_dirty(previous);
        }
        self.selection.select(id);
        self.mark_annotation_dirty(id);
        self.changes.selection = true;
        true
    }

    /// Selects a text annotation and gives it edit focus.
    pub fn focus(&mut self, id: AnnotationId) -> bool {
        if !self.annotations.get(id).is_some_and(|a| a.is_text()) {
            return false;
        }
        if self.selection.focused() == Some(id) {
            return true;
        }
        self.select(id);
        self.selection.focus(id);
        self.changes.selection = true;
        debug!("Editing text {}", id);
        true
    }

    /// Drops edit focus. The annotation stays selected unless its trimmed text
    /// is empty, in which case it is removed.
    pub fn blur(&mut self) -> Option<AnnotationId> {
        let id = self.selection.blur()?;
        self.changes.selection = true;
        self.mark_annotation_dirty(id);

        if self.annotations.get(id).is_some_and(|a| a.is_blank_text()) {
            self.annotations.remove(id);
            self.selection.forget(id);
            self.changes.annotations = true;
            debug!("Removed blank text {} on blur", id);
        }
        Some(id)
    }

    /// Blurs and deselects (background click).
    pub fn clear_selection(&mut self) {
        self.blur();
        if let Some(id) = self.selection.selected() {
            self.mark_annotation_dirty(id);
            self.selection.clear();
            self.changes.selection = true;
        }
    }

    /// Deletes the selected annotation, if any.
    pub fn delete_selection(&mut self) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        self.mark_annotation_dirty(id);
        self.selection.clear();
        self.changes.selection = true;
        if self.annotations.remove(id).is_some() {
            self.changes.annotations = true;
            debug!("Deleted annotation {}", id);
        }
        true
    }

    /// Removes every text annotation whose trimmed content is empty.
    pub fn remove_blank_text(&mut self) -> usize {
        let removed = self.annotations.remove_blank_text();
        for annotation in &removed {
            self.dirty_tracker.mark_annotation(annotation);
            if self.selection.is_selected(annotation.id)
                || self.selection.focused() == Some(annotation.id)
            {
                self.changes.selection = true;
            }
            self.selection.forget(annotation.id);
        }
        if !removed.is_empty() {
            self.changes.annotations = true;
            self.needs_redraw = true;
        }
        removed.len()
    }

    // ------------------------------------------------------------------
    // Whole-canvas operations
    // ------------------------------------------------------------------

    /// Removes the most recently added annotation.
    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        match self.annotations.undo() {
            Some(annotation) => {
                self.dirty_tracker.mark_annotation(&annotation);
                if self.selection.is_selected(annotation.id) {
                    self.changes.selection = true;
                }
                self.selection.forget(annotation.id);
                self.changes.annotations = true;
                self.needs_redraw = true;
                debug!("Undid {} {}", annotation.kind_name(), annotation.id);
                true
            }
            None => false,
        }
    }

    /// Removes every annotation.
    pub fn clear_canvas(&mut self) {
        self.cancel_drag();
        if self.selection.selected().is_some() {
            self.changes.selection = true;
        }
        self.selection.clear();
        if !self.annotations.is_empty() {
            self.annotations.clear();
            self.changes.annotations = true;
        }
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
    }

    /// Removes every annotation intersecting `rect`. Returns how many were erased.
    pub fn erase(&mut self, rect: Rect) -> usize {
        let removed = self.annotations.erase_intersecting(rect);
        for annotation in &removed {
            self.dirty_tracker.mark_annotation(annotation);
            if self.selection.is_selected(annotation.id) {
                self.changes.selection = true;
            }
            self.selection.forget(annotation.id);
        }
        if !removed.is_empty() {
            self.changes.annotations = true;
            self.needs_redraw = true;
            debug!("Erased {} annotation(s)", removed.len());
        }
        removed.len()
    }

    /// Cancels an in-progress drag. Returns true when there was one.
    pub fn cancel_drag(&mut self) -> bool {
        if self.is_drawing() {
            self.state = DrawingState::Idle;
            self.clear_provisional_dirty();
            self.needs_redraw = true;
            true
        } else {
            false
        }
    }

    /// Resets transient state before the overlay is hidden.
    ///
    /// Cancels the drag, ends text editing, drops blank labels and clears the
    /// selection. Annotations themselves are kept for the next session.
    pub fn prepare_for_hide(&mut self) {
        self.cancel_drag();
        self.clear_selection();
        self.remove_blank_text();
        self.modifiers.reset();
        self.exit_requested = false;
    }

    pub(super) fn request_exit(&mut self) {
        self.exit_requested = true;
        self.changes.exit = true;
    }

    pub(super) fn note_annotations_changed(&mut self) {
        self.changes.annotations = true;
    }

    // ------------------------------------------------------------------
    // Provisional drag preview
    // ------------------------------------------------------------------

    /// Clears any cached provisional bounds and marks their damage region.
    pub(crate) fn clear_provisional_dirty(&mut self) {
        if let Some(prev) = self.last_provisional_bounds.take() {
            self.dirty_tracker.mark_rect(prev);
        }
    }

    /// Updates tracked provisional bounds for dirty-region purposes.
    pub(crate) fn update_provisional_dirty(&mut self) {
        let new_bounds = self.compute_provisional_bounds();
        let previous = self.last_provisional_bounds;

        if new_bounds != previous {
            if let Some(prev) = previous {
                self.dirty_tracker.mark_rect(prev);
            }
        }

        if let Some(bounds) = new_bounds {
            self.dirty_tracker.mark_rect(bounds);
        }
        self.last_provisional_bounds = new_bounds;
    }

    fn compute_provisional_bounds(&self) -> Option<Rect> {
        let DrawingState::Drawing {
            tool,
            start_x,
            start_y,
            current_x,
            current_y,
            points,
        } = &self.state
        else {
            return None;
        };

        match tool {
            Tool::Pen => bounding_box_for_points(points, self.current_width),
            Tool::Highlighter => {
                bounding_box_for_points(points, self.current_width * HIGHLIGHTER_WIDTH_SCALE)
            }
            Tool::Rectangle | Tool::Circle => {
                let rect = Rect::from_corners(*start_x, *start_y, *current_x, *current_y);
                bounding_box_for_box(rect.x, rect.y, rect.width, rect.height, self.current_width)
            }
            Tool::Eraser => {
                Some(Rect::from_corners(*start_x, *start_y, *current_x, *current_y).inflate(2))
            }
            Tool::Text => bounding_box_for_text(*current_x, *current_y, "", self.font_size),
            Tool::Cursor => None,
        }
    }

    /// Look up an action for the given key and the held modifiers.
    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        self.action_map
            .iter()
            .find(|(binding, _)| {
                binding.matches(
                    key_str,
                    self.modifiers.ctrl,
                    self.modifiers.shift,
                    self.modifiers.alt,
                )
            })
            .map(|(_, action)| *action)
    }
}
