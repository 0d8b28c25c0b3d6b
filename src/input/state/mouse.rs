use crate::draw::{AnnotationId, AnnotationKind, PathStyle};
use crate::input::{events::MouseButton, tool::Tool};
use crate::util::Rect;
use log::{debug, warn};

use super::{DrawingState, InputState};

/// Half-size of the square erased by an eraser click without movement.
pub const ERASER_CLICK_RADIUS: i32 = 4;
/// Shape drags smaller than this on both axes are treated as clicks.
pub const MIN_SHAPE_SIZE: i32 = 2;

impl InputState {
    /// Processes a mouse button press event on the overlay.
    ///
    /// # Behavior
    /// - Cursor tool: ignored (the overlay is click-through)
    /// - Text tool on an existing label: selects and focuses it, no drag
    /// - Text tool on background while a label is focused: blurs it and
    ///   consumes the press
    /// - Any other left press: clears the selection and starts a drag
    /// - Right click: cancels the current drag
    pub fn on_mouse_press(&mut self, button: MouseButton, x: i32, y: i32) {
        match button {
            MouseButton::Left => {
                if self.tool().is_passthrough() || self.is_drawing() {
                    return;
                }

                if self.tool() == Tool::Text {
                    if let Some(id) = self.annotations.hit_test_text(x, y) {
                        self.focus(id);
                        return;
                    }
                    if self.selection.is_editing() {
                        self.clear_selection();
                        return;
                    }
                }

                self.clear_selection();

                let tool = self.tool();
                let points = if tool.collects_points() {
                    vec![(x, y)]
                } else {
                    Vec::new()
                };
                self.state = DrawingState::Drawing {
                    tool,
                    start_x: x,
                    start_y: y,
                    current_x: x,
                    current_y: y,
                    points,
                };
                self.update_provisional_dirty();
                self.needs_redraw = true;
            }
            MouseButton::Right => {
                if self.cancel_drag() {
                    debug!("Drag cancelled with right button");
                }
            }
            MouseButton::Middle => {}
        }
    }

    /// Processes pointer motion while a drag is in progress.
    ///
    /// Pen and highlighter accumulate raw points; every other tool only moves
    /// the current corner.
    pub fn on_mouse_motion(&mut self, x: i32, y: i32) {
        let DrawingState::Drawing {
            tool,
            current_x,
            current_y,
            points,
            ..
        } = &mut self.state
        else {
            return;
        };

        if (*current_x, *current_y) == (x, y) {
            return;
        }
        *current_x = x;
        *current_y = y;
        if tool.collects_points() {
            points.push((x, y));
        }

        self.update_provisional_dirty();
        self.needs_redraw = true;
    }

    /// Processes mouse button release events and commits the drag.
    ///
    /// A release that barely moved from the press point acts as a click: it
    /// selects the annotation under the pointer instead of drawing.
    pub fn on_mouse_release(&mut self, button: MouseButton, x: i32, y: i32) {
        if button != MouseButton::Left {
            return;
        }

        let DrawingState::Drawing {
            tool,
            start_x,
            start_y,
            mut points,
            ..
        } = std::mem::replace(&mut self.state, DrawingState::Idle)
        else {
            return;
        };

        self.clear_provisional_dirty();
        self.needs_redraw = true;

        if tool.collects_points() && points.last() != Some(&(x, y)) {
            points.push((x, y));
        }

        match tool {
            Tool::Pen | Tool::Highlighter => {
                if distinct_points(&points) < 2 {
                    self.select_at(x, y);
                    return;
                }
                let style = if tool == Tool::Pen {
                    PathStyle::Pen
                } else {
                    PathStyle::Highlighter
                };
                self.commit(AnnotationKind::Path { points, style });
            }
            Tool::Rectangle | Tool::Circle => {
                let w = (x - start_x).abs();
                let h = (y - start_y).abs();
                if w < MIN_SHAPE_SIZE && h < MIN_SHAPE_SIZE {
                    self.select_at(x, y);
                    return;
                }
                let (bx, by) = (start_x.min(x), start_y.min(y));
                let kind = if tool == Tool::Rectangle {
                    AnnotationKind::Rectangle { x: bx, y: by, w, h }
                } else {
                    AnnotationKind::Ellipse { x: bx, y: by, w, h }
                };
                self.commit(kind);
            }
            Tool::Text => {
                let kind = AnnotationKind::Text {
                    x,
                    y,
                    text: String::new(),
                    size: self.font_size,
                };
                if let Some(id) = self.commit(kind) {
                    self.focus(id);
                }
            }
            Tool::Eraser => {
                let rect = if (start_x, start_y) == (x, y) {
                    Rect::from_corners(x, y, x, y).inflate(ERASER_CLICK_RADIUS)
                } else {
                    Rect::from_corners(start_x, start_y, x, y)
                };
                self.erase(rect);
            }
            Tool::Cursor => {}
        }
    }

    fn commit(&mut self, kind: AnnotationKind) -> Option<AnnotationId> {
        let width = self.current_width;
        match self
            .annotations
            .try_add(kind, self.current_color, width, self.max_annotations)
        {
            Some(id) => {
                self.mark_annotation_dirty(id);
                self.note_annotations_changed();
                if let Some(annotation) = self.annotations.get(id) {
                    debug!("Added {} {}", annotation.kind_name(), id);
                }
                Some(id)
            }
            None => {
                warn!(
                    "Annotation limit ({}) reached; discarding new annotation",
                    self.max_annotations
                );
                None
            }
        }
    }

    fn select_at(&mut self, x: i32, y: i32) {
        if let Some(id) = self.annotations.hit_test(x, y) {
            self.select(id);
        }
    }
}

fn distinct_points(points: &[(i32, i32)]) -> usize {
    let mut seen: Vec<(i32, i32)> = Vec::with_capacity(points.len());
    for point in points {
        if !seen.contains(point) {
            seen.push(*point);
            if seen.len() >= 2 {
                break;
            }
        }
    }
    seen.len()
}
