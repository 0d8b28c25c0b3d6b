//! Selection and text-edit focus tracking.

use crate::draw::AnnotationId;

/// At most one selected annotation, plus the annotation receiving text edits.
///
/// Invariant: when `focused` is set it equals `selected`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<AnnotationId>,
    focused: Option<AnnotationId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn focused(&self) -> Option<AnnotationId> {
        self.focused
    }

    pub fn is_selected(&self, id: AnnotationId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_editing(&self) -> bool {
        self.focused.is_some()
    }

    /// Selects `id` without edit focus. Focus on any other annotation is dropped.
    pub fn select(&mut self, id: AnnotationId) {
        if self.focused != Some(id) {
            self.focused = None;
        }
        self.selected = Some(id);
    }

    /// Selects `id` and gives it edit focus.
    pub fn focus(&mut self, id: AnnotationId) {
        self.selected = Some(id);
        self.focused = Some(id);
    }

    /// Drops edit focus, keeping the selection. Returns the previously focused id.
    pub fn blur(&mut self) -> Option<AnnotationId> {
        self.focused.take()
    }

    /// Clears both selection and focus.
    pub fn clear(&mut self) {
        self.selected = None;
        self.focused = None;
    }

    /// Forgets `id` if it was selected or focused (e.g. after removal).
    pub fn forget(&mut self, id: AnnotationId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_b_after_a_leaves_only_b() {
        let mut selection = Selection::new();
        selection.focus(AnnotationId(1));
        selection.select(AnnotationId(2));

        assert_eq!(selection.selected(), Some(AnnotationId(2)));
        assert!(!selection.is_selected(AnnotationId(1)));
        assert_eq!(selection.focused(), None);
    }

    #[test]
    fn reselecting_focused_annotation_keeps_focus() {
        let mut selection = Selection::new();
        selection.focus(AnnotationId(3));
        selection.select(AnnotationId(3));
        assert_eq!(selection.focused(), Some(AnnotationId(3)));
    }

    #[test]
    fn blur_keeps_selection() {
        let mut selection = Selection::new();
        selection.focus(AnnotationId(4));
        assert_eq!(selection.blur(), Some(AnnotationId(4)));
        assert_eq!(selection.selected(), Some(AnnotationId(4)));
        assert!(!selection.is_editing());
    }

    #[test]
    fn forget_clears_matching_ids_only() {
        let mut selection = Selection::new();
        selection.focus(AnnotationId(5));
        selection.forget(AnnotationId(6));
        assert_eq!(selection.selected(), Some(AnnotationId(5)));
        selection.forget(AnnotationId(5));
        assert_eq!(selection, Selection::new());
    }
}
