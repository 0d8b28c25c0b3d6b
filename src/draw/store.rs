//! Ordered annotation collection with hit-testing and erasing.

use super::annotation::{Annotation, AnnotationId, AnnotationKind};
use super::color::Color;
use crate::util::Rect;

/// Container for all annotations currently on the overlay.
///
/// Annotations are kept in draw order (first = bottom layer, last = top layer).
/// Ids are allocated monotonically and never reused, so a stale id held by the
/// selection can never alias a newer annotation.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    next_id: u64,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a new annotation on top and returns its id.
    pub fn add(&mut self, kind: AnnotationKind, color: Color, width: f64) -> AnnotationId {
        let id = self.allocate_id();
        self.annotations.push(Annotation {
            id,
            kind,
            color,
            width,
        });
        id
    }

    /// Attempts to add an annotation, enforcing a maximum count when `max` > 0.
    ///
    /// Returns `None` if the limit would be exceeded.
    pub fn try_add(
        &mut self,
        kind: AnnotationKind,
        color: Color,
        width: f64,
        max: usize,
    ) -> Option<AnnotationId> {
        if max == 0 || self.annotations.len() < max {
            Some(self.add(kind, color, width))
        } else {
            None
        }
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Removes an annotation by id.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        Some(self.annotations.remove(index))
    }

    /// Iterates annotations in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Removes all annotations.
    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    /// Removes and returns the most recently added annotation, if any.
    pub fn undo(&mut self) -> Option<Annotation> {
        self.annotations.pop()
    }

    /// Returns the topmost annotation whose bounds contain the point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.bounding_box().is_some_and(|rect| rect.contains(x, y)))
            .map(|a| a.id)
    }

    /// Like [`hit_test`](Self::hit_test) but only considers text annotations.
    pub fn hit_test_text(&self, x: i32, y: i32) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .filter(|a| a.is_text())
            .find(|a| a.bounding_box().is_some_and(|rect| rect.contains(x, y)))
            .map(|a| a.id)
    }

    /// Removes every annotation whose bounds intersect `rect`.
    ///
    /// Returns the removed annotations in their former draw order.
    pub fn erase_intersecting(&mut self, rect: Rect) -> Vec<Annotation> {
        let mut removed = Vec::new();
        self.annotations.retain(|annotation| {
            let hit = annotation
                .bounding_box()
                .is_some_and(|bounds| bounds.intersects(&rect));
            if hit {
                removed.push(annotation.clone());
            }
            !hit
        });
        removed
    }

    /// Removes every text annotation whose trimmed content is empty.
    pub fn remove_blank_text(&mut self) -> Vec<Annotation> {
        let mut removed = Vec::new();
        self.annotations.retain(|annotation| {
            if annotation.is_blank_text() {
                removed.push(annotation.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Replaces the content of a text annotation in place.
    ///
    /// Returns `false` when the id is unknown or not a text annotation.
    pub fn set_text(&mut self, id: AnnotationId, value: &str) -> bool {
        match self.get_mut(id).map(|a| &mut a.kind) {
            Some(AnnotationKind::Text { text, .. }) => {
                value.clone_into(text);
                true
            }
            _ => false,
        }
    }

    /// Applies `edit` to the content of a text annotation in place.
    pub fn edit_text(&mut self, id: AnnotationId, edit: impl FnOnce(&mut String)) -> bool {
        match self.get_mut(id).map(|a| &mut a.kind) {
            Some(AnnotationKind::Text { text, .. }) => {
                edit(text);
                true
            }
            _ => false,
        }
    }
}
