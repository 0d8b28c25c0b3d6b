//! Damage accumulated on the overlay between repaints.
//!
//! Overlapping rectangles are merged as they arrive so the window system
//! gets a short list of disjoint regions.

use super::Annotation;
use crate::util::Rect;

/// Extra damage around annotation bounds (selection outline + dash width).
pub(crate) const SELECTION_MARGIN: i32 = 6;

/// Pending damage: either the whole surface or a set of disjoint rectangles.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    full: bool,
    regions: Vec<Rect>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Damages the whole surface. Any pending rectangles are subsumed.
    pub fn mark_full(&mut self) {
        self.full = true;
        self.regions.clear();
    }

    /// Damages `rect`, merging it with every pending region it overlaps.
    pub fn mark_rect(&mut self, rect: Rect) {
        if self.full || !rect.is_valid() {
            return;
        }

        let mut merged = rect;
        // A merge can grow the rectangle into regions it missed before.
        loop {
            let before = self.regions.len();
            self.regions.retain(|region| {
                if region.intersects(&merged) {
                    merged = merged.union(region);
                    false
                } else {
                    true
                }
            });
            if self.regions.len() == before {
                break;
            }
        }
        self.regions.push(merged);
    }

    pub fn mark_optional_rect(&mut self, rect: Option<Rect>) {
        if let Some(rect) = rect {
            self.mark_rect(rect);
        }
    }

    /// Damages the annotation plus room for its selection outline and caret.
    /// Annotations without bounds damage everything.
    pub fn mark_annotation(&mut self, annotation: &Annotation) {
        match annotation.bounding_box() {
            Some(bounds) => self.mark_rect(bounds.inflate(SELECTION_MARGIN)),
            None => self.mark_full(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.full || !self.regions.is_empty()
    }

    /// Hands out the pending damage and resets the tracker. Full damage is
    /// reported as one `width` x `height` rectangle (nothing for an empty
    /// surface).
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        if std::mem::take(&mut self.full) {
            self.regions.clear();
            return Rect::new(0, 0, width, height).into_iter().collect();
        }
        std::mem::take(&mut self.regions)
    }
}
