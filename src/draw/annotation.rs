//! Annotation records drawn on the overlay.

use super::color::Color;
use crate::util::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highlighter strokes are drawn at this alpha regardless of the pen color.
pub const HIGHLIGHTER_ALPHA: f64 = 0.35;
/// Highlighter strokes are this many times wider than the selected width.
pub const HIGHLIGHTER_WIDTH_SCALE: f64 = 3.0;

/// Average glyph advance relative to the font size, for approximate text bounds.
const TEXT_CHAR_WIDTH_RATIO: f64 = 0.6;
/// Line height relative to the font size.
pub(crate) const TEXT_LINE_HEIGHT_RATIO: f64 = 1.25;

/// Unique identifier of an annotation within its store. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a freehand path is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStyle {
    /// Opaque round-capped stroke
    Pen,
    /// Wide translucent stroke
    Highlighter,
}

/// Geometry of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Freehand stroke through the points traced by the pointer
    Path {
        points: Vec<(i32, i32)>,
        style: PathStyle,
    },
    /// Rectangle outline given by its bounding box
    Rectangle { x: i32, y: i32, w: i32, h: i32 },
    /// Ellipse outline inscribed in its bounding box
    Ellipse { x: i32, y: i32, w: i32, h: i32 },
    /// Text label anchored at its top-left corner
    Text {
        x: i32,
        y: i32,
        text: String,
        /// Font size in pixels
        size: f64,
    },
}

/// One drawable object on the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub color: Color,
    /// Stroke width in pixels
    pub width: f64,
}

impl Annotation {
    /// Returns the approximate axis-aligned bounds, expanded to cover the stroke.
    ///
    /// These bounds drive hit-testing, erasing and damage tracking. Returns
    /// `None` only for geometry without any drawable area (an empty path).
    pub fn bounding_box(&self) -> Option<Rect> {
        match &self.kind {
            AnnotationKind::Path { points, style } => {
                let width = match style {
                    PathStyle::Pen => self.width,
                    PathStyle::Highlighter => self.width * HIGHLIGHTER_WIDTH_SCALE,
                };
                bounding_box_for_points(points, width)
            }
            AnnotationKind::Rectangle { x, y, w, h } | AnnotationKind::Ellipse { x, y, w, h } => {
                bounding_box_for_box(*x, *y, *w, *h, self.width)
            }
            AnnotationKind::Text { x, y, text, size } => bounding_box_for_text(*x, *y, text, *size),
        }
    }

    /// Returns the text content for text annotations.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, AnnotationKind::Text { .. })
    }

    /// True for text annotations whose trimmed content is empty.
    pub fn is_blank_text(&self) -> bool {
        self.text().is_some_and(|text| text.trim().is_empty())
    }

    /// Short human-readable kind name for logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            AnnotationKind::Path {
                style: PathStyle::Pen,
                ..
            } => "pen stroke",
            AnnotationKind::Path {
                style: PathStyle::Highlighter,
                ..
            } => "highlighter stroke",
            AnnotationKind::Rectangle { .. } => "rectangle",
            AnnotationKind::Ellipse { .. } => "ellipse",
            AnnotationKind::Text { .. } => "text",
        }
    }
}

fn stroke_padding(width: f64) -> i32 {
    let padding = (width / 2.0).ceil() as i32;
    padding.max(1)
}

pub(crate) fn bounding_box_for_points(points: &[(i32, i32)], width: f64) -> Option<Rect> {
    let (&(first_x, first_y), rest) = points.split_first()?;
    let mut min_x = first_x;
    let mut max_x = first_x;
    let mut min_y = first_y;
    let mut max_y = first_y;

    for &(x, y) in rest {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let padding = stroke_padding(width);
    ensure_positive_rect(
        min_x - padding,
        min_y - padding,
        max_x + padding,
        max_y + padding,
    )
}

pub(crate) fn bounding_box_for_box(x: i32, y: i32, w: i32, h: i32, width: f64) -> Option<Rect> {
    let padding = stroke_padding(width);

    let x2 = x + w;
    let y2 = y + h;

    let min_x = x.min(x2) - padding;
    let max_x = x.max(x2) + padding;
    let min_y = y.min(y2) - padding;
    let max_y = y.max(y2) + padding;

    ensure_positive_rect(min_x, min_y, max_x, max_y)
}

/// Estimates text bounds from character and line counts.
///
/// Empty text still reserves one glyph cell so a freshly placed label can be
/// hit, erased and outlined before anything is typed.
pub(crate) fn bounding_box_for_text(x: i32, y: i32, text: &str, size: f64) -> Option<Rect> {
    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);

    let width = (longest as f64 * size * TEXT_CHAR_WIDTH_RATIO).ceil() as i32;
    let height = (lines.len() as f64 * size * TEXT_LINE_HEIGHT_RATIO).ceil() as i32;
    let padding = 2;

    ensure_positive_rect(
        x - padding,
        y - padding,
        x + width + padding,
        y + height + padding,
    )
}

fn ensure_positive_rect(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Rect> {
    let max_x = if min_x == max_x { max_x + 1 } else { max_x };
    let max_y = if min_y == max_y { max_y + 1 } else { max_y };
    Rect::from_min_max(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::WHITE;

    fn annotation(kind: AnnotationKind, width: f64) -> Annotation {
        Annotation {
            id: AnnotationId(1),
            kind,
            color: WHITE,
            width,
        }
    }

    #[test]
    fn path_bounding_box_expands_with_width() {
        let shape = annotation(
            AnnotationKind::Path {
                points: vec![(10, 20), (30, 40)],
                style: PathStyle::Pen,
            },
            6.0,
        );

        let rect = shape.bounding_box().expect("path should have bounds");
        assert_eq!(rect, Rect::new(7, 17, 26, 26).unwrap());
    }

    #[test]
    fn highlighter_bounds_cover_the_wider_stroke() {
        let pen = annotation(
            AnnotationKind::Path {
                points: vec![(100, 100), (140, 100)],
                style: PathStyle::Pen,
            },
            4.0,
        );
        let highlighter = annotation(
            AnnotationKind::Path {
                points: vec![(100, 100), (140, 100)],
                style: PathStyle::Highlighter,
            },
            4.0,
        );

        let pen_rect = pen.bounding_box().unwrap();
        let hl_rect = highlighter.bounding_box().unwrap();
        assert!(hl_rect.height > pen_rect.height);
        assert_eq!(hl_rect.y, 94);
    }

    #[test]
    fn empty_path_has_no_bounds() {
        let shape = annotation(
            AnnotationKind::Path {
                points: Vec::new(),
                style: PathStyle::Pen,
            },
            2.0,
        );
        assert!(shape.bounding_box().is_none());
    }

    #[test]
    fn rectangle_bounding_box_covers_stroke() {
        let shape = annotation(
            AnnotationKind::Rectangle {
                x: 10,
                y: 10,
                w: 40,
                h: 30,
            },
            4.0,
        );
        assert_eq!(shape.bounding_box(), Rect::new(8, 8, 44, 34));
    }

    #[test]
    fn ellipse_uses_its_box() {
        let shape = annotation(
            AnnotationKind::Ellipse {
                x: 160,
                y: 130,
                w: 80,
                h: 40,
            },
            2.0,
        );
        assert_eq!(shape.bounding_box(), Rect::new(159, 129, 82, 42));
    }

    #[test]
    fn text_bounds_grow_with_content() {
        let short = annotation(
            AnnotationKind::Text {
                x: 10,
                y: 20,
                text: "Hi".into(),
                size: 20.0,
            },
            2.0,
        );
        let long = annotation(
            AnnotationKind::Text {
                x: 10,
                y: 20,
                text: "Hello there\nsecond line".into(),
                size: 20.0,
            },
            2.0,
        );

        let short_rect = short.bounding_box().unwrap();
        let long_rect = long.bounding_box().unwrap();
        assert!(long_rect.width > short_rect.width);
        assert!(long_rect.height > short_rect.height);
        assert!(short_rect.x <= 10 && short_rect.y <= 20);
    }

    #[test]
    fn empty_text_keeps_a_caret_cell() {
        let shape = annotation(
            AnnotationKind::Text {
                x: 0,
                y: 0,
                text: String::new(),
                size: 24.0,
            },
            2.0,
        );
        let rect = shape.bounding_box().unwrap();
        assert!(rect.width > 0 && rect.height > 0);
        assert!(shape.is_blank_text());
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let shape = annotation(
            AnnotationKind::Text {
                x: 0,
                y: 0,
                text: "  \n ".into(),
                size: 24.0,
            },
            2.0,
        );
        assert!(shape.is_blank_text());
    }
}
