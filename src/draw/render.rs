//! Cairo-based rendering functions for annotations.

use super::annotation::{
    Annotation, AnnotationKind, HIGHLIGHTER_ALPHA, HIGHLIGHTER_WIDTH_SCALE, PathStyle,
    TEXT_LINE_HEIGHT_RATIO,
};
use super::color::Color;
use super::store::AnnotationStore;
use crate::input::{DrawingState, InputState, Selection, Tool};
use crate::util::{self, Rect};

/// Renders every annotation in draw order (first = bottom layer), then the
/// selection outline on top.
///
/// # Arguments
/// * `ctx` - Cairo drawing context to render to
/// * `store` - Annotations to render
/// * `selection` - Selected annotation (outlined) and edit focus (caret)
/// * `font_family` - Font family for text labels
pub fn render_annotations(
    ctx: &cairo::Context,
    store: &AnnotationStore,
    selection: &Selection,
    font_family: &str,
) {
    for annotation in store.iter() {
        let caret = selection.focused() == Some(annotation.id);
        render_annotation(ctx, annotation, font_family, caret);
    }

    if let Some(bounds) = selection
        .selected()
        .and_then(|id| store.get(id))
        .and_then(|annotation| annotation.bounding_box())
    {
        render_selection_outline(ctx, bounds);
    }
}

/// Renders a single annotation to a Cairo context.
///
/// `caret` draws the text insertion caret after the last character of a
/// text label (ignored for other kinds).
pub fn render_annotation(
    ctx: &cairo::Context,
    annotation: &Annotation,
    font_family: &str,
    caret: bool,
) {
    let color = annotation.color;
    let width = annotation.width;
    match &annotation.kind {
        AnnotationKind::Path {
            points,
            style: PathStyle::Pen,
        } => render_path(ctx, points, color, width),
        AnnotationKind::Path {
            points,
            style: PathStyle::Highlighter,
        } => render_highlighter(ctx, points, color, width),
        AnnotationKind::Rectangle { x, y, w, h } => render_rect(ctx, *x, *y, *w, *h, color, width),
        AnnotationKind::Ellipse { x, y, w, h } => {
            let (cx, cy, rx, ry) = util::ellipse_bounds(*x, *y, x + w, y + h);
            render_ellipse(ctx, cx, cy, rx, ry, color, width);
        }
        AnnotationKind::Text { x, y, text, size } => {
            render_text(ctx, *x, *y, text, color, *size, font_family, caret);
        }
    }
}

/// Renders the live preview of an in-progress drag.
pub fn render_provisional(ctx: &cairo::Context, input: &InputState) {
    let DrawingState::Drawing {
        tool,
        start_x,
        start_y,
        current_x,
        current_y,
        points,
    } = &input.state
    else {
        return;
    };

    let color = input.current_color;
    let width = input.current_width;
    match tool {
        Tool::Pen => render_path(ctx, points, color, width),
        Tool::Highlighter => render_highlighter(ctx, points, color, width),
        Tool::Rectangle => {
            let rect = Rect::from_corners(*start_x, *start_y, *current_x, *current_y);
            render_rect(ctx, rect.x, rect.y, rect.width, rect.height, color, width);
        }
        Tool::Circle => {
            let (cx, cy, rx, ry) = util::ellipse_bounds(*start_x, *start_y, *current_x, *current_y);
            render_ellipse(ctx, cx, cy, rx, ry, color, width);
        }
        Tool::Eraser => {
            let rect = Rect::from_corners(*start_x, *start_y, *current_x, *current_y);
            render_eraser_box(ctx, rect);
        }
        Tool::Text => {
            let size = input.font_size;
            let placement = Rect::from_corners(
                *current_x,
                *current_y,
                current_x + (size * 0.6).ceil() as i32,
                current_y + (size * TEXT_LINE_HEIGHT_RATIO).ceil() as i32,
            );
            render_dashed_rect(ctx, placement, color);
        }
        Tool::Cursor => {}
    }
}

/// Clears the whole surface to full transparency.
pub fn clear_surface(ctx: &cairo::Context) {
    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Clear);
    let _ = ctx.paint();
    let _ = ctx.restore();
}

/// Render a freehand stroke (round-capped polyline through points)
fn render_path(ctx: &cairo::Context, points: &[(i32, i32)], color: Color, width: f64) {
    let Some((&(x0, y0), rest)) = points.split_first() else {
        return;
    };

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(x0 as f64, y0 as f64);
    for &(x, y) in rest {
        ctx.line_to(x as f64, y as f64);
    }
    let _ = ctx.stroke();
}

/// Render a highlighter stroke: translucent and wider than the pen
fn render_highlighter(ctx: &cairo::Context, points: &[(i32, i32)], color: Color, width: f64) {
    render_path(
        ctx,
        points,
        color.with_alpha(HIGHLIGHTER_ALPHA),
        width * HIGHLIGHTER_WIDTH_SCALE,
    );
}

/// Render a rectangle (outline)
fn render_rect(ctx: &cairo::Context, x: i32, y: i32, w: i32, h: i32, color: Color, width: f64) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(width);
    ctx.set_line_join(cairo::LineJoin::Miter);

    ctx.rectangle(x as f64, y as f64, w as f64, h as f64);
    let _ = ctx.stroke();
}

/// Render an ellipse using Cairo's arc with scaling
fn render_ellipse(
    ctx: &cairo::Context,
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    color: Color,
    width: f64,
) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(width);

    ctx.save().ok();
    ctx.translate(cx, cy);
    ctx.scale(rx, ry);
    ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
    ctx.restore().ok();

    let _ = ctx.stroke();
}

/// Renders a text label anchored at its top-left corner using Pango.
///
/// Text containing newline characters is laid out across multiple lines. The
/// glyphs get a thin contrasting outline so labels stay readable over any
/// background. When `caret` is set, a caret is drawn after the last character.
#[allow(clippy::too_many_arguments)]
fn render_text(
    ctx: &cairo::Context,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
    size: f64,
    font_family: &str,
    caret: bool,
) {
    ctx.save().ok();

    // Gray antialiasing avoids color fringing on the transparent overlay
    ctx.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(ctx);
    let mut font_desc = pango::FontDescription::from_string(font_family);
    font_desc.set_absolute_size(size * pango::SCALE as f64);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    let (outline_r, outline_g, outline_b) = if color.brightness() > 0.5 {
        (0.0, 0.0, 0.0)
    } else {
        (1.0, 1.0, 1.0)
    };

    if !text.is_empty() {
        ctx.move_to(x as f64, y as f64);
        pangocairo::functions::layout_path(ctx, &layout);

        ctx.set_source_rgba(outline_r, outline_g, outline_b, color.a);
        ctx.set_line_width(size * 0.06);
        ctx.set_line_join(cairo::LineJoin::Round);
        let _ = ctx.stroke_preserve();

        ctx.set_source_rgba(color.r, color.g, color.b, color.a);
        let _ = ctx.fill();
    }

    if caret {
        let (strong, _weak) = layout.cursor_pos(text.len() as i32);
        let scale = pango::SCALE as f64;
        let caret_x = x as f64 + strong.x() as f64 / scale;
        let caret_y = y as f64 + strong.y() as f64 / scale;
        let caret_h = if strong.height() > 0 {
            strong.height() as f64 / scale
        } else {
            size * TEXT_LINE_HEIGHT_RATIO
        };

        ctx.set_source_rgba(color.r, color.g, color.b, 1.0);
        ctx.set_line_width((size / 16.0).max(1.5));
        ctx.move_to(caret_x + 1.0, caret_y);
        ctx.line_to(caret_x + 1.0, caret_y + caret_h);
        let _ = ctx.stroke();
    }

    ctx.restore().ok();
}

/// Dashed outline around the selected annotation.
fn render_selection_outline(ctx: &cairo::Context, bounds: Rect) {
    let outline = bounds.inflate(3);
    ctx.save().ok();
    ctx.set_line_width(1.5);
    ctx.set_dash(&[5.0, 4.0], 0.0);

    // Dark pass under a light pass so the outline shows on any background
    ctx.set_source_rgba(0.0, 0.0, 0.0, 0.8);
    stroke_rect(ctx, outline);
    ctx.set_dash(&[5.0, 4.0], 5.0);
    ctx.set_source_rgba(1.0, 1.0, 1.0, 0.9);
    stroke_rect(ctx, outline);

    ctx.restore().ok();
}

fn render_eraser_box(ctx: &cairo::Context, rect: Rect) {
    ctx.save().ok();
    ctx.set_source_rgba(0.5, 0.5, 0.5, 0.15);
    ctx.rectangle(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    );
    let _ = ctx.fill();
    ctx.restore().ok();
    render_dashed_rect(ctx, rect, Color::new(0.5, 0.5, 0.5, 0.9));
}

fn render_dashed_rect(ctx: &cairo::Context, rect: Rect, color: Color) {
    ctx.save().ok();
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(1.0);
    ctx.set_dash(&[4.0, 3.0], 0.0);
    stroke_rect(ctx, rect);
    ctx.restore().ok();
}

fn stroke_rect(ctx: &cairo::Context, rect: Rect) {
    ctx.rectangle(
        rect.x as f64 + 0.5,
        rect.y as f64 + 0.5,
        rect.width as f64,
        rect.height as f64,
    );
    let _ = ctx.stroke();
}
