/// Toolbar rendering: background strip, tool icons, color swatch, width controls
use super::layout::{ToolbarButton, ToolbarLayout};
use crate::draw::Color;
use crate::input::Tool;
use crate::util::Rect;
use std::f64::consts::PI;

// ============================================================================
// Toolbar Style Constants (not configurable)
// ============================================================================

/// Corner radius of the toolbar background
const CORNER_RADIUS: f64 = 9.0;
/// Corner radius of button highlights
const BUTTON_RADIUS: f64 = 6.0;
/// Background tint
const BACKGROUND: [f64; 4] = [0.12, 0.12, 0.14, 0.92];
/// Active tool highlight
const ACTIVE: [f64; 4] = [0.30, 0.55, 0.95, 0.95];
/// Icon stroke color
const ICON: [f64; 4] = [0.92, 0.92, 0.92, 1.0];
/// Font size for glyph labels
const LABEL_FONT_SIZE: f64 = 18.0;

/// What the toolbar currently shows.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarView {
    pub tool: Tool,
    pub color: Color,
    pub width: f64,
}

/// Renders the toolbar at the context origin (toolbar-local coordinates).
///
/// Opacity is applied by the window system, not here.
pub fn render_toolbar(ctx: &cairo::Context, layout: &ToolbarLayout, view: &ToolbarView) {
    let (width, height) = layout.size();
    let _ = ctx.save();

    rounded_rect(ctx, 0.0, 0.0, width as f64, height as f64, CORNER_RADIUS);
    set_rgba(ctx, BACKGROUND);
    let _ = ctx.fill();

    for (button, rect) in layout.buttons() {
        match button {
            ToolbarButton::Grip => render_grip(ctx, *rect),
            ToolbarButton::Tool(tool) => {
                if *tool == view.tool {
                    rounded_rect(
                        ctx,
                        rect.x as f64,
                        rect.y as f64,
                        rect.width as f64,
                        rect.height as f64,
                        BUTTON_RADIUS,
                    );
                    set_rgba(ctx, ACTIVE);
                    let _ = ctx.fill();
                }
                render_tool_icon(ctx, *tool, *rect);
            }
            ToolbarButton::Color => render_swatch(ctx, *rect, view.color, view.width),
            ToolbarButton::WidthDown => render_label(ctx, *rect, "\u{2212}"),
            ToolbarButton::WidthUp => render_label(ctx, *rect, "+"),
        }
    }

    let _ = ctx.restore();
}

fn set_rgba(ctx: &cairo::Context, [r, g, b, a]: [f64; 4]) {
    ctx.set_source_rgba(r, g, b, a);
}

fn rounded_rect(ctx: &cairo::Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    ctx.arc(x + r, y + h - r, r, PI / 2.0, PI);
    ctx.arc(x + r, y + r, r, PI, 1.5 * PI);
    ctx.close_path();
}

fn centre(rect: Rect) -> (f64, f64) {
    (
        rect.x as f64 + rect.width as f64 / 2.0,
        rect.y as f64 + rect.height as f64 / 2.0,
    )
}

fn render_grip(ctx: &cairo::Context, rect: Rect) {
    let (cx, cy) = centre(rect);
    set_rgba(ctx, [ICON[0], ICON[1], ICON[2], 0.5]);
    for row in -1..=1 {
        for col in [-1.0, 1.0] {
            ctx.arc(cx + col * 2.5, cy + row as f64 * 6.0, 1.5, 0.0, 2.0 * PI);
            let _ = ctx.fill();
        }
    }
}

fn render_tool_icon(ctx: &cairo::Context, tool: Tool, rect: Rect) {
    let (cx, cy) = centre(rect);
    let s = rect.width as f64 * 0.28;

    set_rgba(ctx, ICON);
    ctx.set_line_width(2.0);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    match tool {
        Tool::Cursor => {
            ctx.move_to(cx - s * 0.6, cy - s);
            ctx.line_to(cx - s * 0.6, cy + s * 0.7);
            ctx.line_to(cx - s * 0.1, cy + s * 0.25);
            ctx.line_to(cx + s * 0.6, cy + s * 0.3);
            ctx.close_path();
            let _ = ctx.fill();
        }
        Tool::Pen => {
            ctx.move_to(cx - s, cy + s);
            ctx.curve_to(cx - s * 0.3, cy - s * 0.2, cx + s * 0.2, cy + s * 0.4, cx + s, cy - s);
            let _ = ctx.stroke();
        }
        Tool::Highlighter => {
            ctx.set_source_rgba(1.0, 0.95, 0.2, 0.6);
            ctx.set_line_width(7.0);
            ctx.move_to(cx - s, cy + s * 0.3);
            ctx.line_to(cx + s, cy - s * 0.3);
            let _ = ctx.stroke();
        }
        Tool::Rectangle => {
            ctx.rectangle(cx - s, cy - s * 0.75, s * 2.0, s * 1.5);
            let _ = ctx.stroke();
        }
        Tool::Circle => {
            ctx.arc(cx, cy, s, 0.0, 2.0 * PI);
            let _ = ctx.stroke();
        }
        Tool::Text => render_label(ctx, rect, "T"),
        Tool::Eraser => {
            ctx.save().ok();
            ctx.translate(cx, cy);
            ctx.rotate(-PI / 4.0);
            ctx.rectangle(-s, -s * 0.5, s * 2.0, s);
            let _ = ctx.stroke_preserve();
            ctx.set_source_rgba(ICON[0], ICON[1], ICON[2], 0.35);
            let _ = ctx.fill();
            ctx.restore().ok();
        }
    }
}

fn render_swatch(ctx: &cairo::Context, rect: Rect, color: Color, width: f64) {
    let (cx, cy) = centre(rect);
    let outer = rect.width as f64 * 0.4;

    ctx.set_source_rgba(color.r, color.g, color.b, 1.0);
    ctx.arc(cx, cy, outer, 0.0, 2.0 * PI);
    let _ = ctx.fill();

    set_rgba(ctx, ICON);
    ctx.set_line_width(1.5);
    ctx.arc(cx, cy, outer, 0.0, 2.0 * PI);
    let _ = ctx.stroke();

    // Inner dot previews the stroke width
    let dot = (width / 2.0).clamp(1.0, outer - 2.0);
    if color.brightness() > 0.5 {
        ctx.set_source_rgba(0.0, 0.0, 0.0, 0.8);
    } else {
        ctx.set_source_rgba(1.0, 1.0, 1.0, 0.8);
    }
    ctx.arc(cx, cy, dot, 0.0, 2.0 * PI);
    let _ = ctx.fill();
}

fn render_label(ctx: &cairo::Context, rect: Rect, label: &str) {
    ctx.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    ctx.set_font_size(LABEL_FONT_SIZE);

    let extents = match ctx.text_extents(label) {
        Ok(ext) => ext,
        Err(e) => {
            log::warn!("Failed to measure toolbar label '{}': {}", label, e);
            return;
        }
    };
    let (cx, cy) = centre(rect);
    set_rgba(ctx, ICON);
    ctx.move_to(
        cx - extents.width() / 2.0 - extents.x_bearing(),
        cy - extents.height() / 2.0 - extents.y_bearing(),
    );
    let _ = ctx.show_text(label);
}
