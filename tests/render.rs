use cairo::{Context, ImageSurface};
use overmark::config::KeybindingsConfig;
use overmark::draw::{
    AnnotationKind, AnnotationStore, BLUE, PathStyle, RED, clear_surface, render_annotations,
    render_provisional,
};
use overmark::input::{InputState, MouseButton, Selection, Tool};
use overmark::toolbar::{ToolbarLayout, ToolbarView, render_toolbar};

fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
    let surface = ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    (surface, ctx)
}

/// Whether any pixel inside the rectangle is not fully transparent.
fn region_has_pixels(surface: &mut ImageSurface, x: i32, y: i32, w: i32, h: i32) -> bool {
    surface.flush();
    let stride = surface.stride() as usize;
    let data = surface.data().unwrap();
    (y..y + h).any(|row| {
        (x..x + w).any(|col| {
            let offset = row as usize * stride + col as usize * 4;
            data[offset..offset + 4].iter().any(|byte| *byte != 0)
        })
    })
}

fn make_input_state() -> InputState {
    let action_map = KeybindingsConfig::default().build_action_map().unwrap();
    let mut input = InputState::with_defaults(RED, 4.0, 24.0, "Sans".to_string(), action_map, 0);
    input.update_screen_dimensions(200, 200);
    input
}

#[test]
fn rectangle_outline_leaves_interior_empty() {
    let mut store = AnnotationStore::new();
    store.add(
        AnnotationKind::Rectangle {
            x: 20,
            y: 20,
            w: 100,
            h: 80,
        },
        RED,
        4.0,
    );

    let (mut surface, ctx) = surface_with_context(200, 200);
    render_annotations(&ctx, &store, &Selection::new(), "Sans");
    drop(ctx);

    assert!(region_has_pixels(&mut surface, 18, 18, 4, 4));
    assert!(!region_has_pixels(&mut surface, 50, 50, 20, 20));
    assert!(!region_has_pixels(&mut surface, 150, 150, 20, 20));
}

#[test]
fn pen_and_highlighter_strokes_render() {
    let mut store = AnnotationStore::new();
    store.add(
        AnnotationKind::Path {
            points: vec![(10, 10), (90, 10)],
            style: PathStyle::Pen,
        },
        BLUE,
        3.0,
    );
    store.add(
        AnnotationKind::Path {
            points: vec![(10, 60), (90, 60)],
            style: PathStyle::Highlighter,
        },
        BLUE,
        3.0,
    );

    let (mut surface, ctx) = surface_with_context(100, 100);
    render_annotations(&ctx, &store, &Selection::new(), "Sans");
    drop(ctx);

    assert!(region_has_pixels(&mut surface, 40, 9, 2, 2));
    // Highlighter is drawn wider than its nominal width
    assert!(region_has_pixels(&mut surface, 40, 64, 2, 1));
    assert!(!region_has_pixels(&mut surface, 40, 30, 10, 10));
}

#[test]
fn ellipse_is_hollow() {
    let mut store = AnnotationStore::new();
    store.add(
        AnnotationKind::Ellipse {
            x: 10,
            y: 10,
            w: 80,
            h: 60,
        },
        RED,
        3.0,
    );

    let (mut surface, ctx) = surface_with_context(100, 100);
    render_annotations(&ctx, &store, &Selection::new(), "Sans");
    drop(ctx);

    assert!(region_has_pixels(&mut surface, 8, 38, 5, 5));
    assert!(!region_has_pixels(&mut surface, 45, 35, 10, 10));
}

#[test]
fn text_label_renders_glyphs() {
    let mut store = AnnotationStore::new();
    store.add(
        AnnotationKind::Text {
            x: 10,
            y: 10,
            text: "Hello".to_string(),
            size: 32.0,
        },
        RED,
        3.0,
    );

    let (mut surface, ctx) = surface_with_context(200, 100);
    render_annotations(&ctx, &store, &Selection::new(), "Sans");
    drop(ctx);

    assert!(region_has_pixels(&mut surface, 10, 10, 120, 45));
}

#[test]
fn selection_outline_surrounds_selected_annotation() {
    let mut store = AnnotationStore::new();
    let id = store.add(
        AnnotationKind::Rectangle {
            x: 50,
            y: 50,
            w: 40,
            h: 40,
        },
        RED,
        2.0,
    );
    let mut selection = Selection::new();

    let (mut plain, ctx) = surface_with_context(200, 200);
    render_annotations(&ctx, &store, &selection, "Sans");
    drop(ctx);
    assert!(!region_has_pixels(&mut plain, 44, 70, 3, 3));

    selection.select(id);
    let (mut selected, ctx) = surface_with_context(200, 200);
    render_annotations(&ctx, &store, &selection, "Sans");
    drop(ctx);
    assert!(region_has_pixels(&mut selected, 44, 44, 3, 60));
}

#[test]
fn provisional_rectangle_follows_drag() {
    let mut input = make_input_state();
    input.set_tool(Tool::Rectangle);
    input.on_mouse_press(MouseButton::Left, 20, 20);
    input.on_mouse_motion(120, 100);

    let (mut surface, ctx) = surface_with_context(200, 200);
    render_provisional(&ctx, &input);
    drop(ctx);
    assert!(region_has_pixels(&mut surface, 118, 18, 4, 4));

    input.on_mouse_press(MouseButton::Right, 120, 100);
    let (mut cleared, ctx) = surface_with_context(200, 200);
    render_provisional(&ctx, &input);
    drop(ctx);
    assert!(!region_has_pixels(&mut cleared, 0, 0, 200, 200));
}

#[test]
fn clear_surface_erases_everything() {
    let (mut surface, ctx) = surface_with_context(50, 50);
    ctx.set_source_rgba(1.0, 0.0, 0.0, 1.0);
    ctx.paint().unwrap();
    clear_surface(&ctx);
    drop(ctx);
    assert!(!region_has_pixels(&mut surface, 0, 0, 50, 50));
}

#[test]
fn toolbar_renders_within_its_size() {
    let layout = ToolbarLayout::new();
    let (width, height) = layout.size();
    let view = ToolbarView {
        tool: Tool::Pen,
        color: RED,
        width: 3.0,
    };

    let (mut surface, ctx) = surface_with_context(width + 20, height + 20);
    render_toolbar(&ctx, &layout, &view);
    drop(ctx);

    assert!(region_has_pixels(&mut surface, 0, 0, width, height));
    assert!(!region_has_pixels(
        &mut surface,
        width + 2,
        height + 2,
        18,
        18
    ));
}
