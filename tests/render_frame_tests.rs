use chart_overlays::core::{Rect, Unit, Viewport};
use chart_overlays::layout::{Bar, Border, BoxSpec, Component, Edges, Flex, Text};
use chart_overlays::objects::{ChartObject, ChartPoint, ChartView, PriceRange};
use chart_overlays::render::{
    Color, Font, LinePrimitive, NullRenderer, RectPrimitive, RenderFrame, Renderer, Stroke,
};

#[test]
fn non_finite_primitives_are_dropped_on_push() {
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    frame.push_rect(RectPrimitive::filled(0.0, 0.0, f64::NAN, 10.0, Color::WHITE));
    frame.push_line(LinePrimitive::new(
        0.0,
        f64::INFINITY,
        10.0,
        10.0,
        Stroke::solid(Color::WHITE, 1.0),
    ));
    assert!(frame.is_empty());
    frame.validate().expect("empty frame is valid");
}

#[test]
fn debug_flex_outlines_each_child() {
    let label = Flex::column()
        .with_debug(true)
        .with_box(BoxSpec::default().with_padding(Edges::all(2.0)))
        .with_child(Text::new("a", Font::default()))
        .with_child(Text::new("b", Font::default()));
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    label.render(&mut frame, 0.0, 0.0, 200.0, 100.0);

    assert_eq!(frame.texts.len(), 2);
    // outer, inner and base box per child
    assert_eq!(frame.rects.len(), 6);
}

#[test]
fn null_renderer_counts_object_primitives() {
    let chart = ChartView::new(Rect::new(0.0, 0.0, 640.0, 360.0), (0.0, 50.0), (10.0, 20.0), 0.01)
        .expect("view");
    let mut range = PriceRange::new("r", ChartPoint::new(5.0, 12.0), ChartPoint::new(25.0, 15.0));
    range.prepare(&chart);

    let mut frame = RenderFrame::new(Viewport::new(640, 360));
    let mut labels = Vec::new();
    range.draw(&mut frame, &mut labels);
    range.draw_debug(&mut frame);

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.last_text_count, 2);
    assert!(renderer.last_rect_count >= 4);
    assert_eq!(labels.len(), 2);
}

fn bar_box(width: f64) -> BoxSpec {
    BoxSpec::default()
        .with_width(width, Unit::Pixel)
        .with_height(6.0, Unit::Pixel)
}

#[test]
fn negative_bar_fill_is_skipped_without_failing_the_frame() {
    let label = Flex::column()
        .with_child(Text::new("delta", Font::default()))
        .with_child(Bar::new(-20.0, 100.0).with_fill(Color::WHITE).with_box(bar_box(100.0)));
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    label.render(&mut frame, 0.0, 0.0, 200.0, 100.0);

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("degenerate fill must not fail the frame");
    assert_eq!(renderer.last_text_count, 1);
    assert_eq!(renderer.last_rect_count, 0);
}

#[test]
fn overfull_bar_overflows_its_box() {
    let bar = Bar::new(150.0, 100.0).with_fill(Color::WHITE).with_box(bar_box(100.0));
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    bar.render(&mut frame, 10.0, 0.0, 200.0, 100.0);

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(frame.rects.len(), 1);
    assert_eq!(frame.rects[0].x, 10.0);
    assert_eq!(frame.rects[0].width, 150.0);
}

#[test]
fn zero_thickness_border_is_stripped() {
    let text = Text::new("note", Font::default()).with_box(
        BoxSpec::default()
            .with_background(Color::WHITE)
            .with_border(Border::solid(Color::BLACK, 0.0)),
    );
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    text.render(&mut frame, 0.0, 0.0, 200.0, 100.0);

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("zero border must not fail the frame");
    assert_eq!(frame.rects.len(), 1);
    assert_eq!(frame.rects[0].border, None);
    assert_eq!(frame.rects[0].fill, Some(Color::WHITE));
    assert_eq!(renderer.last_text_count, 1);

    // border-only box with nothing left to draw
    let bare = Text::new("", Font::default())
        .with_box(BoxSpec::default().with_border(Border::solid(Color::BLACK, 0.0)));
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    bare.render(&mut frame, 0.0, 0.0, 200.0, 100.0);
    assert!(frame.is_empty());
}

#[test]
fn zero_width_line_is_dropped() {
    let mut frame = RenderFrame::new(Viewport::new(200, 100));
    frame.push_line(LinePrimitive::new(0.0, 0.0, 10.0, 10.0, Stroke::solid(Color::WHITE, 0.0)));
    assert!(frame.lines.is_empty());
    frame.validate().expect("valid frame");
}
